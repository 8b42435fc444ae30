// Everything the background tasks report back to the main loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Countdown display changed for one promotional event
    Countdown { event_id: String, display: String },

    // Deadline passed; sent once per countdown instance
    Expired { event_id: String },

    // Ctrl+C or kill signal
    Shutdown,
}

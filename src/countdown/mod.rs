mod board;
mod clock;
mod timer;

pub use board::CountdownBoard;
pub use clock::{now_ms, SharedClock};
pub use timer::{Countdown, Phase, Remaining, Tick, TimeRemaining};

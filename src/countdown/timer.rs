use std::fmt;

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Broken-down time left before a deadline.
/// Field order makes the derived `Ord` compare as a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    /// None once the difference is zero or negative.
    pub fn from_millis(difference_ms: i64) -> Option<Self> {
        if difference_ms <= 0 {
            return None;
        }
        Some(Self {
            days: difference_ms / MS_PER_DAY,
            hours: (difference_ms / MS_PER_HOUR) % 24,
            minutes: (difference_ms / MS_PER_MINUTE) % 60,
            seconds: (difference_ms / MS_PER_SECOND) % 60,
        })
    }
}

impl fmt::Display for TimeRemaining {
    /// Zero units are skipped; "0 seconds" is shown for the final sub-second.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = [
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
        ];
        let parts: Vec<String> = units
            .iter()
            .filter(|(value, _)| *value > 0)
            .map(|&(value, unit)| match value {
                1 => format!("1 {unit}"),
                _ => format!("{value} {unit}s"),
            })
            .collect();

        if parts.is_empty() {
            write!(f, "0 seconds")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

/// What a countdown shows on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Counting(TimeRemaining),
    Expired,
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Counting(left) => left.fmt(f),
            Remaining::Expired => write!(f, "Time's up"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Counting,
    Expired,
}

/// Result of evaluating a countdown at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining: Remaining,
    /// True exactly once per countdown: on the first evaluation in `Expired`
    pub just_expired: bool,
}

/// Countdown to a single event deadline.
///
/// `Counting -> Expired` is the only transition. A missing or unparseable
/// deadline starts in `Expired`. The expiry latch is released on the first
/// tick that observes `Expired`, so a countdown built after its deadline still
/// reports expiry once.
#[derive(Debug, Clone)]
pub struct Countdown {
    event_id: String,
    finish_ms: Option<i64>,
    phase: Phase,
    expiry_reported: bool,
    hide_on_expire: bool,
}

impl Countdown {
    pub fn new(event_id: impl Into<String>, finish_ms: Option<i64>, now_ms: i64) -> Self {
        let phase = match finish_ms {
            Some(finish) if finish > now_ms => Phase::Counting,
            _ => Phase::Expired,
        };
        Self {
            event_id: event_id.into(),
            finish_ms,
            phase,
            expiry_reported: false,
            hide_on_expire: false,
        }
    }

    pub fn hide_on_expire(mut self, hide: bool) -> Self {
        self.hide_on_expire = hide;
        self
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn finish_ms(&self) -> Option<i64> {
        self.finish_ms
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_expired(&self) -> bool {
        self.phase == Phase::Expired
    }

    /// Re-evaluate against the clock.
    pub fn tick(&mut self, now_ms: i64) -> Tick {
        let remaining = match (self.phase, self.finish_ms) {
            (Phase::Counting, Some(finish)) => match TimeRemaining::from_millis(finish - now_ms) {
                Some(left) => Remaining::Counting(left),
                None => {
                    self.phase = Phase::Expired;
                    Remaining::Expired
                }
            },
            _ => {
                self.phase = Phase::Expired;
                Remaining::Expired
            }
        };

        let just_expired = self.phase == Phase::Expired && !self.expiry_reported;
        if just_expired {
            self.expiry_reported = true;
        }

        Tick {
            remaining,
            just_expired,
        }
    }

    /// Text to show for a tick, or None when the card should collapse.
    pub fn render(&self, remaining: Remaining) -> Option<String> {
        match remaining {
            Remaining::Expired if self.hide_on_expire => None,
            other => Some(other.to_string()),
        }
    }
}

//! Source of "today" for date-driven logic.

use crate::types::{Date, Timestamp};

pub trait Clock: Send + Sync {
    /// Calendar date in the deployment's local time zone.
    fn today(&self) -> Date;

    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        chrono::Local::now().date_naive()
    }

    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}

/// A clock pinned to one date, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: Date,
}

impl FixedClock {
    pub fn new(today: Date) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.today
    }

    fn now(&self) -> Timestamp {
        self.today.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}

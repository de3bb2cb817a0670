//! System clock adapter.

use chrono::{DateTime, Local};

use crate::ports::Clock;

/// Wall-clock time from the OS, in the local timezone (dose times are
/// local-time strings).
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

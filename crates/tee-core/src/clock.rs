use std::fmt;

use time::{OffsetDateTime, UtcOffset};

/// Source of wall-clock time.
///
/// The supervisor compares it against the opening time and workers read
/// today's date from it.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// System clock shifted to a fixed UTC offset.
///
/// The offset is captured once at startup, before any threads exist.
#[derive(Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

impl fmt::Debug for SystemClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClock").field("offset", &self.offset).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn system_clock_reports_in_its_offset() {
        let clock = SystemClock::new(offset!(-4));
        assert_eq!(clock.now().offset(), offset!(-4));
        assert_eq!(SystemClock::utc().now().offset(), UtcOffset::UTC);
    }
}

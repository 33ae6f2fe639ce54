use std::fmt;

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::logger::object::LogTimeZone;

/// RFC3339 timestamps in the configured zone.
#[derive(Debug, Clone, Copy)]
pub struct LogClock {
    offset: UtcOffset,
}

impl LogClock {
    pub fn new(tz: LogTimeZone) -> Self {
        Self { offset: tz.offset() }
    }
}

impl FormatTime for LogClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = OffsetDateTime::now_utc().to_offset(self.offset);
        match now.format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts} "),
            Err(_) => write!(w, "<invalid-time> "),
        }
    }
}

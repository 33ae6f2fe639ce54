mod clock;
pub use clock::LogClock;

mod format;
pub use format::LogFormat;

mod level;
pub use level::LogLevel;

mod timezone;
pub use timezone::{LogTimeZone, capture_local_offset};

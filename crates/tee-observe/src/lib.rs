//! Logging setup for the tee-time bot.
//!
//! Every crate in the workspace logs through `tracing`; this crate owns the
//! subscriber that turns those events into text, JSON or journald output.
mod logger;
pub use logger::*;

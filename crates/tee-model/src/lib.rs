mod domain;
pub use domain::{Credentials, PlayerCount, WorkerId, WorkerOutcome, WorkerRecord, WorkerState};

mod error;
pub use error::{ModelError, ModelResult};

mod strategy;
pub use strategy::SlotOrder;

mod target;
pub use target::{BookingTarget, DEFAULT_BOOKING_URL, DEFAULT_COURSE, TargetDay, TargetTime};

mod booking;
pub use booking::{BookingTarget, DEFAULT_BOOKING_URL, DEFAULT_COURSE};

mod day;
pub use day::TargetDay;

mod clock;
pub use clock::TargetTime;

pub mod browser;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod page;
pub mod profile;
pub mod runner;
pub mod signal;
pub mod slots;
pub mod store;
pub mod supervisor;
pub mod vault;
pub mod worker;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub mod prelude {
    pub use crate::browser::{Browser, BrowserError, Session};
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::error::CoreError;
    pub use crate::page::PageMap;
    pub use crate::profile::Profile;
    pub use crate::runner::{BookingRunner, BuildContext, Runner, RunnerError};
    pub use crate::signal::BookingSignal;
    pub use crate::store::{FileStore, ProfileStore, StoreConfig, StoreError};
    pub use crate::supervisor::{PoolConfig, PoolReport, PoolState, Supervisor};
    pub use crate::vault::SessionVault;
    pub use crate::worker::{BookingPlan, BookingWorker};
}

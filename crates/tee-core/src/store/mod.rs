//! Persistence of the operator's profile (player count, login) and crash records.
mod error;
pub use error::StoreError;

mod file;
pub use file::{FileStore, StoreConfig};

use tee_model::{Credentials, PlayerCount, WorkerId};
use time::OffsetDateTime;

/// Flat key-value persistence used at startup and by the readiness gate.
pub trait ProfileStore: Send + Sync {
    /// Persisted player count.
    ///
    /// A value that cannot be parsed is reset to [`PlayerCount::UNSET`] in the
    /// store and returned as such. A missing value is [`StoreError::Missing`].
    fn read_player_count(&self) -> Result<PlayerCount, StoreError>;

    fn write_player_count(&self, count: PlayerCount) -> Result<(), StoreError>;

    /// Persisted login.
    fn read_credentials(&self) -> Result<Credentials, StoreError>;

    /// Persist an unexpected worker failure. Returns where it was written.
    fn record_crash(
        &self,
        at: OffsetDateTime,
        worker: WorkerId,
        report: &str,
    ) -> Result<String, StoreError>;

    /// Readiness gate: both values present and the player count in `1..=4`.
    fn is_ready(&self) -> bool {
        let players_ok = matches!(self.read_player_count(), Ok(count) if count.is_valid());
        players_ok && self.read_credentials().is_ok()
    }
}

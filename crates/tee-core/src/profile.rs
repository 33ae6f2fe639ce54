use tee_model::{Credentials, PlayerCount};
use tracing::debug;

use crate::store::{ProfileStore, StoreError};

/// Values persisted by the operator and loaded once per process.
///
/// Shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct Profile {
    pub credentials: Credentials,
    pub players: PlayerCount,
}

impl Profile {
    pub fn new(credentials: Credentials, players: PlayerCount) -> Self {
        Self {
            credentials,
            players,
        }
    }

    /// Read both values from the store.
    ///
    /// A corrupt player count comes back as [`PlayerCount::UNSET`]; the caller
    /// decides whether that is acceptable (the readiness gate does not).
    pub fn load(store: &dyn ProfileStore) -> Result<Self, StoreError> {
        let players = store.read_player_count()?;
        let credentials = store.read_credentials()?;
        debug!(players = %players, email = credentials.email(), "profile loaded");
        Ok(Self::new(credentials, players))
    }
}

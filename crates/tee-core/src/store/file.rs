use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tee_model::{Credentials, PlayerCount, WorkerId};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, warn};

use crate::store::{ProfileStore, StoreError};

/// File locations of the persisted profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// File holding a single integer: the player count.
    pub players_path: PathBuf,
    /// File holding two lines: email, then password.
    pub login_path: PathBuf,
    /// Directory that receives dated crash records.
    pub crash_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            players_path: PathBuf::from("botdata.txt"),
            login_path: PathBuf::from("botlogin.txt"),
            crash_dir: PathBuf::from("."),
        }
    }
}

/// [`ProfileStore`] backed by plain text files.
#[derive(Debug, Clone)]
pub struct FileStore {
    cfg: StoreConfig,
}

impl FileStore {
    pub fn new(cfg: StoreConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    /// Name of the crash file for `at`'s calendar day.
    fn crash_path(&self, at: OffsetDateTime) -> PathBuf {
        let name = format!(
            "{}-{}-{}_crashlog.txt",
            at.day(),
            u8::from(at.month()),
            at.year()
        );
        self.cfg.crash_dir.join(name)
    }
}

fn read_existing(path: &Path, what: &'static str) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StoreError::Missing {
            what,
            path: path.to_path_buf(),
        },
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

impl ProfileStore for FileStore {
    fn read_player_count(&self) -> Result<PlayerCount, StoreError> {
        let raw = read_existing(&self.cfg.players_path, "player count")?;
        match raw.parse::<PlayerCount>() {
            Ok(count) => Ok(count),
            Err(e) => {
                warn!(path = %self.cfg.players_path.display(), error = %e, "corrupt player count; resetting");
                self.write_player_count(PlayerCount::UNSET)?;
                Ok(PlayerCount::UNSET)
            }
        }
    }

    fn write_player_count(&self, count: PlayerCount) -> Result<(), StoreError> {
        fs::write(&self.cfg.players_path, count.to_string()).map_err(|source| StoreError::Io {
            path: self.cfg.players_path.clone(),
            source,
        })
    }

    fn read_credentials(&self) -> Result<Credentials, StoreError> {
        let raw = read_existing(&self.cfg.login_path, "login")?;
        let mut lines = raw.lines();
        let (Some(email), Some(password)) = (lines.next(), lines.next()) else {
            return Err(StoreError::Malformed {
                what: "login",
                reason: "expected two lines: email and password".into(),
            });
        };
        Credentials::new(email.trim(), password.trim_end_matches('\r')).map_err(|e| {
            StoreError::Malformed {
                what: "login",
                reason: e.to_string(),
            }
        })
    }

    fn record_crash(
        &self,
        at: OffsetDateTime,
        worker: WorkerId,
        report: &str,
    ) -> Result<String, StoreError> {
        let path = self.crash_path(at);
        let stamp = at.format(&Rfc3339).unwrap_or_else(|_| "<invalid-time>".into());
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        writeln!(file, "[{stamp}] {worker}\n{report}\n").map_err(io_err)?;

        debug!(path = %path.display(), "crash record written");
        Ok(path.display().to_string())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("profile not usable by runner '{runner}': {reason}")]
    InvalidProfile { runner: &'static str, reason: String },

    #[error("invalid booking target: {0}")]
    InvalidTarget(String),

    #[error("internal error: {0}")]
    Internal(String),
}

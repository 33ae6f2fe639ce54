use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),

    #[error("unknown slot order: {0}")]
    UnknownSlotOrder(String),

    #[error("empty credential field: {0}")]
    EmptyCredential(&'static str),

    #[error("player count out of range: {0} (expected 1..=4)")]
    PlayerCountOutOfRange(i32),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

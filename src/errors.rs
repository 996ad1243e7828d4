/// Domain-specific error types for the sizing calculator.
///
/// Only `InvalidInput` can stop an evaluation. Quantities that are merely
/// undefined (zero delta, missing move, non-finite ratio) are not errors:
/// they surface as `None` fields on an otherwise valid result.
#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for CalcError {
    fn from(e: std::io::Error) -> Self {
        CalcError::Io(e.to_string())
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

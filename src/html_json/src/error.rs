use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// The markup parser rejected the input.
    #[error("failed to parse HTML: {0}")]
    Parse(String),
    #[error("failed to convert to JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ConvertResult<T> = Result<T, ConvertError>;

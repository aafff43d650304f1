use thiserror::Error;

pub type RelayResult<T> = Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("upstream weather service error: {0}")]
    Upstream(String),

    #[error("publish error: {0}")]
    Publish(#[from] anyhow::Error),
}

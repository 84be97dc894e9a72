pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("message parsing failed: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("{0}")]
  Validation(String),

  #[error("system error: {0}")]
  System(String),
}

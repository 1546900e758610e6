//! Error types for `lazy-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A table name outside the closed set accepted by `delete_item`.
  #[error("unknown table: {0:?}")]
  UnknownTable(String),

  #[error("unknown work story type: {0:?}")]
  UnknownStoryKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

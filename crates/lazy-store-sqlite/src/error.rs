//! Error type for `lazy-store-sqlite`.

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A migration step failed and its transaction was rolled back.
  #[error("migration {id} failed: {source}")]
  Migration {
    id:     &'static str,
    #[source]
    source: rusqlite::Error,
  },

  #[error("migration id {0} appears more than once")]
  DuplicateMigration(&'static str),

  /// A record operation was attempted before `initialize` completed.
  #[error("store is not initialized")]
  NotInitialized,

  /// Replays the cached outcome of a failed `initialize`.
  #[error("store initialization failed: {0}")]
  Initialization(#[source] Arc<Error>),

  /// A stored row does not match the shape of its entity.
  #[error("malformed row: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

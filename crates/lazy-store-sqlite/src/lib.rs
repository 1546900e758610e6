//! SQLite backend for the LAZY history store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The single background thread also
//! serialises every write issued through a [`SqliteStore`].

mod encode;
mod store;

pub mod error;
pub mod migrate;

pub use error::{Error, Result};
pub use migrate::{MIGRATIONS, Migration, Step};
pub use store::SqliteStore;

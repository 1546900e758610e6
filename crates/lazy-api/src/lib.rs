//! JSON API for the LAZY history store.
//!
//! Exposes an axum [`Router`] backed by any [`lazy_core::store::RecordStore`].
//! Each route maps onto exactly one store operation. Binding, logging and
//! startup are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = lazy_api::api_router(Arc::new(store));
//! ```

pub mod error;
pub mod items;
pub mod meetings;
pub mod migrations;
pub mod work_stories;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, put},
};
use lazy_core::store::RecordStore;
use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Query parameters shared by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// Response body for endpoints that create a row.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
  pub id: i64,
}

/// Router over `store` with its state already applied, so it nests or serves
/// as is.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + Send + Sync + 'static,
{
  Router::new()
    // Meetings
    .route("/meetings", get(meetings::list::<S>).post(meetings::create::<S>))
    // Work stories
    .route(
      "/work-stories",
      get(work_stories::list::<S>).post(work_stories::create::<S>),
    )
    .route("/work-stories/{id}/comments", get(work_stories::comments::<S>))
    .route("/work-stories/{id}/title", put(work_stories::rename::<S>))
    // Deletion
    .route("/items/{table}/{id}", delete(items::delete::<S>))
    // Schema
    .route("/migrations", get(migrations::list::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

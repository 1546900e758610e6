//! `GET /migrations`: the applied schema migrations, ordered by id.

use std::sync::Arc;

use axum::{Json, extract::State};
use lazy_core::store::{MigrationRecord, RecordStore};

use crate::error::ApiError;

pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<MigrationRecord>>, ApiError>
where
  S: RecordStore,
{
  let records = store.applied_migrations().await.map_err(ApiError::store)?;
  Ok(Json(records))
}

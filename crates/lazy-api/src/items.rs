//! `DELETE /items/{table}/{id}`: delete a meeting or a work story.
//!
//! `table` must be `meetings` or `work_stories`; anything else is a 400 and
//! never reaches the store. Deleting a story deletes its comments too.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
};
use lazy_core::store::{RecordStore, Table};

use crate::error::ApiError;

pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path((table, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  let table: Table = table.parse()?;
  store.delete_item(table, id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

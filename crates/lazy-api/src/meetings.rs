//! Handlers for `/meetings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/meetings` | Newest first; optional `?limit=<n>` (default 50) |
//! | `POST` | `/meetings` | Body: `{"title":"..","transcript":"..","summary":".."}` |
//!
//! Meetings are deleted through `DELETE /items/meetings/{id}`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lazy_core::{
  meeting::{Meeting, NewMeeting},
  store::RecordStore,
};

use crate::{Created, ListParams, error::ApiError};

/// `GET /meetings[?limit=<n>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Meeting>>, ApiError>
where
  S: RecordStore,
{
  let meetings = store
    .list_meetings(params.limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(meetings))
}

/// `POST /meetings`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewMeeting>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let id = store.save_meeting(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

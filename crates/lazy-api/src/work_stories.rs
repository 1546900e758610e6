//! Handlers for `/work-stories` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/work-stories` | Stories only, newest first; optional `?limit=<n>` |
//! | `POST` | `/work-stories` | Body: [`NewWorkStory`]; `title` is dropped for comments |
//! | `GET`  | `/work-stories/{id}/comments` | Oldest first |
//! | `PUT`  | `/work-stories/{id}/title` | Body: `{"title":".."}`; no-op for comments |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lazy_core::{
  store::RecordStore,
  work_story::{NewWorkStory, WorkStory},
};
use serde::Deserialize;

use crate::{Created, ListParams, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /work-stories[?limit=<n>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<WorkStory>>, ApiError>
where
  S: RecordStore,
{
  let stories = store
    .list_work_stories(params.limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(stories))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /work-stories`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewWorkStory>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let id = store.save_work_story(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `GET /work-stories/{id}/comments`
pub async fn comments<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<WorkStory>>, ApiError>
where
  S: RecordStore,
{
  let comments = store.list_comments(id).await.map_err(ApiError::store)?;
  Ok(Json(comments))
}

// ─── Rename ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TitleBody {
  pub title: String,
}

/// `PUT /work-stories/{id}/title`
pub async fn rename<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<TitleBody>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  store
    .update_work_story_title(id, body.title)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

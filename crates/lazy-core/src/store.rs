//! The `RecordStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `lazy-store-sqlite`).
//! Higher layers (`lazy-api`, `lazy-server`) depend on this abstraction, not
//! on any concrete backend.

use std::{fmt, future::Future, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error,
  meeting::{Meeting, NewMeeting},
  work_story::{NewWorkStory, WorkStory},
};

/// Row cap applied by the list operations when the caller gives none.
pub const DEFAULT_LIST_LIMIT: usize = 50;

// ─── Table ───────────────────────────────────────────────────────────────────

/// The tables [`RecordStore::delete_item`] may delete from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
  Meetings,
  WorkStories,
}

impl Table {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Meetings => "meetings",
      Self::WorkStories => "work_stories",
    }
  }
}

impl fmt::Display for Table {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Table {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "meetings" => Ok(Self::Meetings),
      "work_stories" => Ok(Self::WorkStories),
      other => Err(Error::UnknownTable(other.to_owned())),
    }
  }
}

// ─── Migration ledger ────────────────────────────────────────────────────────

/// One row of the migration ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
  pub id:         String,
  pub applied_at: DateTime<Utc>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a LAZY history store backend.
///
/// Meetings are append-and-delete only. Work stories additionally support
/// renaming a story. Deleting a story removes its comments with it.
///
/// Every future is `Send`, so handlers running on a multi-threaded runtime can
/// hold a store behind an `Arc`.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Meetings ──────────────────────────────────────────────────────────

  /// Persist a meeting and return its newly assigned id.
  fn save_meeting(
    &self,
    input: NewMeeting,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Newest meetings first, at most `limit` (default
  /// [`DEFAULT_LIST_LIMIT`]) rows.
  fn list_meetings(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<Meeting>, Self::Error>> + Send + '_;

  // ── Work stories ──────────────────────────────────────────────────────

  /// Persist a story or comment and return its newly assigned id.
  fn save_work_story(
    &self,
    input: NewWorkStory,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Newest stories first, at most `limit` rows. Comments are excluded.
  fn list_work_stories(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<WorkStory>, Self::Error>> + Send + '_;

  /// Comments on `story_id` in the order they were written.
  fn list_comments(
    &self,
    story_id: i64,
  ) -> impl Future<Output = Result<Vec<WorkStory>, Self::Error>> + Send + '_;

  /// Rename a story. Does nothing when `id` is missing or names a comment.
  fn update_work_story_title(
    &self,
    id: i64,
    title: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a row by id. Deleting a story also deletes its comments, as one
  /// atomic unit.
  fn delete_item(
    &self,
    table: Table,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Contents of the migration ledger, ordered by id.
  fn applied_migrations(
    &self,
  ) -> impl Future<Output = Result<Vec<MigrationRecord>, Self::Error>> + Send + '_;
}

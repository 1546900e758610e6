//! Decoding helpers between SQLite rows and the domain types.
//!
//! Rows are first read into `Raw*` structs holding exactly what SQLite gave
//! back, then validated into domain types. A row that does not fit its entity
//! fails with [`Error::Decode`] instead of leaking a half-typed value.
//!
//! Timestamps are written by SQLite's `CURRENT_TIMESTAMP` default
//! (`YYYY-MM-DD HH:MM:SS`, UTC). RFC 3339 is accepted as well.

use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_core::{
  meeting::Meeting,
  store::MigrationRecord,
  work_story::{WorkStory, WorkStoryKind},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(s, SQLITE_DATETIME)
    .map(|naive| naive.and_utc())
    .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── WorkStoryKind ───────────────────────────────────────────────────────────

pub fn encode_kind(kind: WorkStoryKind) -> &'static str { kind.as_str() }

pub fn decode_kind(s: &str) -> Result<WorkStoryKind> {
  s.parse().map_err(|e: lazy_core::Error| Error::Decode(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `meetings` row.
pub struct RawMeeting {
  pub id:         i64,
  pub title:      String,
  pub transcript: Option<String>,
  pub summary:    Option<String>,
  pub created_at: String,
}

impl RawMeeting {
  pub const COLUMNS: &'static str = "id, title, transcript, summary, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      title:      row.get(1)?,
      transcript: row.get(2)?,
      summary:    row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_meeting(self) -> Result<Meeting> {
    Ok(Meeting {
      id:         self.id,
      title:      self.title,
      // Nullable in the schema; NULL reads back as empty text.
      transcript: self.transcript.unwrap_or_default(),
      summary:    self.summary.unwrap_or_default(),
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `work_stories` row.
pub struct RawWorkStory {
  pub id:         i64,
  pub kind:       String,
  pub title:      Option<String>,
  pub overview:   Option<String>,
  pub output:     Option<String>,
  pub parent_id:  Option<i64>,
  pub created_at: String,
}

impl RawWorkStory {
  pub const COLUMNS: &'static str =
    "id, type, title, overview, output, parent_id, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      kind:       row.get(1)?,
      title:      row.get(2)?,
      overview:   row.get(3)?,
      output:     row.get(4)?,
      parent_id:  row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_work_story(self) -> Result<WorkStory> {
    Ok(WorkStory {
      id:         self.id,
      kind:       decode_kind(&self.kind)?,
      title:      self.title,
      overview:   self.overview.unwrap_or_default(),
      output:     self.output.unwrap_or_default(),
      parent_id:  self.parent_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `schema_migrations` row.
pub struct RawMigration {
  pub id:         String,
  pub applied_at: String,
}

impl RawMigration {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, applied_at: row.get(1)? })
  }

  pub fn into_record(self) -> Result<MigrationRecord> {
    Ok(MigrationRecord {
      applied_at: decode_dt(&self.applied_at)?,
      id:         self.id,
    })
  }
}

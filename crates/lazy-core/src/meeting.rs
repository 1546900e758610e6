//! Meetings: saved transcription sessions.
//!
//! A meeting is written once and never updated in place. It is either listed
//! or deleted by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted meeting row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
  pub id:         i64,
  pub title:      String,
  pub transcript: String,
  /// Derived text; empty until a summary has been generated.
  pub summary:    String,
  pub created_at: DateTime<Utc>,
}

/// Input for [`RecordStore::save_meeting`](crate::store::RecordStore::save_meeting).
///
/// No validation is applied: empty strings are stored as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMeeting {
  pub title:      String,
  #[serde(default)]
  pub transcript: String,
  #[serde(default)]
  pub summary:    String,
}

impl NewMeeting {
  pub fn new(
    title: impl Into<String>,
    transcript: impl Into<String>,
    summary: impl Into<String>,
  ) -> Self {
    Self {
      title:      title.into(),
      transcript: transcript.into(),
      summary:    summary.into(),
    }
  }
}

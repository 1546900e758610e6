//! Work stories: dictated tickets and the comment threads attached to them.
//!
//! Stories and comments share one table and one row shape. The `kind` tag and
//! the `parent_id` reference tell them apart. Comments hang directly off a
//! story; there is no deeper nesting.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The role a work story row plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStoryKind {
  /// A top-level ticket. Carries the title.
  Story,
  /// A note attached to a story through `parent_id`. Never titled.
  Comment,
}

impl WorkStoryKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Story => "story",
      Self::Comment => "comment",
    }
  }
}

impl fmt::Display for WorkStoryKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for WorkStoryKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "story" => Ok(Self::Story),
      "comment" => Ok(Self::Comment),
      other => Err(Error::UnknownStoryKind(other.to_owned())),
    }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A persisted work story row: either a story or a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkStory {
  pub id:         i64,
  #[serde(rename = "type")]
  pub kind:       WorkStoryKind,
  pub title:      Option<String>,
  /// The raw dictated or typed input.
  pub overview:   String,
  /// The generated, polished text.
  pub output:     String,
  pub parent_id:  Option<i64>,
  pub created_at: DateTime<Utc>,
}

/// Input for [`RecordStore::save_work_story`](crate::store::RecordStore::save_work_story).
///
/// `title` is only persisted for stories. A title supplied alongside
/// [`WorkStoryKind::Comment`] is dropped by the store. `parent_id` is stored
/// as given; the store does not check that the parent exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkStory {
  #[serde(rename = "type")]
  pub kind:      WorkStoryKind,
  #[serde(default)]
  pub overview:  String,
  #[serde(default)]
  pub output:    String,
  #[serde(default)]
  pub parent_id: Option<i64>,
  #[serde(default)]
  pub title:     Option<String>,
}

impl NewWorkStory {
  /// A top-level story without a title.
  pub fn story(overview: impl Into<String>, output: impl Into<String>) -> Self {
    Self {
      kind:      WorkStoryKind::Story,
      overview:  overview.into(),
      output:    output.into(),
      parent_id: None,
      title:     None,
    }
  }

  /// A comment on the story `parent_id`.
  pub fn comment(
    parent_id: i64,
    overview: impl Into<String>,
    output: impl Into<String>,
  ) -> Self {
    Self {
      kind:      WorkStoryKind::Comment,
      overview:  overview.into(),
      output:    output.into(),
      parent_id: Some(parent_id),
      title:     None,
    }
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }

  /// The title that will actually be written for this input.
  pub fn persisted_title(&self) -> Option<&str> {
    match self.kind {
      WorkStoryKind::Story => self.title.as_deref(),
      WorkStoryKind::Comment => None,
    }
  }
}

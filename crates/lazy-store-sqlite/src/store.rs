//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::{path::Path, sync::Arc};

use lazy_core::{
  meeting::{Meeting, NewMeeting},
  store::{DEFAULT_LIST_LIMIT, MigrationRecord, RecordStore, Table},
  work_story::{NewWorkStory, WorkStory},
};
use tokio::sync::OnceCell;

use crate::{
  Error, Result,
  encode::{RawMeeting, RawMigration, RawWorkStory, encode_kind},
  migrate::{self, MIGRATIONS, Migration},
};

/// Per-connection settings, applied when the file is opened.
const PRAGMAS: &str = "PRAGMA journal_mode = WAL;";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A LAZY history store backed by a single SQLite file.
///
/// Opening a store only connects. [`SqliteStore::initialize`] must complete
/// before any record operation; until then they fail with
/// [`Error::NotInitialized`].
///
/// Clones share the background connection and the initialisation state.
#[derive(Clone)]
pub struct SqliteStore {
  conn:       tokio_rusqlite::Connection,
  migrations: &'static [Migration],
  init:       Arc<OnceCell<Result<(), Arc<Error>>>>,
}

impl SqliteStore {
  /// Open (or create) the database file at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::connected(conn).await
  }

  /// Open a private in-memory database, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::connected(conn).await
  }

  async fn connected(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(())
      })
      .await?;

    Ok(Self {
      conn,
      migrations: MIGRATIONS,
      init: Arc::new(OnceCell::new()),
    })
  }

  /// Replace the migration list run by [`SqliteStore::initialize`].
  ///
  /// Has no effect once initialisation has started.
  pub fn with_migrations(mut self, migrations: &'static [Migration]) -> Self {
    self.migrations = migrations;
    self
  }

  /// Run pending migrations. Idempotent and single-flight: concurrent callers
  /// share one run, and its outcome (including failure) is kept for the
  /// lifetime of the store.
  pub async fn initialize(&self) -> Result<()> {
    let outcome = self
      .init
      .get_or_init(|| async { self.migrate().await.map_err(Arc::new) })
      .await;
    outcome.clone().map_err(Error::Initialization)
  }

  async fn migrate(&self) -> Result<()> {
    let migrations = self.migrations;
    let applied = self
      .conn
      .call(move |conn| Ok(migrate::run(conn, migrations)))
      .await??;

    tracing::info!(
      applied = applied.len(),
      known = migrations.len(),
      "schema is up to date"
    );
    Ok(())
  }

  fn ensure_ready(&self) -> Result<()> {
    match self.init.get() {
      Some(Ok(())) => Ok(()),
      Some(Err(e)) => Err(Error::Initialization(e.clone())),
      None => Err(Error::NotInitialized),
    }
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Meetings ──────────────────────────────────────────────────────────────

  async fn save_meeting(&self, input: NewMeeting) -> Result<i64> {
    self.ensure_ready()?;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO meetings (title, transcript, summary) VALUES (?1, ?2, ?3)",
          rusqlite::params![input.title, input.transcript, input.summary],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(id)
  }

  async fn list_meetings(&self, limit: Option<usize>) -> Result<Vec<Meeting>> {
    self.ensure_ready()?;
    let limit_val = limit.unwrap_or(DEFAULT_LIST_LIMIT) as i64;

    let raws: Vec<RawMeeting> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM meetings
           ORDER BY created_at DESC, id DESC
           LIMIT ?1",
          RawMeeting::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawMeeting::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMeeting::into_meeting).collect()
  }

  // ── Work stories ──────────────────────────────────────────────────────────

  async fn save_work_story(&self, input: NewWorkStory) -> Result<i64> {
    self.ensure_ready()?;

    let kind_str  = encode_kind(input.kind);
    let title     = input.persisted_title().map(str::to_owned);
    let overview  = input.overview;
    let output    = input.output;
    let parent_id = input.parent_id;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO work_stories (type, title, overview, output, parent_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![kind_str, title, overview, output, parent_id],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(id)
  }

  async fn list_work_stories(&self, limit: Option<usize>) -> Result<Vec<WorkStory>> {
    self.ensure_ready()?;
    let limit_val = limit.unwrap_or(DEFAULT_LIST_LIMIT) as i64;

    let raws: Vec<RawWorkStory> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM work_stories
           WHERE type = 'story'
           ORDER BY created_at DESC, id DESC
           LIMIT ?1",
          RawWorkStory::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawWorkStory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWorkStory::into_work_story).collect()
  }

  async fn list_comments(&self, story_id: i64) -> Result<Vec<WorkStory>> {
    self.ensure_ready()?;

    // Oldest first: comments read as a thread.
    let raws: Vec<RawWorkStory> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM work_stories
           WHERE type = 'comment' AND parent_id = ?1
           ORDER BY created_at ASC, id ASC",
          RawWorkStory::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![story_id], RawWorkStory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWorkStory::into_work_story).collect()
  }

  async fn update_work_story_title(&self, id: i64, title: String) -> Result<()> {
    self.ensure_ready()?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE work_stories SET title = ?1 WHERE id = ?2 AND type = 'story'",
          rusqlite::params![title, id],
        )?)
      })
      .await?;

    if changed == 0 {
      tracing::debug!(id, "no story to rename");
    }
    Ok(())
  }

  async fn delete_item(&self, table: Table, id: i64) -> Result<()> {
    self.ensure_ready()?;

    self
      .conn
      .call(move |conn| {
        match table {
          Table::Meetings => {
            conn.execute("DELETE FROM meetings WHERE id = ?1", rusqlite::params![id])?;
          }
          Table::WorkStories => {
            // Comments first, then the row itself, as one unit.
            let tx = conn.transaction()?;
            tx.execute(
              "DELETE FROM work_stories WHERE parent_id = ?1",
              rusqlite::params![id],
            )?;
            tx.execute("DELETE FROM work_stories WHERE id = ?1", rusqlite::params![id])?;
            tx.commit()?;
          }
        }
        Ok(())
      })
      .await?;

    tracing::debug!(%table, id, "deleted item");
    Ok(())
  }

  // ── Schema ────────────────────────────────────────────────────────────────

  /// Readable before and after a failed [`SqliteStore::initialize`], so a
  /// broken startup can be inspected. Fails if the ledger was never created.
  async fn applied_migrations(&self) -> Result<Vec<MigrationRecord>> {
    let raws: Vec<RawMigration> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, applied_at FROM schema_migrations ORDER BY id")?;
        let rows = stmt
          .query_map([], RawMigration::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMigration::into_record).collect()
  }
}

//! Forward-only schema migrations tracked in the `schema_migrations` ledger.
//!
//! Each [`Migration`] is applied at most once, inside its own transaction that
//! also writes the ledger row. A failing step rolls the transaction back, so
//! the migration stays unapplied and is attempted again on the next start.
//!
//! Released migrations are replayed on every fresh install: never edit one,
//! append a new id instead.

use std::collections::HashSet;

use rusqlite::{Connection, OptionalExtension as _};

use crate::{Error, Result};

/// Ledger DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
const LEDGER: &str = "
CREATE TABLE IF NOT EXISTS schema_migrations (
    id         TEXT PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
";

/// One schema change.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
  /// Stable, lexically sortable, never reused.
  pub id:   &'static str,
  pub step: Step,
}

/// What a migration does to the schema.
#[derive(Debug, Clone, Copy)]
pub enum Step {
  /// Run a batch of SQL statements.
  Sql(&'static str),
  /// Add a column unless the live table already has it.
  ///
  /// The check reads `pragma_table_info`, not the ledger, so a column left
  /// behind by a manual or interrupted change is not added twice.
  AddColumn {
    table:      &'static str,
    column:     &'static str,
    definition: &'static str,
  },
}

impl Step {
  fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
    match *self {
      Step::Sql(sql) => conn.execute_batch(sql),
      Step::AddColumn { table, column, definition } => {
        if column_exists(conn, table, column)? {
          tracing::debug!(table, column, "column already present, skipping ALTER");
          return Ok(());
        }
        conn.execute_batch(&format!(
          "ALTER TABLE {table} ADD COLUMN {column} {definition}"
        ))
      }
    }
  }
}

/// The shipped migrations, in apply order.
pub const MIGRATIONS: &[Migration] = &[
  Migration {
    id:   "001_create_meetings",
    step: Step::Sql(
      "CREATE TABLE IF NOT EXISTS meetings (
           id         INTEGER PRIMARY KEY AUTOINCREMENT,
           title      TEXT NOT NULL,
           transcript TEXT,
           summary    TEXT,
           created_at DATETIME DEFAULT CURRENT_TIMESTAMP
       );",
    ),
  },
  Migration {
    id:   "002_create_work_stories",
    step: Step::Sql(
      "CREATE TABLE IF NOT EXISTS work_stories (
           id         INTEGER PRIMARY KEY AUTOINCREMENT,
           type       TEXT NOT NULL,   -- 'story' | 'comment'
           overview   TEXT,
           output     TEXT,
           created_at DATETIME DEFAULT CURRENT_TIMESTAMP
       );",
    ),
  },
  Migration {
    id:   "003_add_work_stories_parent_id",
    step: Step::AddColumn {
      table:      "work_stories",
      column:     "parent_id",
      definition: "INTEGER",
    },
  },
  Migration {
    id:   "004_add_work_stories_title",
    step: Step::AddColumn {
      table:      "work_stories",
      column:     "title",
      definition: "TEXT",
    },
  },
];

/// Bring the schema up to date with `migrations`.
///
/// Returns the ids applied by this call, in order. Ids already in the ledger
/// are skipped. Stops at the first failure; migrations before it stay applied.
pub fn run(
  conn: &mut Connection,
  migrations: &[Migration],
) -> Result<Vec<&'static str>> {
  check_unique(migrations)?;

  conn.execute_batch(LEDGER)?;
  let applied = applied_ids(conn)?;

  let mut newly_applied = Vec::new();
  for migration in migrations {
    if applied.contains(migration.id) {
      tracing::debug!(id = migration.id, "migration already applied");
      continue;
    }
    apply(conn, migration)?;
    tracing::info!(id = migration.id, "applied migration");
    newly_applied.push(migration.id);
  }

  Ok(newly_applied)
}

fn check_unique(migrations: &[Migration]) -> Result<()> {
  let mut seen = HashSet::new();
  for migration in migrations {
    if !seen.insert(migration.id) {
      return Err(Error::DuplicateMigration(migration.id));
    }
  }
  Ok(())
}

fn applied_ids(conn: &Connection) -> Result<HashSet<String>> {
  let mut stmt = conn.prepare("SELECT id FROM schema_migrations")?;
  let ids = stmt
    .query_map([], |row| row.get(0))?
    .collect::<rusqlite::Result<HashSet<String>>>()?;
  Ok(ids)
}

/// Apply one migration and record it, all or nothing.
fn apply(conn: &mut Connection, migration: &Migration) -> Result<()> {
  let failed = |source| Error::Migration { id: migration.id, source };

  // Dropping `tx` without committing rolls it back.
  let tx = conn.transaction()?;
  migration.step.apply(&tx).map_err(failed)?;
  tx.execute(
    "INSERT INTO schema_migrations (id) VALUES (?1)",
    rusqlite::params![migration.id],
  )
  .map_err(failed)?;
  tx.commit().map_err(failed)?;

  Ok(())
}

fn column_exists(
  conn: &Connection,
  table: &str,
  column: &str,
) -> rusqlite::Result<bool> {
  let found = conn
    .query_row(
      "SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2",
      rusqlite::params![table, column],
      |_| Ok(()),
    )
    .optional()?;
  Ok(found.is_some())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ledger(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
      .prepare("SELECT id FROM schema_migrations ORDER BY id")
      .unwrap();
    stmt
      .query_map([], |row| row.get(0))
      .unwrap()
      .collect::<rusqlite::Result<Vec<String>>>()
      .unwrap()
  }

  #[test]
  fn applies_shipped_migrations_in_order() {
    let mut conn = Connection::open_in_memory().unwrap();
    let applied = run(&mut conn, MIGRATIONS).unwrap();
    assert_eq!(
      applied,
      [
        "001_create_meetings",
        "002_create_work_stories",
        "003_add_work_stories_parent_id",
        "004_add_work_stories_title",
      ]
    );
    assert!(column_exists(&conn, "work_stories", "parent_id").unwrap());
    assert!(column_exists(&conn, "work_stories", "title").unwrap());
  }

  #[test]
  fn second_run_applies_nothing() {
    let mut conn = Connection::open_in_memory().unwrap();
    run(&mut conn, MIGRATIONS).unwrap();
    let applied = run(&mut conn, MIGRATIONS).unwrap();
    assert!(applied.is_empty());
    assert_eq!(ledger(&conn).len(), MIGRATIONS.len());
  }

  #[test]
  fn add_column_checks_live_schema() {
    let mut conn = Connection::open_in_memory().unwrap();
    // A table that already has the column, with no ledger entry for it.
    conn
      .execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);")
      .unwrap();

    let list = [Migration {
      id:   "001_add_notes_body",
      step: Step::AddColumn { table: "notes", column: "body", definition: "TEXT" },
    }];
    assert_eq!(run(&mut conn, &list).unwrap(), ["001_add_notes_body"]);
    assert_eq!(ledger(&conn), ["001_add_notes_body"]);
  }

  #[test]
  fn failed_step_leaves_no_ledger_row() {
    let mut conn = Connection::open_in_memory().unwrap();
    let list = [
      Migration { id: "001_ok", step: Step::Sql("CREATE TABLE a (x INTEGER);") },
      Migration {
        id:   "002_broken",
        step: Step::Sql("CREATE TABLE b (y INTEGER); CREATE TABLE oops (;"),
      },
    ];

    let err = run(&mut conn, &list).unwrap_err();
    assert!(matches!(err, Error::Migration { id: "002_broken", .. }));
    assert_eq!(ledger(&conn), ["001_ok"]);
    // The partial `CREATE TABLE b` was rolled back with the rest.
    assert!(!column_exists(&conn, "b", "y").unwrap());
  }

  #[test]
  fn duplicate_ids_are_rejected_up_front() {
    let mut conn = Connection::open_in_memory().unwrap();
    let list = [
      Migration { id: "001_a", step: Step::Sql("CREATE TABLE a (x INTEGER);") },
      Migration { id: "001_a", step: Step::Sql("CREATE TABLE b (x INTEGER);") },
    ];
    let err = run(&mut conn, &list).unwrap_err();
    assert!(matches!(err, Error::DuplicateMigration("001_a")));
    assert!(!column_exists(&conn, "a", "x").unwrap());
  }
}

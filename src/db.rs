use std::path::Path;
use std::time::Duration;

use chrono::prelude::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::AppError;
use crate::model::{Todo, TodoInput};

pub const TODO_COLUMNS: &str =
  "id, title, description, due_date, resolved, created_at, updated_at";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todo (
  id          INTEGER PRIMARY KEY AUTOINCREMENT,
  title       TEXT NOT NULL CHECK (length(trim(title)) > 0 AND length(title) <= 200),
  description TEXT NOT NULL DEFAULT '',
  due_date    TEXT,
  resolved    INTEGER NOT NULL DEFAULT 0,
  created_at  TEXT NOT NULL,
  updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS todo_due_created ON todo (due_date, created_at);";

/// Handle to the todo table. Cloning is cheap: clones share one pool.
#[derive(Clone)]
pub struct TodoStore {
  pool: Pool<SqliteConnectionManager>,
}

impl TodoStore {
  pub fn open(path: impl AsRef<Path>, pool_size: u32) -> Result<Self, AppError> {
    let manager = SqliteConnectionManager::file(path.as_ref())
      .with_init(|conn| conn.busy_timeout(Duration::from_secs(5)));
    let pool = Pool::builder().max_size(pool_size).build(manager)?;
    Self::with_pool(pool)
  }

  /// A private in-memory database. The pool holds a single connection since
  /// every SQLite `:memory:` connection is its own database.
  pub fn in_memory() -> Result<Self, AppError> {
    let pool = Pool::builder()
      .max_size(1)
      .build(SqliteConnectionManager::memory())?;
    Self::with_pool(pool)
  }

  fn with_pool(pool: Pool<SqliteConnectionManager>) -> Result<Self, AppError> {
    pool.get()?.execute_batch(SCHEMA)?;
    Ok(TodoStore { pool })
  }

  /// Due date first (undated last), then newest first.
  pub fn list(&self) -> Result<Vec<Todo>, AppError> {
    let conn = self.pool.get()?;
    let mut stmt = conn.prepare(&format!(
      "SELECT {} FROM todo
       ORDER BY due_date IS NULL, due_date ASC, created_at DESC, id DESC",
      TODO_COLUMNS
    ))?;
    let todos = stmt
      .query_map([], Todo::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(todos)
  }

  pub fn get(&self, id: i64) -> Result<Todo, AppError> {
    let conn = self.pool.get()?;
    find(&conn, id)
  }

  pub fn create(&self, input: &TodoInput) -> Result<Todo, AppError> {
    let conn = self.pool.get()?;
    let now = Utc::now();
    conn.execute(
      "INSERT INTO todo (title, description, due_date, resolved, created_at, updated_at)
       VALUES (?1, ?2, ?3, 0, ?4, ?4)",
      params![input.title, input.description, input.due_date, now],
    )?;
    Ok(Todo {
      id: conn.last_insert_rowid(),
      title: input.title.clone(),
      description: input.description.clone(),
      due_date: input.due_date,
      resolved: false,
      created_at: now,
      updated_at: now,
    })
  }

  pub fn update(&self, id: i64, input: &TodoInput) -> Result<Todo, AppError> {
    let conn = self.pool.get()?;
    let stamp = next_stamp(&conn, id)?;
    let changed = conn.execute(
      "UPDATE todo
       SET title = ?2, description = ?3, due_date = ?4,
           resolved = COALESCE(?5, resolved), updated_at = ?6
       WHERE id = ?1",
      params![
        id,
        input.title,
        input.description,
        input.due_date,
        input.resolved,
        stamp
      ],
    )?;
    if changed == 0 {
      return Err(AppError::NotFound(id));
    }
    find(&conn, id)
  }

  pub fn toggle_resolved(&self, id: i64) -> Result<Todo, AppError> {
    let conn = self.pool.get()?;
    let stamp = next_stamp(&conn, id)?;
    let changed = conn.execute(
      "UPDATE todo SET resolved = NOT resolved, updated_at = ?2 WHERE id = ?1",
      params![id, stamp],
    )?;
    if changed == 0 {
      return Err(AppError::NotFound(id));
    }
    find(&conn, id)
  }

  pub fn delete(&self, id: i64) -> Result<(), AppError> {
    let conn = self.pool.get()?;
    match conn.execute("DELETE FROM todo WHERE id = ?1", [id])? {
      0 => Err(AppError::NotFound(id)),
      _ => Ok(()),
    }
  }
}

fn find(conn: &Connection, id: i64) -> Result<Todo, AppError> {
  conn
    .query_row(
      &format!("SELECT {} FROM todo WHERE id = ?1", TODO_COLUMNS),
      [id],
      Todo::from_row,
    )
    .optional()?
    .ok_or(AppError::NotFound(id))
}

/// Timestamp for the next mutation of `id`, strictly after the stored one
/// even when the wall clock has not moved (or moved backwards).
fn next_stamp(conn: &Connection, id: i64) -> Result<DateTime<Utc>, AppError> {
  let previous: DateTime<Utc> = conn
    .query_row("SELECT updated_at FROM todo WHERE id = ?1", [id], |row| {
      row.get(0)
    })
    .optional()?
    .ok_or(AppError::NotFound(id))?;
  let now = Utc::now();
  if now > previous {
    Ok(now)
  } else {
    Ok(previous + chrono::Duration::microseconds(1))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn input(title: &str, due: Option<NaiveDate>) -> TodoInput {
    TodoInput {
      title: title.to_string(),
      description: String::new(),
      due_date: due,
      resolved: None,
    }
  }

  fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
  }

  #[test]
  fn create_persists_unresolved_todo() {
    let store = TodoStore::in_memory().unwrap();
    let created = store.create(&input("Buy milk", None)).unwrap();

    let stored = store.get(created.id).unwrap();
    assert_eq!(stored, created);
    assert_eq!(stored.title, "Buy milk");
    assert!(!stored.resolved);
    assert_eq!(stored.description, "");
    assert_eq!(stored.due_date, None);
    assert_eq!(stored.created_at, stored.updated_at);
  }

  #[test]
  fn create_ignores_requested_resolution() {
    let store = TodoStore::in_memory().unwrap();
    let mut new = input("x", None);
    new.resolved = Some(true);
    assert!(!store.create(&new).unwrap().resolved);
  }

  #[test]
  fn schema_rejects_blank_title() {
    let store = TodoStore::in_memory().unwrap();
    assert!(matches!(
      store.create(&input("   ", None)),
      Err(AppError::Database(_))
    ));
    assert!(store.list().unwrap().is_empty());
  }

  #[test]
  fn toggle_twice_restores_flag_and_advances_stamp() {
    let store = TodoStore::in_memory().unwrap();
    let todo = store.create(&input("Toggle", None)).unwrap();

    let once = store.toggle_resolved(todo.id).unwrap();
    assert!(once.resolved);
    assert!(once.updated_at > todo.updated_at);

    let twice = store.toggle_resolved(todo.id).unwrap();
    assert!(!twice.resolved);
    assert!(twice.updated_at > once.updated_at);
    assert_eq!(twice.created_at, todo.created_at);
  }

  #[test]
  fn update_rewrites_fields_but_not_creation() {
    let store = TodoStore::in_memory().unwrap();
    let todo = store.create(&input("Original", None)).unwrap();

    let mut change = input("Updated", date(2030, 1, 2));
    change.description = "more".to_string();
    let updated = store.update(todo.id, &change).unwrap();

    assert_eq!(updated.title, "Updated");
    assert_eq!(updated.description, "more");
    assert_eq!(updated.due_date, date(2030, 1, 2));
    assert!(!updated.resolved);
    assert_eq!(updated.created_at, todo.created_at);
    assert!(updated.updated_at > todo.updated_at);

    change.resolved = Some(true);
    assert!(store.update(todo.id, &change).unwrap().resolved);
    change.resolved = None;
    assert!(store.update(todo.id, &change).unwrap().resolved);
  }

  #[test]
  fn deleted_todo_is_not_found_everywhere() {
    let store = TodoStore::in_memory().unwrap();
    let todo = store.create(&input("Gone", None)).unwrap();
    store.delete(todo.id).unwrap();

    assert!(matches!(store.get(todo.id), Err(AppError::NotFound(id)) if id == todo.id));
    assert!(matches!(
      store.update(todo.id, &input("x", None)),
      Err(AppError::NotFound(_))
    ));
    assert!(matches!(
      store.toggle_resolved(todo.id),
      Err(AppError::NotFound(_))
    ));
    assert!(matches!(store.delete(todo.id), Err(AppError::NotFound(_))));
  }

  #[test]
  fn list_orders_by_due_date_then_newest() {
    let store = TodoStore::in_memory().unwrap();
    let undated_old = store.create(&input("undated old", None)).unwrap();
    let late = store.create(&input("late", date(2030, 5, 1))).unwrap();
    let undated_new = store.create(&input("undated new", None)).unwrap();
    let early = store.create(&input("early", date(2030, 1, 1))).unwrap();
    let gone = store.create(&input("gone", date(2029, 1, 1))).unwrap();
    store.delete(gone.id).unwrap();

    let ids: Vec<i64> = store.list().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![early.id, late.id, undated_new.id, undated_old.id]);
  }
}

//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and reorder APIs over the `tasks` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `delete_task` on a missing key is a no-op, not an error.
//! - `reorder_tasks` runs as one transaction and skips ids that are no
//!   longer present instead of failing the whole operation.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskValidationError};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    text,
    done,
    sort_order
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Outcome of one reorder transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderReport {
    /// Rows whose position was rewritten.
    pub updated: usize,
    /// Ids from the requested sequence that were missing from the store.
    pub skipped: usize,
}

/// Repository interface for task CRUD and reorder operations.
pub trait TaskRepository {
    /// Returns every task in store key order (`id` ascending).
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Returns the current row count in its own read transaction.
    fn count_tasks(&self) -> RepoResult<i64>;
    /// Inserts a new record; fails on a duplicate key.
    fn insert_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Overwrites the full record, inserting when the key is absent.
    fn put_task(&self, task: &Task) -> RepoResult<()>;
    /// Point read by key.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Removes a record by key; a missing key is a no-op.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Rewrites `sort_order` to each id's position in the given sequence,
    /// all within one transaction.
    fn reorder_tasks(&self, ids: &[TaskId]) -> RepoResult<ReorderReport>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn count_tasks(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn insert_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (id, text, done, sort_order)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.id,
                task.text.as_str(),
                bool_to_int(task.done),
                task.sort_order,
            ],
        )?;

        Ok(task.id)
    }

    fn put_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        // Full-record overwrite, not a partial patch.
        self.conn.execute(
            "INSERT OR REPLACE INTO tasks (id, text, done, sort_order)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.id,
                task.text.as_str(),
                bool_to_int(task.done),
                task.sort_order,
            ],
        )?;

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", params![id])?;
        if changed == 0 {
            debug!("event=task_delete module=repo status=ok note=missing_key id={id}");
        }
        Ok(())
    }

    fn reorder_tasks(&self, ids: &[TaskId]) -> RepoResult<ReorderReport> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let mut report = ReorderReport {
            updated: 0,
            skipped: 0,
        };
        for (position, id) in ids.iter().enumerate() {
            // Read-modify-write per row: a row that vanished between the
            // drag and the commit is skipped, later rows keep their
            // sequence index.
            let Some(mut task) = get_task_in_tx(&tx, *id)? else {
                debug!("event=task_reorder module=repo status=ok note=missing_row id={id}");
                report.skipped += 1;
                continue;
            };
            task.sort_order = Some(position as i64);
            tx.execute(
                "INSERT OR REPLACE INTO tasks (id, text, done, sort_order)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    task.id,
                    task.text.as_str(),
                    bool_to_int(task.done),
                    task.sort_order,
                ],
            )?;
            report.updated += 1;
        }

        tx.commit()?;
        Ok(report)
    }
}

fn get_task_in_tx(tx: &Transaction<'_>, id: TaskId) -> RepoResult<Option<Task>> {
    let mut stmt = tx.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_task_row(row)?));
    }
    Ok(None)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other}` in tasks.done"
            )));
        }
    };

    let task = Task {
        id: row.get("id")?,
        text: row.get("text")?,
        done,
        sort_order: row.get("sort_order")?,
    };
    task.validate()?;
    Ok(task)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

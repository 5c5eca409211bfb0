//! Task repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Owner lists are ordered by `time_to_start ASC, done ASC, id ASC`.
//! - `update_task` never touches `token` or `owner`.

use crate::model::owner::OwnerId;
use crate::model::task::Task;
use crate::model::token::Token;
use crate::repo::{
    bool_to_int, ensure_tables, map_insert_error, read_flag, read_owner, read_token, ListWindow,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

/// Column list shared with joined queries; callers alias `tasks` as `t`.
pub(crate) const TASK_COLUMNS_SQL: &str = "t.token AS token,
    t.owner AS owner,
    t.name AS name,
    t.detail AS detail,
    t.time_to_start AS time_to_start,
    t.done AS done";

/// Canonical task list ordering.
pub(crate) const TASK_ORDER_SQL: &str = " ORDER BY t.time_to_start ASC, t.done ASC, t.id ASC";

/// Repository interface for task persistence.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<()>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, token: &Token) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, owner: &OwnerId, window: ListWindow) -> RepoResult<Vec<Task>>;
    fn count_tasks(&self, owner: &OwnerId) -> RepoResult<u64>;
    /// Owner's tasks whose name contains `needle`, ignoring case.
    fn search_tasks(&self, owner: &OwnerId, needle: &str) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, token: &Token) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["tasks"])?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<()> {
        insert_task(self.conn, task)?;
        Ok(())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                name = ?1,
                detail = ?2,
                time_to_start = ?3,
                done = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE token = ?5;",
            params![
                task.name.as_str(),
                task.detail.as_str(),
                task.time_to_start,
                bool_to_int(task.done),
                task.token.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.token.clone()));
        }

        Ok(())
    }

    fn get_task(&self, token: &Token) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS_SQL}
             FROM tasks t
             WHERE t.token = ?1;"
        ))?;

        let mut rows = stmt.query([token.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, owner: &OwnerId, window: ListWindow) -> RepoResult<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS_SQL}
             FROM tasks t
             WHERE t.owner = ?1{TASK_ORDER_SQL}{}",
            window.sql_suffix()
        );
        collect_tasks(self.conn, &sql, owner)
    }

    fn count_tasks(&self, owner: &OwnerId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE owner = ?1;",
            [owner.as_str()],
            |row| row.get(0),
        )?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }

    fn search_tasks(&self, owner: &OwnerId, needle: &str) -> RepoResult<Vec<Task>> {
        // SQLite's LIKE only folds ASCII, so matching happens here.
        let needle = needle.to_lowercase();
        let sql = format!(
            "SELECT {TASK_COLUMNS_SQL}
             FROM tasks t
             WHERE t.owner = ?1{TASK_ORDER_SQL}"
        );
        let mut tasks = collect_tasks(self.conn, &sql, owner)?;
        tasks.retain(|task| task.name.to_lowercase().contains(needle.as_str()));
        Ok(tasks)
    }

    fn delete_task(&self, token: &Token) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE token = ?1;", [token.as_str()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(token.clone()));
        }

        Ok(())
    }
}

/// Inserts one task row and returns its internal row id.
pub(crate) fn insert_task(conn: &Connection, task: &Task) -> RepoResult<i64> {
    task.validate()?;

    conn.execute(
        "INSERT INTO tasks (
            token,
            owner,
            name,
            detail,
            time_to_start,
            done
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            task.token.as_str(),
            task.owner.as_str(),
            task.name.as_str(),
            task.detail.as_str(),
            task.time_to_start,
            bool_to_int(task.done),
        ],
    )
    .map_err(|err| map_insert_error(err, &task.token))?;

    Ok(conn.last_insert_rowid())
}

/// Runs a task select whose only parameter is the owner.
pub(crate) fn collect_tasks(conn: &Connection, sql: &str, owner: &OwnerId) -> RepoResult<Vec<Task>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([owner.as_str()])?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

pub(crate) fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let task = Task {
        token: read_token(row, "tasks")?,
        owner: read_owner(row, "tasks")?,
        name: row.get("name")?,
        detail: row.get("detail")?,
        time_to_start: row.get("time_to_start")?,
        done: read_flag(row, "done", "tasks")?,
    };
    task.validate()?;
    Ok(task)
}

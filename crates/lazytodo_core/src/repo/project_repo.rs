//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist projects and their task collection (`project_tasks`).
//! - Own the multi-row writes: project-task creation and cascade delete.
//!
//! # Invariants
//! - A task is linked only to a project with the same owner.
//! - Owner lists are ordered by `status ASC, id ASC`.

use crate::model::owner::OwnerId;
use crate::model::project::{Project, ProjectStatus, DEADLINE_FORMAT};
use crate::model::task::Task;
use crate::model::token::Token;
use crate::repo::cascade::cascade_delete_project;
use crate::repo::task_repo::{insert_task, parse_task_row, TASK_COLUMNS_SQL, TASK_ORDER_SQL};
use crate::repo::{
    ensure_tables, map_insert_error, read_owner, read_token, ListWindow, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const PROJECT_SELECT_SQL: &str = "SELECT
    token,
    owner,
    name,
    detail,
    deadline,
    status
FROM projects";

/// Repository interface for projects and their task collections.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<()>;
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, token: &Token) -> RepoResult<Option<Project>>;
    fn list_projects(&self, owner: &OwnerId, window: ListWindow) -> RepoResult<Vec<Project>>;
    fn count_projects(&self, owner: &OwnerId) -> RepoResult<u64>;
    /// Linked tasks of `project` owned by `owner`, in task list order.
    fn list_project_tasks(&self, project: &Token, owner: &OwnerId) -> RepoResult<Vec<Task>>;
    /// Inserts `task` and links it to `project` in one transaction.
    fn create_project_task(&mut self, project: &Token, task: &Task) -> RepoResult<()>;
    /// Removes the project and every linked task atomically.
    fn delete_project_cascade(&mut self, project: &Token) -> RepoResult<usize>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["projects", "project_tasks", "tasks"])?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        self.conn
            .execute(
                "INSERT INTO projects (
                    token,
                    owner,
                    name,
                    detail,
                    deadline,
                    status
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    project.token.as_str(),
                    project.owner.as_str(),
                    project.name.as_str(),
                    project.detail.as_str(),
                    project.deadline.format(DEADLINE_FORMAT).to_string(),
                    project.status.rank(),
                ],
            )
            .map_err(|err| map_insert_error(err, &project.token))?;

        Ok(())
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = ?1,
                detail = ?2,
                deadline = ?3,
                status = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE token = ?5;",
            params![
                project.name.as_str(),
                project.detail.as_str(),
                project.deadline.format(DEADLINE_FORMAT).to_string(),
                project.status.rank(),
                project.token.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(project.token.clone()));
        }

        Ok(())
    }

    fn get_project(&self, token: &Token) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE token = ?1;"))?;
        let mut rows = stmt.query([token.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self, owner: &OwnerId, window: ListWindow) -> RepoResult<Vec<Project>> {
        let sql = format!(
            "{PROJECT_SELECT_SQL}
             WHERE owner = ?1
             ORDER BY status ASC, id ASC{}",
            window.sql_suffix()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([owner.as_str()])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn count_projects(&self, owner: &OwnerId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE owner = ?1;",
            [owner.as_str()],
            |row| row.get(0),
        )?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }

    fn list_project_tasks(&self, project: &Token, owner: &OwnerId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS_SQL}
             FROM tasks t
             INNER JOIN project_tasks pt ON pt.task_id = t.id
             INNER JOIN projects p ON p.id = pt.project_id
             WHERE p.token = ?1
               AND t.owner = ?2{TASK_ORDER_SQL};"
        ))?;
        let mut rows = stmt.query(params![project.as_str(), owner.as_str()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn create_project_task(&mut self, project: &Token, task: &Task) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let found: Option<(i64, String)> = tx
            .query_row(
                "SELECT id, owner FROM projects WHERE token = ?1;",
                [project.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let project_id = match found {
            Some((id, owner)) if owner == task.owner.as_str() => id,
            _ => return Err(RepoError::NotFound(project.clone())),
        };

        let task_id = insert_task(&tx, task)?;
        tx.execute(
            "INSERT INTO project_tasks (project_id, task_id) VALUES (?1, ?2);",
            params![project_id, task_id],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn delete_project_cascade(&mut self, project: &Token) -> RepoResult<usize> {
        cascade_delete_project(self.conn, project)
    }
}

fn read_deadline(row: &Row<'_>) -> RepoResult<NaiveDate> {
    let text: String = row.get("deadline")?;
    NaiveDate::parse_from_str(&text, DEADLINE_FORMAT).map_err(|err| {
        RepoError::InvalidData(format!("invalid date `{text}` in projects.deadline: {err}"))
    })
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let rank: i64 = row.get("status")?;
    let status = ProjectStatus::from_rank(rank).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{rank}` in projects.status"))
    })?;

    let project = Project {
        token: read_token(row, "projects")?,
        owner: read_owner(row, "projects")?,
        name: row.get("name")?,
        detail: row.get("detail")?,
        deadline: read_deadline(row)?,
        status,
    };
    project.validate()?;
    Ok(project)
}

//! Project cascade delete.
//!
//! # Invariants
//! - Linked tasks and the project row are removed in one `IMMEDIATE`
//!   transaction; any failure leaves both untouched.
//! - Cascade depth is one level: tasks own no children.

use crate::model::token::Token;
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

/// Deletes every task linked to the project, then the project itself.
///
/// Returns the number of tasks removed. An unknown token yields
/// [`RepoError::NotFound`] and changes nothing.
pub fn cascade_delete_project(conn: &mut Connection, project: &Token) -> RepoResult<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let project_id: Option<i64> = tx
        .query_row(
            "SELECT id FROM projects WHERE token = ?1;",
            [project.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    let Some(project_id) = project_id else {
        return Err(RepoError::NotFound(project.clone()));
    };

    let removed_tasks = tx.execute(
        "DELETE FROM tasks
         WHERE id IN (
            SELECT task_id
            FROM project_tasks
            WHERE project_id = ?1
         );",
        [project_id],
    )?;
    tx.execute("DELETE FROM projects WHERE id = ?1;", [project_id])?;
    tx.commit()?;

    info!("event=project_cascade module=repo status=ok removed_tasks={removed_tasks}");
    Ok(removed_tasks)
}

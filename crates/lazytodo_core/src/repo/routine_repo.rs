//! Routine repository contracts and SQLite implementation.

use crate::model::owner::OwnerId;
use crate::model::routine::Routine;
use crate::model::token::Token;
use crate::repo::{
    bool_to_int, ensure_tables, map_insert_error, read_flag, read_owner, read_token, ListWindow,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const ROUTINE_SELECT_SQL: &str = "SELECT
    token,
    owner,
    name,
    detail,
    scheduled_at,
    done
FROM routines";

/// Repository interface for routine persistence.
pub trait RoutineRepository {
    fn create_routine(&self, routine: &Routine) -> RepoResult<()>;
    fn update_routine(&self, routine: &Routine) -> RepoResult<()>;
    fn get_routine(&self, token: &Token) -> RepoResult<Option<Routine>>;
    /// Owner's routines ordered by `scheduled_at ASC, done ASC`.
    fn list_routines(&self, owner: &OwnerId, window: ListWindow) -> RepoResult<Vec<Routine>>;
    fn count_routines(&self, owner: &OwnerId) -> RepoResult<u64>;
    fn delete_routine(&self, token: &Token) -> RepoResult<()>;
}

/// SQLite-backed routine repository.
pub struct SqliteRoutineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoutineRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["routines"])?;
        Ok(Self { conn })
    }
}

impl RoutineRepository for SqliteRoutineRepository<'_> {
    fn create_routine(&self, routine: &Routine) -> RepoResult<()> {
        routine.validate()?;

        self.conn
            .execute(
                "INSERT INTO routines (
                    token,
                    owner,
                    name,
                    detail,
                    scheduled_at,
                    done
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    routine.token.as_str(),
                    routine.owner.as_str(),
                    routine.name.as_str(),
                    routine.detail.as_str(),
                    routine.scheduled_at,
                    bool_to_int(routine.done),
                ],
            )
            .map_err(|err| map_insert_error(err, &routine.token))?;

        Ok(())
    }

    fn update_routine(&self, routine: &Routine) -> RepoResult<()> {
        routine.validate()?;

        let changed = self.conn.execute(
            "UPDATE routines
             SET
                name = ?1,
                detail = ?2,
                scheduled_at = ?3,
                done = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE token = ?5;",
            params![
                routine.name.as_str(),
                routine.detail.as_str(),
                routine.scheduled_at,
                bool_to_int(routine.done),
                routine.token.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(routine.token.clone()));
        }

        Ok(())
    }

    fn get_routine(&self, token: &Token) -> RepoResult<Option<Routine>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROUTINE_SELECT_SQL} WHERE token = ?1;"))?;
        let mut rows = stmt.query([token.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_routine_row(row)?));
        }
        Ok(None)
    }

    fn list_routines(&self, owner: &OwnerId, window: ListWindow) -> RepoResult<Vec<Routine>> {
        let sql = format!(
            "{ROUTINE_SELECT_SQL}
             WHERE owner = ?1
             ORDER BY scheduled_at ASC, done ASC, id ASC{}",
            window.sql_suffix()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([owner.as_str()])?;
        let mut routines = Vec::new();
        while let Some(row) = rows.next()? {
            routines.push(parse_routine_row(row)?);
        }
        Ok(routines)
    }

    fn count_routines(&self, owner: &OwnerId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM routines WHERE owner = ?1;",
            [owner.as_str()],
            |row| row.get(0),
        )?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }

    fn delete_routine(&self, token: &Token) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM routines WHERE token = ?1;", [token.as_str()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(token.clone()));
        }
        Ok(())
    }
}

fn parse_routine_row(row: &Row<'_>) -> RepoResult<Routine> {
    let routine = Routine {
        token: read_token(row, "routines")?,
        owner: read_owner(row, "routines")?,
        name: row.get("name")?,
        detail: row.get("detail")?,
        scheduled_at: row.get("scheduled_at")?,
        done: read_flag(row, "done", "routines")?,
    };
    routine.validate()?;
    Ok(routine)
}

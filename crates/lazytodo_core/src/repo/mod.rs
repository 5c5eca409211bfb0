//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every owner-scoped query binds the owner as a parameter.
//! - Token lookups return whatever the token names; access is decided by
//!   `crate::access`.

use crate::db::DbError;
use crate::model::owner::OwnerId;
use crate::model::token::Token;
use crate::model::validation::ValidationError;
use rusqlite::{Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cascade;
pub mod project_repo;
pub mod routine_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(Token),
    /// Insert hit a token that is live or was issued before.
    TokenConflict(Token),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(token) => write!(f, "record not found: {token}"),
            Self::TokenConflict(token) => write!(f, "token already issued: {token}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
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

/// Row window for paginated list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListWindow {
    /// `None` returns every remaining row.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ListWindow {
    /// SQL suffix for this window. Values are integers, so inlining is safe.
    pub(crate) fn sql_suffix(&self) -> String {
        match (self.limit, self.offset) {
            (Some(limit), 0) => format!(" LIMIT {limit}"),
            (Some(limit), offset) => format!(" LIMIT {limit} OFFSET {offset}"),
            (None, 0) => String::new(),
            (None, offset) => format!(" LIMIT -1 OFFSET {offset}"),
        }
    }
}

/// Maps an insert failure, turning token uniqueness violations into
/// [`RepoError::TokenConflict`].
pub(crate) fn map_insert_error(err: rusqlite::Error, token: &Token) -> RepoError {
    if is_token_conflict(&err) {
        return RepoError::TokenConflict(token.clone());
    }
    RepoError::from(err)
}

fn is_token_conflict(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(inner, Some(message)) => {
            inner.code == rusqlite::ErrorCode::ConstraintViolation && message.contains(".token")
        }
        _ => false,
    }
}

pub(crate) fn read_token(row: &Row<'_>, table: &str) -> RepoResult<Token> {
    let value: String = row.get("token")?;
    Token::parse(&value).map_err(|_| {
        RepoError::InvalidData(format!("invalid token value `{value}` in {table}.token"))
    })
}

pub(crate) fn read_owner(row: &Row<'_>, table: &str) -> RepoResult<OwnerId> {
    let value: String = row.get("owner")?;
    OwnerId::new(value)
        .ok_or_else(|| RepoError::InvalidData(format!("blank owner in {table}.owner")))
}

pub(crate) fn read_flag(row: &Row<'_>, column: &str, table: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid {column} value `{other}` in {table}.{column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for &table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

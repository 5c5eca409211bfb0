//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into owner-scoped use-case APIs.
//! - Gate every token-addressed operation through `crate::access`.
//! - Assign fresh tokens and owners on creation.
//!
//! # Invariants
//! - The requester is always an explicit parameter; there is no ambient
//!   session state.
//! - An unknown, malformed or foreign token surfaces as
//!   [`ServiceError::NotFound`] and nothing else.

use crate::access::ownership::Hidden;
use crate::model::token::{Token, TokenGenerator};
use crate::model::validation::ValidationError;
use crate::repo::{ListWindow, RepoError, RepoResult};
use log::warn;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod project_service;
pub mod routine_service;
pub mod task_service;

/// Fixed number of items per list page.
pub const LIST_PAGE_SIZE: u32 = 2;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced to the request layer.
#[derive(Debug)]
pub enum ServiceError {
    /// Token unknown, malformed, or owned by someone else.
    NotFound,
    Validation(ValidationError),
    /// Token collision persisted after one regeneration.
    Conflict,
    /// Storage failure; never retried.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::Conflict => write!(f, "could not allocate a unique token"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound | Self::Conflict => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::TokenConflict(_) => Self::Conflict,
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<Hidden> for ServiceError {
    fn from(_: Hidden) -> Self {
        Self::NotFound
    }
}

/// One page of an owner-scoped list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, page: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = u32::try_from(total_items.div_ceil(u64::from(page_size.max(1))))
            .unwrap_or(u32::MAX);
        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Normalizes a 1-based page number (0 reads as 1) into a row window.
pub(crate) fn page_window(page: u32, page_size: u32) -> (u32, ListWindow) {
    let page = page.max(1);
    let window = ListWindow {
        limit: Some(page_size),
        offset: (page - 1).saturating_mul(page_size),
    };
    (page, window)
}

/// Parses a caller-supplied token; malformed input reads as not found.
pub(crate) fn resolve_token(raw: &str) -> ServiceResult<Token> {
    Token::parse(raw.trim()).map_err(|_| ServiceError::NotFound)
}

/// Runs `insert` with a fresh token, regenerating once on collision.
pub(crate) fn insert_with_fresh_token<G, T>(
    tokens: &G,
    mut insert: impl FnMut(Token) -> RepoResult<T>,
) -> ServiceResult<T>
where
    G: TokenGenerator,
{
    match insert(tokens.generate()) {
        Err(RepoError::TokenConflict(_)) => {
            warn!("event=token_conflict module=service status=retry");
            insert(tokens.generate()).map_err(ServiceError::from)
        }
        other => other.map_err(ServiceError::from),
    }
}

#[cfg(test)]
mod tests {
    use super::{page_window, resolve_token, Page, ServiceError};
    use crate::repo::ListWindow;

    #[test]
    fn page_zero_reads_as_first_page() {
        let (page, window) = page_window(0, 2);
        assert_eq!(page, 1);
        assert_eq!(
            window,
            ListWindow {
                limit: Some(2),
                offset: 0
            }
        );

        let (page, window) = page_window(3, 2);
        assert_eq!(page, 3);
        assert_eq!(window.offset, 4);
    }

    #[test]
    fn page_counts_round_up() {
        let page = Page::new(vec![1, 2], 1, 2, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());

        let last = Page::new(vec![5], 3, 2, 5);
        assert!(!last.has_next());

        let empty: Page<u8> = Page::new(Vec::new(), 1, 2, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next());
    }

    #[test]
    fn malformed_token_reads_as_not_found() {
        assert!(matches!(
            resolve_token("../etc/passwd"),
            Err(ServiceError::NotFound)
        ));
        assert!(resolve_token(" 0123456789AB ").is_ok());
    }
}

//! Core domain logic for the LazyTodo tracker.
//! This crate is the single source of truth for ownership and consistency
//! invariants; request handling and presentation live outside it.

pub mod access;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use access::ownership::{authorize, require_access, AccessDecision, Hidden, Operation, Owned};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::owner::OwnerId;
pub use model::project::{NewProject, Project, ProjectPatch, ProjectStatus};
pub use model::routine::{NewRoutine, Routine, RoutinePatch};
pub use model::task::{NewTask, Task, TaskPatch};
pub use model::token::{Token, TokenError, TokenGenerator, UuidTokenGenerator};
pub use model::validation::ValidationError;
pub use repo::cascade::cascade_delete_project;
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::routine_repo::{RoutineRepository, SqliteRoutineRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{ListWindow, RepoError, RepoResult};
pub use service::project_service::ProjectService;
pub use service::routine_service::RoutineService;
pub use service::task_service::TaskService;
pub use service::{Page, ServiceError, ServiceResult, LIST_PAGE_SIZE};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

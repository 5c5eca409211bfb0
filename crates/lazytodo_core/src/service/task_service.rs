//! Task use-case service.
//!
//! # Responsibility
//! - Home list, search and CRUD for tasks, scoped to the requester.
//!
//! # Invariants
//! - Home list is sorted by `time_to_start ASC`, then not-done before done.
//! - Search only ever returns the requester's tasks.
//! - A blank or absent search query matches nothing.

use crate::access::ownership::{require_access, Operation};
use crate::model::owner::OwnerId;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::model::token::{TokenGenerator, UuidTokenGenerator};
use crate::repo::task_repo::TaskRepository;
use crate::service::{
    insert_with_fresh_token, page_window, resolve_token, Page, ServiceResult, LIST_PAGE_SIZE,
};
use log::{debug, info};

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository, G: TokenGenerator = UuidTokenGenerator> {
    repo: R,
    tokens: G,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service that draws random tokens.
    pub fn new(repo: R) -> Self {
        Self::with_token_generator(repo, UuidTokenGenerator)
    }
}

impl<R: TaskRepository, G: TokenGenerator> TaskService<R, G> {
    pub fn with_token_generator(repo: R, tokens: G) -> Self {
        Self { repo, tokens }
    }

    /// Lists one page of the owner's tasks.
    pub fn list_home_tasks(&self, owner: &OwnerId, page: u32) -> ServiceResult<Page<Task>> {
        let (page, window) = page_window(page, LIST_PAGE_SIZE);
        let total = self.repo.count_tasks(owner)?;
        let items = self.repo.list_tasks(owner, window)?;
        Ok(Page::new(items, page, LIST_PAGE_SIZE, total))
    }

    /// Case-insensitive substring search over the owner's task names.
    pub fn search_tasks(&self, owner: &OwnerId, query: Option<&str>) -> ServiceResult<Vec<Task>> {
        let Some(needle) = query.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(Vec::new());
        };
        let hits = self.repo.search_tasks(owner, needle)?;
        debug!("event=task_search module=service status=ok hits={}", hits.len());
        Ok(hits)
    }

    pub fn get_task(&self, requester: &OwnerId, token: &str) -> ServiceResult<Task> {
        let token = resolve_token(token)?;
        let task = require_access(requester, self.repo.get_task(&token)?, Operation::View)?;
        Ok(task)
    }

    /// Creates a task owned by `owner` with a freshly issued token.
    pub fn create_task(&self, owner: &OwnerId, fields: NewTask) -> ServiceResult<Task> {
        let task = insert_with_fresh_token(&self.tokens, |token| {
            let task = fields.clone().into_task(token, owner.clone());
            self.repo.create_task(&task)?;
            Ok(task)
        })?;
        info!("event=task_create module=service status=ok token={}", task.token);
        Ok(task)
    }

    /// Applies `patch` to the requester's task and returns the stored result.
    pub fn update_task(
        &self,
        requester: &OwnerId,
        token: &str,
        patch: &TaskPatch,
    ) -> ServiceResult<Task> {
        let token = resolve_token(token)?;
        let mut task = require_access(requester, self.repo.get_task(&token)?, Operation::Update)?;
        if patch.is_empty() {
            return Ok(task);
        }

        patch.apply_to(&mut task);
        task.validate()?;
        self.repo.update_task(&task)?;
        info!("event=task_update module=service status=ok token={}", task.token);
        Ok(task)
    }

    pub fn delete_task(&self, requester: &OwnerId, token: &str) -> ServiceResult<()> {
        let token = resolve_token(token)?;
        let task = require_access(requester, self.repo.get_task(&token)?, Operation::Delete)?;
        self.repo.delete_task(&task.token)?;
        info!("event=task_delete module=service status=ok token={}", task.token);
        Ok(())
    }
}

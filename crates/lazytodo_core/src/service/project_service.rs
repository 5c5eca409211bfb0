//! Project use-case service.
//!
//! # Responsibility
//! - Project list and CRUD, scoped to the requester.
//! - Project-task listing and creation.
//! - Project deletion through the cascade coordinator.
//!
//! # Invariants
//! - Only the project owner can list or add its tasks; new project tasks are
//!   owned by that same requester.
//! - Deleting a project removes its linked tasks in the same transaction.

use crate::access::ownership::{require_access, Operation};
use crate::model::owner::OwnerId;
use crate::model::project::{NewProject, Project, ProjectPatch};
use crate::model::task::{NewTask, Task};
use crate::model::token::{TokenGenerator, UuidTokenGenerator};
use crate::repo::project_repo::ProjectRepository;
use crate::service::{
    insert_with_fresh_token, page_window, resolve_token, Page, ServiceResult, LIST_PAGE_SIZE,
};
use log::info;

/// Project service facade over repository implementations.
pub struct ProjectService<R: ProjectRepository, G: TokenGenerator = UuidTokenGenerator> {
    repo: R,
    tokens: G,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_token_generator(repo, UuidTokenGenerator)
    }
}

impl<R: ProjectRepository, G: TokenGenerator> ProjectService<R, G> {
    pub fn with_token_generator(repo: R, tokens: G) -> Self {
        Self { repo, tokens }
    }

    /// Lists one page of the owner's projects ordered by status.
    pub fn list_projects(&self, owner: &OwnerId, page: u32) -> ServiceResult<Page<Project>> {
        let (page, window) = page_window(page, LIST_PAGE_SIZE);
        let total = self.repo.count_projects(owner)?;
        let items = self.repo.list_projects(owner, window)?;
        Ok(Page::new(items, page, LIST_PAGE_SIZE, total))
    }

    /// Lists the tasks of one of the requester's projects.
    pub fn list_project_tasks(
        &self,
        requester: &OwnerId,
        project_token: &str,
    ) -> ServiceResult<Vec<Task>> {
        let token = resolve_token(project_token)?;
        let project = require_access(requester, self.repo.get_project(&token)?, Operation::View)?;
        Ok(self.repo.list_project_tasks(&project.token, requester)?)
    }

    pub fn get_project(&self, requester: &OwnerId, token: &str) -> ServiceResult<Project> {
        let token = resolve_token(token)?;
        let project = require_access(requester, self.repo.get_project(&token)?, Operation::View)?;
        Ok(project)
    }

    pub fn create_project(&self, owner: &OwnerId, fields: NewProject) -> ServiceResult<Project> {
        let project = insert_with_fresh_token(&self.tokens, |token| {
            let project = fields.clone().into_project(token, owner.clone());
            self.repo.create_project(&project)?;
            Ok(project)
        })?;
        info!("event=project_create module=service status=ok token={}", project.token);
        Ok(project)
    }

    /// Creates a task owned by `owner` and links it to the owner's project.
    pub fn create_project_task(
        &mut self,
        owner: &OwnerId,
        project_token: &str,
        fields: NewTask,
    ) -> ServiceResult<Task> {
        let token = resolve_token(project_token)?;
        let project = require_access(owner, self.repo.get_project(&token)?, Operation::Update)?;

        let repo = &mut self.repo;
        let task = insert_with_fresh_token(&self.tokens, |task_token| {
            let task = fields.clone().into_task(task_token, owner.clone());
            repo.create_project_task(&project.token, &task)?;
            Ok(task)
        })?;
        info!(
            "event=project_task_create module=service status=ok project={} token={}",
            project.token, task.token
        );
        Ok(task)
    }

    pub fn update_project(
        &self,
        requester: &OwnerId,
        token: &str,
        patch: &ProjectPatch,
    ) -> ServiceResult<Project> {
        let token = resolve_token(token)?;
        let mut project =
            require_access(requester, self.repo.get_project(&token)?, Operation::Update)?;
        if patch.is_empty() {
            return Ok(project);
        }

        patch.apply_to(&mut project);
        project.validate()?;
        self.repo.update_project(&project)?;
        info!("event=project_update module=service status=ok token={}", project.token);
        Ok(project)
    }

    /// Deletes the requester's project together with its linked tasks.
    pub fn delete_project(&mut self, requester: &OwnerId, token: &str) -> ServiceResult<()> {
        let token = resolve_token(token)?;
        let project =
            require_access(requester, self.repo.get_project(&token)?, Operation::Delete)?;
        let removed_tasks = self.repo.delete_project_cascade(&project.token)?;
        info!(
            "event=project_delete module=service status=ok token={} removed_tasks={removed_tasks}",
            project.token
        );
        Ok(())
    }
}

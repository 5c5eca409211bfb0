//! Routine use-case service.
//!
//! Same ownership rules as tasks; routines never join a project.

use crate::access::ownership::{require_access, Operation};
use crate::model::owner::OwnerId;
use crate::model::routine::{NewRoutine, Routine, RoutinePatch};
use crate::model::token::{TokenGenerator, UuidTokenGenerator};
use crate::repo::routine_repo::RoutineRepository;
use crate::service::{
    insert_with_fresh_token, page_window, resolve_token, Page, ServiceResult, LIST_PAGE_SIZE,
};
use log::info;

/// Routine service facade over repository implementations.
pub struct RoutineService<R: RoutineRepository, G: TokenGenerator = UuidTokenGenerator> {
    repo: R,
    tokens: G,
}

impl<R: RoutineRepository> RoutineService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_token_generator(repo, UuidTokenGenerator)
    }
}

impl<R: RoutineRepository, G: TokenGenerator> RoutineService<R, G> {
    pub fn with_token_generator(repo: R, tokens: G) -> Self {
        Self { repo, tokens }
    }

    /// Lists one page of the owner's routines by `scheduled_at`, then `done`.
    pub fn list_routines(&self, owner: &OwnerId, page: u32) -> ServiceResult<Page<Routine>> {
        let (page, window) = page_window(page, LIST_PAGE_SIZE);
        let total = self.repo.count_routines(owner)?;
        let items = self.repo.list_routines(owner, window)?;
        Ok(Page::new(items, page, LIST_PAGE_SIZE, total))
    }

    pub fn get_routine(&self, requester: &OwnerId, token: &str) -> ServiceResult<Routine> {
        let token = resolve_token(token)?;
        let routine = require_access(requester, self.repo.get_routine(&token)?, Operation::View)?;
        Ok(routine)
    }

    pub fn create_routine(&self, owner: &OwnerId, fields: NewRoutine) -> ServiceResult<Routine> {
        let routine = insert_with_fresh_token(&self.tokens, |token| {
            let routine = fields.clone().into_routine(token, owner.clone());
            self.repo.create_routine(&routine)?;
            Ok(routine)
        })?;
        info!("event=routine_create module=service status=ok token={}", routine.token);
        Ok(routine)
    }

    pub fn update_routine(
        &self,
        requester: &OwnerId,
        token: &str,
        patch: &RoutinePatch,
    ) -> ServiceResult<Routine> {
        let token = resolve_token(token)?;
        let mut routine =
            require_access(requester, self.repo.get_routine(&token)?, Operation::Update)?;
        if patch.is_empty() {
            return Ok(routine);
        }

        patch.apply_to(&mut routine);
        routine.validate()?;
        self.repo.update_routine(&routine)?;
        info!("event=routine_update module=service status=ok token={}", routine.token);
        Ok(routine)
    }

    pub fn delete_routine(&self, requester: &OwnerId, token: &str) -> ServiceResult<()> {
        let token = resolve_token(token)?;
        let routine =
            require_access(requester, self.repo.get_routine(&token)?, Operation::Delete)?;
        self.repo.delete_routine(&routine.token)?;
        info!("event=routine_delete module=service status=ok token={}", routine.token);
        Ok(())
    }
}

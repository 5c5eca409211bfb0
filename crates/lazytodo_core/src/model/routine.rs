//! Routine records: recurring task-like entries without project membership.
//!
//! Recurrence itself is not modeled; `scheduled_at` is a plain timestamp.

use crate::model::owner::OwnerId;
use crate::model::token::Token;
use crate::model::validation::{validate_name, validate_timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// Persisted routine as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub token: Token,
    pub owner: OwnerId,
    pub name: String,
    pub detail: String,
    /// Epoch milliseconds.
    pub scheduled_at: i64,
    pub done: bool,
}

impl Routine {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_timestamp("scheduled_at", self.scheduled_at)
    }
}

/// Externally settable fields for a new routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoutine {
    pub name: String,
    #[serde(default)]
    pub detail: String,
    pub scheduled_at: i64,
    #[serde(default)]
    pub done: bool,
}

impl NewRoutine {
    pub fn new(name: impl Into<String>, scheduled_at: i64) -> Self {
        Self {
            name: name.into(),
            detail: String::new(),
            scheduled_at,
            done: false,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub(crate) fn into_routine(self, token: Token, owner: OwnerId) -> Routine {
        Routine {
            token,
            owner,
            name: self.name,
            detail: self.detail,
            scheduled_at: self.scheduled_at,
            done: self.done,
        }
    }
}

/// Partial routine update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutinePatch {
    pub name: Option<String>,
    pub detail: Option<String>,
    pub scheduled_at: Option<i64>,
    pub done: Option<bool>,
}

impl RoutinePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.detail.is_none()
            && self.scheduled_at.is_none()
            && self.done.is_none()
    }

    pub fn apply_to(&self, routine: &mut Routine) {
        if let Some(name) = &self.name {
            routine.name = name.clone();
        }
        if let Some(detail) = &self.detail {
            routine.detail = detail.clone();
        }
        if let Some(scheduled_at) = self.scheduled_at {
            routine.scheduled_at = scheduled_at;
        }
        if let Some(done) = self.done {
            routine.done = done;
        }
    }
}

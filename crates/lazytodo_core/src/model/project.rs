//! Project records and status ordering.
//!
//! # Invariants
//! - `deadline` is a calendar date; it serializes and persists as `YYYY-MM-DD`.
//! - `ProjectStatus` declaration order is the project list order.

use crate::model::owner::OwnerId;
use crate::model::token::Token;
use crate::model::validation::{validate_name, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Text form of a deadline in storage and on the wire.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Project lifecycle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    Active,
    OnHold,
    Completed,
}

impl ProjectStatus {
    /// Sort rank persisted in `projects.status`.
    pub fn rank(self) -> i64 {
        match self {
            Self::Planned => 0,
            Self::Active => 1,
            Self::OnHold => 2,
            Self::Completed => 3,
        }
    }

    pub fn from_rank(rank: i64) -> Option<Self> {
        match rank {
            0 => Some(Self::Planned),
            1 => Some(Self::Active),
            2 => Some(Self::OnHold),
            3 => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Persisted project as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub token: Token,
    pub owner: OwnerId,
    pub name: String,
    pub detail: String,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
}

impl Project {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

/// Externally settable fields for a new project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub detail: String,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
}

impl NewProject {
    /// Creates a `planned` project draft with empty detail.
    pub fn new(name: impl Into<String>, deadline: NaiveDate) -> Self {
        Self {
            name: name.into(),
            detail: String::new(),
            deadline,
            status: ProjectStatus::Planned,
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub(crate) fn into_project(self, token: Token, owner: OwnerId) -> Project {
        Project {
            token,
            owner,
            name: self.name,
            detail: self.detail,
            deadline: self.deadline,
            status: self.status,
        }
    }
}

/// Partial project update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub detail: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.detail.is_none()
            && self.deadline.is_none()
            && self.status.is_none()
    }

    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(detail) = &self.detail {
            project.detail = detail.clone();
        }
        if let Some(deadline) = self.deadline {
            project.deadline = deadline;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
    }
}

//! Task records.
//!
//! # Invariants
//! - `time_to_start` is epoch milliseconds and never negative.
//! - `name` is non-blank and at most [`NAME_MAX_CHARS`] characters.
//!
//! [`NAME_MAX_CHARS`]: crate::model::validation::NAME_MAX_CHARS

use crate::model::owner::OwnerId;
use crate::model::token::Token;
use crate::model::validation::{validate_name, validate_timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// Persisted task as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub token: Token,
    pub owner: OwnerId,
    pub name: String,
    pub detail: String,
    /// Epoch milliseconds.
    pub time_to_start: i64,
    pub done: bool,
}

impl Task {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_timestamp("time_to_start", self.time_to_start)
    }
}

/// Externally settable fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    #[serde(default)]
    pub detail: String,
    pub time_to_start: i64,
    #[serde(default)]
    pub done: bool,
}

impl NewTask {
    /// Creates a not-done task draft with empty detail.
    pub fn new(name: impl Into<String>, time_to_start: i64) -> Self {
        Self {
            name: name.into(),
            detail: String::new(),
            time_to_start,
            done: false,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub(crate) fn into_task(self, token: Token, owner: OwnerId) -> Task {
        Task {
            token,
            owner,
            name: self.name,
            detail: self.detail,
            time_to_start: self.time_to_start,
            done: self.done,
        }
    }
}

/// Partial task update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub detail: Option<String>,
    pub time_to_start: Option<i64>,
    pub done: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.detail.is_none()
            && self.time_to_start.is_none()
            && self.done.is_none()
    }

    /// Applies present fields onto `task`. Validation is the caller's job.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(detail) = &self.detail {
            task.detail = detail.clone();
        }
        if let Some(time_to_start) = self.time_to_start {
            task.time_to_start = time_to_start;
        }
        if let Some(done) = self.done {
            task.done = done;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTask, TaskPatch};
    use crate::model::owner::OwnerId;
    use crate::model::token::Token;
    use crate::model::validation::ValidationError;

    fn sample_owner() -> OwnerId {
        OwnerId::new("owner-a").expect("owner")
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut task = NewTask::new("buy milk", 1_000)
            .with_detail("2 liters")
            .into_task(Token::generate(), sample_owner());
        let before = task.clone();

        let patch = TaskPatch {
            done: Some(true),
            ..TaskPatch::default()
        };
        patch.apply_to(&mut task);

        assert!(task.done);
        assert_eq!(task.name, before.name);
        assert_eq!(task.detail, before.detail);
        assert_eq!(task.time_to_start, before.time_to_start);
        assert_eq!(task.token, before.token);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(TaskPatch::default().is_empty());
        assert!(!TaskPatch {
            detail: Some(String::new()),
            ..TaskPatch::default()
        }
        .is_empty());
    }

    #[test]
    fn validate_rejects_blank_name_and_negative_time() {
        let task = NewTask::new(" ", 0).into_task(Token::generate(), sample_owner());
        assert_eq!(task.validate(), Err(ValidationError::EmptyName));

        let task = NewTask::new("ok", -5).into_task(Token::generate(), sample_owner());
        assert!(matches!(
            task.validate(),
            Err(ValidationError::NegativeTimestamp {
                field: "time_to_start",
                ..
            })
        ));
    }

    #[test]
    fn draft_deserializes_with_defaults() {
        let draft: NewTask =
            serde_json::from_str(r#"{"name":"walk","time_to_start":10}"#).expect("draft json");
        assert_eq!(draft, NewTask::new("walk", 10));
    }
}

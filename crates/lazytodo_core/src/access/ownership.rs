//! Ownership guard used by every mutation and scoped read.

use crate::model::owner::OwnerId;
use crate::model::project::Project;
use crate::model::routine::Routine;
use crate::model::task::Task;
use log::debug;
use std::fmt::{Display, Formatter};

/// Operation requested on an existing entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    View,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guard verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

/// Outcome reported to callers when access is not granted.
///
/// Carries nothing beyond the fact of refusal, so an unknown token and a
/// foreign token look the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hidden;

/// Entities that carry an owner.
pub trait Owned {
    fn owner(&self) -> &OwnerId;
}

impl Owned for Task {
    fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

impl Owned for Project {
    fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

impl Owned for Routine {
    fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

/// Allows iff `requester` owns the entity. The operation does not change the
/// policy today; it is part of the contract so finer rules stay local here.
pub fn authorize(requester: &OwnerId, owner: &OwnerId, _operation: Operation) -> AccessDecision {
    if requester == owner {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny
    }
}

/// Resolves a token lookup result into an entity the requester may act on.
///
/// `None` (unknown token) and a denied entity both yield [`Hidden`]. Only the
/// debug log tells them apart.
pub fn require_access<T: Owned>(
    requester: &OwnerId,
    found: Option<T>,
    operation: Operation,
) -> Result<T, Hidden> {
    let reason = match found {
        Some(entity) => match authorize(requester, entity.owner(), operation) {
            AccessDecision::Allow => return Ok(entity),
            AccessDecision::Deny => "denied",
        },
        None => "missing",
    };
    debug!("event=access_hidden module=access op={operation} reason={reason}");
    Err(Hidden)
}

#[cfg(test)]
mod tests {
    use super::{authorize, require_access, AccessDecision, Hidden, Operation};
    use crate::model::owner::OwnerId;
    use crate::model::task::NewTask;
    use crate::model::token::Token;

    fn owner(subject: &str) -> OwnerId {
        OwnerId::new(subject).expect("owner")
    }

    #[test]
    fn owner_is_allowed_for_every_operation() {
        let alice = owner("alice");
        for operation in [Operation::View, Operation::Update, Operation::Delete] {
            assert_eq!(authorize(&alice, &alice, operation), AccessDecision::Allow);
        }
    }

    #[test]
    fn other_requester_is_denied_for_every_operation() {
        let alice = owner("alice");
        let bob = owner("bob");
        for operation in [Operation::View, Operation::Update, Operation::Delete] {
            assert_eq!(authorize(&bob, &alice, operation), AccessDecision::Deny);
        }
    }

    #[test]
    fn operation_names_are_lowercase_log_tokens() {
        assert_eq!(Operation::View.to_string(), "view");
        assert_eq!(Operation::Update.to_string(), "update");
        assert_eq!(Operation::Delete.as_str(), "delete");
    }

    #[test]
    fn missing_and_foreign_entities_are_indistinguishable() {
        let alice = owner("alice");
        let bob = owner("bob");
        let task = NewTask::new("secret", 0).into_task(Token::generate(), alice.clone());

        let foreign = require_access(&bob, Some(task.clone()), Operation::Update);
        let missing = require_access::<crate::model::task::Task>(&bob, None, Operation::Update);
        assert_eq!(foreign, Err(Hidden));
        assert_eq!(missing, Err(Hidden));

        let own = require_access(&alice, Some(task.clone()), Operation::Delete);
        assert_eq!(own, Ok(task));
    }
}

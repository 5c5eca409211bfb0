//! Requester/owner identity.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Authenticated identity as issued by the external identity provider.
///
/// The core never authenticates; it only compares identities. Callers build
/// one `OwnerId` per request and pass it explicitly into every service call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wraps a provider subject. Returns `None` for blank input.
    pub fn new(subject: impl Into<String>) -> Option<Self> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return None;
        }
        Some(Self(subject))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::OwnerId;

    #[test]
    fn rejects_blank_subject() {
        assert!(OwnerId::new("").is_none());
        assert!(OwnerId::new("   ").is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let owner = OwnerId::new("user-42").expect("valid owner");
        let json = serde_json::to_string(&owner).expect("serialize owner");
        assert_eq!(json, "\"user-42\"");
    }
}

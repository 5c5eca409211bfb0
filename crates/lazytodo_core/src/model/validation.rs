//! Field validation shared by task, project and routine records.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum name length in characters.
pub const NAME_MAX_CHARS: usize = 200;

/// Record-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    NameTooLong { max: usize, actual: usize },
    /// Epoch-millisecond field holds a negative value.
    NegativeTimestamp { field: &'static str, value: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max, actual } => {
                write!(f, "name has {actual} characters; at most {max} allowed")
            }
            Self::NegativeTimestamp { field, value } => {
                write!(f, "`{field}` must be a non-negative epoch timestamp, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let actual = name.chars().count();
    if actual > NAME_MAX_CHARS {
        return Err(ValidationError::NameTooLong {
            max: NAME_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn validate_timestamp(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeTimestamp { field, value });
    }
    Ok(())
}

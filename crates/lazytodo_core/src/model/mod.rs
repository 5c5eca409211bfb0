//! Domain model for tasks, projects and routines.
//!
//! # Responsibility
//! - Define canonical records used by repositories and services.
//! - Define typed drafts (creation input) and patches (partial updates).
//!
//! # Invariants
//! - Every record is addressed externally by a `Token`, never by its row id.
//! - Every record has exactly one `OwnerId`, fixed at creation.
//! - Neither `token` nor `owner` appears in any draft or patch type.

pub mod owner;
pub mod project;
pub mod routine;
pub mod task;
pub mod token;
pub mod validation;

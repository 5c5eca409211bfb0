//! Owner-based access control.
//!
//! # Responsibility
//! - Decide whether a requester may view, update or delete an entity.
//! - Collapse "absent" and "owned by someone else" into one outcome.
//!
//! # Invariants
//! - Policy is strict owner equality; there is no shared or admin access.
//! - Callers never learn whether a denied token exists.

pub mod ownership;

//! Herd domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by the store and its callers.
//! - Define transient filter criteria for list views.
//!
//! # Invariants
//! - Every cow and event is identified by a stable opaque string ID.
//! - Filter criteria are never persisted.

pub mod cow;
pub mod filters;

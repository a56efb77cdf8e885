//! Herd domain store.
//!
//! # Responsibility
//! - Hold the authoritative cow collection and filter criteria.
//! - Coordinate every write with the key-value persistence collaborator.
//!
//! # See also
//! - crates/herdbook_core/src/storage/mod.rs

pub mod herd_store;
pub mod sample;

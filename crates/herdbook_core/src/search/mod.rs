//! Herd list search and filter entry points.
//!
//! # Responsibility
//! - Evaluate list filter criteria as pure functions over explicit inputs.
//! - Keep result shaping inside core.

pub mod filter;

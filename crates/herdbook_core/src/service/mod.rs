//! Herd use-case services.
//!
//! # Responsibility
//! - Validate form input before it reaches the store.
//! - Orchestrate store calls into lifecycle use-cases.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod cow_form;
pub mod herd_service;

//! Flutter bridge for Herdbook core.

pub mod api;

//! Core domain logic for Herdbook.
//! This crate is the single source of truth for herd records and their invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cow::{
    new_id, Cow, CowEvent, CowId, CowSex, CowStatus, EpochMillis, EventId, EventMetadata,
    EventType, NewCow,
};
pub use model::filters::{CowFilters, PenFilter, StatusFilter};
pub use search::filter::{distinct_pens, filter_cows, filter_cows_sorted_by, matches};
pub use service::cow_form::{CowDraft, CowField, FieldError, FieldErrorKind};
pub use service::herd_service::{HerdService, HerdServiceError, HerdServiceResult};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use store::herd_store::{HerdStore, StoreError, StoreResult, COWS_STORAGE_KEY};
pub use store::sample::sample_herd;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Current wall-clock time as Unix epoch milliseconds.
///
/// Returns `0` if the system clock reads before the epoch.
pub fn now_epoch_ms() -> EpochMillis {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as EpochMillis)
        .unwrap_or(0)
}

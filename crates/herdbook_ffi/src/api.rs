//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose herd store operations to Dart via FRB as one explicit session.
//! - Convert domain types to string-typed transfer objects.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Store failures surface as `ok = false` envelopes with a message.
//! - Load failures surface as an empty list, never as an error.

use herdbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, now_epoch_ms,
    ping as ping_inner, Cow, CowDraft, CowEvent, CowFilters, CowSex, CowStatus, EventType,
    HerdService, HerdServiceError, HerdStore, PenFilter, SqliteKeyValueStore, StatusFilter,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

const DB_FILE_NAME: &str = "herdbook.sqlite3";
const DB_PATH_ENV: &str = "HERDBOOK_DB_PATH";
const FILTER_ALL: &str = "All";

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One history entry in transfer form.
#[derive(Debug, Clone, PartialEq)]
pub struct CowEventItem {
    pub id: String,
    /// Event type label, e.g. `Weight Check`.
    pub kind: String,
    pub date_ms: i64,
    pub description: String,
    pub weight: Option<f64>,
    pub previous_pen: Option<String>,
    pub new_pen: Option<String>,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub treatment_type: Option<String>,
}

/// One cow in transfer form.
#[derive(Debug, Clone, PartialEq)]
pub struct CowItem {
    pub id: String,
    pub ear_tag: String,
    pub sex: String,
    pub pen: String,
    pub status: String,
    pub weight: Option<f64>,
    pub daily_weight_gain: Option<f64>,
    pub created_at_ms: i64,
    pub last_event_date_ms: i64,
    /// Newest first.
    pub events: Vec<CowEventItem>,
}

/// List envelope for the herd screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CowListResponse {
    pub items: Vec<CowItem>,
    /// Sorted pen labels across the whole herd.
    pub pens: Vec<String>,
    /// Total herd size before filtering.
    pub total: u32,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Affected cow ID, when there is one.
    pub cow_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, cow_id: Option<String>) -> Self {
        Self {
            ok: true,
            cow_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            cow_id: None,
            message: message.into(),
        }
    }
}

/// Explicitly opened herd session backed by one SQLite file.
///
/// Calls are serialized through an internal mutex.
#[flutter_rust_bridge::frb(opaque)]
pub struct HerdbookSession {
    service: Mutex<HerdService<SqliteKeyValueStore>>,
}

impl HerdbookSession {
    /// Opens the herd database and loads persisted cows.
    ///
    /// `db_path = None` resolves `HERDBOOK_DB_PATH`, then the temp directory.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(db_path: Option<String>) -> Result<HerdbookSession, String> {
        let path = resolve_db_path(db_path);
        let storage = SqliteKeyValueStore::open(&path)
            .map_err(|err| format!("herd DB open failed: {err}"))?;
        Ok(Self::from_storage(storage))
    }

    /// Opens a throwaway in-memory session.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open_in_memory() -> Result<HerdbookSession, String> {
        let storage = SqliteKeyValueStore::open_in_memory()
            .map_err(|err| format!("herd DB open failed: {err}"))?;
        Ok(Self::from_storage(storage))
    }

    fn from_storage(storage: SqliteKeyValueStore) -> Self {
        Self {
            service: Mutex::new(HerdService::new(HerdStore::open(storage))),
        }
    }

    /// Reloads the herd from disk and returns the filtered list.
    #[flutter_rust_bridge::frb(sync)]
    pub fn load_cows(&self) -> CowListResponse {
        match self.lock() {
            Ok(mut service) => {
                service.store_mut().load();
                list_response(service.store())
            }
            Err(message) => empty_list(message),
        }
    }

    /// Returns the list under the active filters.
    #[flutter_rust_bridge::frb(sync)]
    pub fn filtered_cows(&self) -> CowListResponse {
        match self.lock() {
            Ok(service) => list_response(service.store()),
            Err(message) => empty_list(message),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn get_cow(&self, cow_id: String) -> Option<CowItem> {
        let service = self.lock().ok()?;
        service.store().get_by_id(&cow_id).map(to_cow_item)
    }

    /// Whether the store is still loading its first snapshot.
    #[flutter_rust_bridge::frb(sync)]
    pub fn is_loading(&self) -> bool {
        self.lock()
            .map(|service| service.store().is_loading())
            .unwrap_or(false)
    }

    /// Replaces all filters. `None` or `"All"` selects everything.
    #[flutter_rust_bridge::frb(sync)]
    pub fn set_filters(
        &self,
        search_query: String,
        status: Option<String>,
        pen: Option<String>,
    ) -> ActionResponse {
        let status_filter = match status.as_deref() {
            None | Some(FILTER_ALL) => StatusFilter::All,
            Some(label) => match CowStatus::from_label(label) {
                Some(status) => StatusFilter::Only(status),
                None => return ActionResponse::failure(format!("unknown status `{label}`")),
            },
        };
        let pen_filter = match pen {
            None => PenFilter::All,
            Some(pen) if pen == FILTER_ALL => PenFilter::All,
            Some(pen) => PenFilter::Only(pen),
        };

        self.run("set_filters", |service| {
            service.store_mut().set_filters(CowFilters {
                search_query,
                status_filter,
                pen_filter,
            });
            Ok(ActionResponse::success("Filters applied.", None))
        })
    }

    /// Validates form input and adds a new cow.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_cow(
        &self,
        ear_tag: String,
        sex: String,
        pen: String,
        status: String,
        weight: String,
    ) -> ActionResponse {
        let Some(status) = CowStatus::from_label(status.trim()) else {
            return ActionResponse::failure(format!("unknown status `{status}`"));
        };
        let draft = CowDraft {
            ear_tag,
            sex: CowSex::from_label(sex.trim()),
            pen,
            status,
            weight,
        };

        self.run("add_cow", |service| {
            let cow = service.register_cow(&draft, now_epoch_ms())?;
            Ok(ActionResponse::success("Cow added.", Some(cow.id)))
        })
    }

    /// Appends a free-form event of type `kind` (display label).
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_event(&self, cow_id: String, kind: String, description: String) -> ActionResponse {
        let Some(kind) = EventType::from_label(kind.trim()) else {
            return ActionResponse::failure(format!("unknown event type `{kind}`"));
        };
        let event = CowEvent::new(kind, now_epoch_ms(), description.trim());

        self.run("add_event", |service| {
            service.store_mut().add_event(&cow_id, event)?;
            Ok(ActionResponse::success("Event recorded.", Some(cow_id.clone())))
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn record_weight(&self, cow_id: String, weight: f64, description: String) -> ActionResponse {
        self.run("record_weight", |service| {
            let updated = service.record_weight(&cow_id, weight, now_epoch_ms(), description)?;
            Ok(updated_response("Weight recorded.", updated))
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn record_treatment(
        &self,
        cow_id: String,
        treatment_type: String,
        description: String,
    ) -> ActionResponse {
        self.run("record_treatment", |service| {
            let updated =
                service.record_treatment(&cow_id, treatment_type, now_epoch_ms(), description)?;
            Ok(updated_response("Treatment recorded.", updated))
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn move_to_pen(&self, cow_id: String, new_pen: String) -> ActionResponse {
        self.run("move_to_pen", |service| {
            let updated = service.move_to_pen(&cow_id, &new_pen, now_epoch_ms())?;
            Ok(updated_response("Pen changed.", updated))
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn change_status(&self, cow_id: String, status: String) -> ActionResponse {
        let Some(status) = CowStatus::from_label(status.trim()) else {
            return ActionResponse::failure(format!("unknown status `{status}`"));
        };
        self.run("change_status", |service| {
            let updated = service.change_status(&cow_id, status, now_epoch_ms())?;
            Ok(updated_response("Status changed.", updated))
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn record_death(&self, cow_id: String, description: String) -> ActionResponse {
        self.run("record_death", |service| {
            let updated = service.record_death(&cow_id, now_epoch_ms(), description)?;
            Ok(updated_response("Death recorded.", updated))
        })
    }

    /// Deletes a cow. Unknown IDs succeed.
    #[flutter_rust_bridge::frb(sync)]
    pub fn delete_cow(&self, cow_id: String) -> ActionResponse {
        self.run("delete_cow", |service| {
            service.store_mut().delete(&cow_id)?;
            Ok(ActionResponse::success("Cow deleted.", Some(cow_id.clone())))
        })
    }

    /// Erases every cow and resets filters.
    #[flutter_rust_bridge::frb(sync)]
    pub fn clear_all(&self) -> ActionResponse {
        self.run("clear_all", |service| {
            service.store_mut().clear_all()?;
            Ok(ActionResponse::success("All data cleared.", None))
        })
    }

    /// Adds the demo herd, skipping tags already present.
    #[flutter_rust_bridge::frb(sync)]
    pub fn seed_sample_herd(&self) -> ActionResponse {
        self.run("seed_sample_herd", |service| {
            let added = service.store_mut().seed_sample_herd(now_epoch_ms())?;
            Ok(ActionResponse::success(
                format!("Added {added} sample cow(s)."),
                None,
            ))
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, HerdService<SqliteKeyValueStore>>, String> {
        self.service
            .lock()
            .map_err(|_| "herdbook session lock poisoned".to_string())
    }

    fn run(
        &self,
        operation: &str,
        f: impl FnOnce(
            &mut HerdService<SqliteKeyValueStore>,
        ) -> Result<ActionResponse, HerdServiceError>,
    ) -> ActionResponse {
        let mut service = match self.lock() {
            Ok(service) => service,
            Err(message) => return ActionResponse::failure(format!("{operation} failed: {message}")),
        };

        match f(&mut service) {
            Ok(response) => response,
            Err(HerdServiceError::Invalid(errors)) => ActionResponse::failure(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Err(err) => {
                warn!("event=ffi_call module=ffi status=error operation={operation} error={err}");
                ActionResponse::failure(format!("{operation} failed: {err}"))
            }
        }
    }
}

fn updated_response(message: &str, updated: Option<Cow>) -> ActionResponse {
    match updated {
        Some(cow) => ActionResponse::success(message, Some(cow.id)),
        None => ActionResponse::success("Cow not found; nothing changed.", None),
    }
}

fn list_response(store: &HerdStore<SqliteKeyValueStore>) -> CowListResponse {
    let items = store.get_filtered().iter().map(to_cow_item).collect::<Vec<_>>();
    let total = store.cows().len();
    let message = if items.is_empty() {
        "No cows.".to_string()
    } else {
        format!("Showing {} of {} cow(s).", items.len(), total)
    };
    CowListResponse {
        items,
        pens: store.distinct_pens(),
        total: u32::try_from(total).unwrap_or(u32::MAX),
        message,
    }
}

fn empty_list(message: String) -> CowListResponse {
    CowListResponse {
        items: Vec::new(),
        pens: Vec::new(),
        total: 0,
        message,
    }
}

fn resolve_db_path(explicit: Option<String>) -> PathBuf {
    let configured = explicit.or_else(|| std::env::var(DB_PATH_ENV).ok());
    match configured.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => std::env::temp_dir().join(DB_FILE_NAME),
    }
}

fn to_cow_item(cow: &Cow) -> CowItem {
    CowItem {
        id: cow.id.clone(),
        ear_tag: cow.ear_tag.clone(),
        sex: cow.sex.label().to_string(),
        pen: cow.pen.clone(),
        status: cow.status.label().to_string(),
        weight: cow.weight,
        daily_weight_gain: cow.daily_weight_gain,
        created_at_ms: cow.created_at,
        last_event_date_ms: cow.last_event_date,
        events: cow.events.iter().map(to_event_item).collect(),
    }
}

fn to_event_item(event: &CowEvent) -> CowEventItem {
    let metadata = event.metadata.clone().unwrap_or_default();
    CowEventItem {
        id: event.id.clone(),
        kind: event.kind.label().to_string(),
        date_ms: event.date,
        description: event.description.clone(),
        weight: metadata.weight,
        previous_pen: metadata.previous_pen,
        new_pen: metadata.new_pen,
        previous_status: metadata.previous_status.map(|status| status.label().to_string()),
        new_status: metadata.new_status.map(|status| status.label().to_string()),
        treatment_type: metadata.treatment_type,
    }
}

#[cfg(test)]
mod tests {
    use super::{core_version, init_logging, ping, resolve_db_path, HerdbookSession};

    fn session() -> HerdbookSession {
        HerdbookSession::open_in_memory().expect("in-memory session")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn explicit_db_path_wins() {
        assert_eq!(
            resolve_db_path(Some(" /data/herd.db ".to_string())),
            std::path::PathBuf::from("/data/herd.db")
        );
    }

    #[test]
    fn add_cow_then_filter_by_status() {
        let session = session();
        let added = session.add_cow(
            "COW-200".to_string(),
            "Female".to_string(),
            "A1".to_string(),
            "Active".to_string(),
            String::new(),
        );
        assert!(added.ok, "{}", added.message);
        session.seed_sample_herd();

        let applied = session.set_filters(String::new(), Some("In Treatment".to_string()), None);
        assert!(applied.ok);
        let list = session.filtered_cows();
        assert_eq!(list.total, 4);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].ear_tag, "COW-002");
        assert_eq!(list.pens, ["A1", "B2"]);
    }

    #[test]
    fn add_cow_reports_validation_messages() {
        let session = session();
        let response = session.add_cow(
            String::new(),
            String::new(),
            "A1".to_string(),
            "Active".to_string(),
            "-5".to_string(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("Ear tag is required"));
        assert!(response.message.contains("Weight must be a positive number"));
        assert_eq!(session.filtered_cows().total, 0);
    }

    #[test]
    fn lifecycle_calls_append_events() {
        let session = session();
        let cow_id = session
            .add_cow(
                "COW-300".to_string(),
                "Male".to_string(),
                "A1".to_string(),
                "Active".to_string(),
                "400".to_string(),
            )
            .cow_id
            .expect("created cow id");

        assert!(session.move_to_pen(cow_id.clone(), "C4".to_string()).ok);
        assert!(session
            .add_event(cow_id.clone(), "Treatment".to_string(), "dewormed".to_string())
            .ok);
        let cow = session.get_cow(cow_id.clone()).expect("cow exists");
        assert_eq!(cow.pen, "C4");
        assert_eq!(cow.events[0].kind, "Treatment");
        assert_eq!(cow.events[1].new_pen.as_deref(), Some("C4"));
        assert_eq!(cow.last_event_date_ms, cow.events[0].date_ms);

        assert!(!session
            .add_event(cow_id, "Birthday".to_string(), String::new())
            .ok);
    }

    #[test]
    fn session_file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herd.sqlite3").display().to_string();

        let first = HerdbookSession::open(Some(path.clone())).unwrap();
        assert!(first.seed_sample_herd().ok);
        drop(first);

        let second = HerdbookSession::open(Some(path)).unwrap();
        assert!(!second.is_loading());
        assert_eq!(second.load_cows().total, 3);
        assert!(second.clear_all().ok);
        assert_eq!(second.filtered_cows().total, 0);
    }
}

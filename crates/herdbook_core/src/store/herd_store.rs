//! In-memory herd authority synchronized to a key-value collaborator.
//!
//! # Responsibility
//! - Own the authoritative cow collection and active filter criteria.
//! - Mirror every mutation to durable storage before touching memory.
//! - Expose filtered, derived views without mutating the collection.
//!
//! # Invariants
//! - In-memory state never runs ahead of durable state: a failed write leaves
//!   memory as it was.
//! - Every durable write rewrites the whole collection under one key.
//! - Read failures degrade to an empty herd and are only logged, both in
//!   `load` and inside write paths. Only `set`/`remove` failures propagate.
//! - Missing IDs on update/delete/add_event are silent no-ops.

use crate::model::cow::{Cow, CowEvent};
use crate::model::filters::CowFilters;
use crate::search::filter::{distinct_pens, filter_cows, filter_cows_sorted_by};
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Well-known key holding the serialized herd document.
pub const COWS_STORAGE_KEY: &str = "herdbook.cows";

pub type StoreResult<T> = Result<T, StoreError>;

/// Durability failure surfaced by store write operations.
#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    /// Herd document could not be encoded.
    Serialization(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid herd document: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Domain store for the herd.
///
/// Constructed explicitly over an owned persistence collaborator; callers
/// pass it by reference to whatever presentation layer drives it.
pub struct HerdStore<S: KeyValueStore> {
    storage: S,
    storage_key: String,
    cows: Vec<Cow>,
    filters: CowFilters,
    loading: bool,
}

impl<S: KeyValueStore> HerdStore<S> {
    /// Creates an unloaded store using [`COWS_STORAGE_KEY`].
    ///
    /// The loading flag starts `true` until the first [`HerdStore::load`].
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            storage_key: COWS_STORAGE_KEY.to_string(),
            cows: Vec::new(),
            filters: CowFilters::default(),
            loading: true,
        }
    }

    /// Creates a store and immediately loads persisted state.
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current collection in insertion order.
    pub fn cows(&self) -> &[Cow] {
        &self.cows
    }

    pub fn filters(&self) -> &CowFilters {
        &self.filters
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Tears the store down, handing the collaborator back to the caller.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Replaces the in-memory herd with persisted state.
    ///
    /// Never fails: missing, unreadable or malformed data yields an empty
    /// herd. The loading flag is `false` afterwards in every case.
    pub fn load(&mut self) {
        self.loading = true;
        self.cows = match self.read_durable() {
            Ok(cows) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    cows.len()
                );
                cows
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=degraded error_code=load_failed error={}",
                    err
                );
                Vec::new()
            }
        };
        self.loading = false;
    }

    /// Appends a new cow, durable write first.
    ///
    /// Ear tag uniqueness is the caller's responsibility. An unreadable
    /// document is treated as empty, so it is overwritten by this cow.
    pub fn add(&mut self, cow: Cow) -> StoreResult<()> {
        let mut durable = self.read_for_write("store_add");
        durable.push(cow.clone());
        self.write_durable(&durable)
            .inspect_err(|err| log_write_error("store_add", &cow.id, err))?;

        info!(
            "event=store_add module=store status=ok cow_id={}",
            cow.id
        );
        self.cows.push(cow);
        Ok(())
    }

    /// Replaces the cow with the same ID.
    ///
    /// When no durable entry matches, nothing is written.
    pub fn update(&mut self, cow: Cow) -> StoreResult<()> {
        let mut durable = self.read_for_write("store_update");
        match durable.iter_mut().find(|stored| stored.id == cow.id) {
            Some(stored) => {
                *stored = cow.clone();
                self.write_durable(&durable)
                    .inspect_err(|err| log_write_error("store_update", &cow.id, err))?;
                info!(
                    "event=store_update module=store status=ok cow_id={}",
                    cow.id
                );
            }
            None => debug!(
                "event=store_update module=store status=skipped reason=not_found cow_id={}",
                cow.id
            ),
        }

        if let Some(slot) = self.cows.iter_mut().find(|slot| slot.id == cow.id) {
            *slot = cow;
        }
        Ok(())
    }

    /// Removes the cow with `id`. Idempotent.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let mut durable = self.read_for_write("store_delete");
        let before = durable.len();
        durable.retain(|stored| stored.id != id);
        if durable.len() != before {
            self.write_durable(&durable)
                .inspect_err(|err| log_write_error("store_delete", id, err))?;
        }

        self.cows.retain(|cow| cow.id != id);
        info!(
            "event=store_delete module=store status=ok cow_id={} removed={}",
            id,
            before - durable.len()
        );
        Ok(())
    }

    /// Erases the durable herd, empties memory and resets filters.
    ///
    /// On failure memory and filters are left untouched.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        if let Err(err) = self.storage.remove(&self.storage_key) {
            warn!(
                "event=store_clear module=store status=error error_code=remove_failed error={}",
                err
            );
            return Err(err.into());
        }

        let cleared = self.cows.len();
        self.cows.clear();
        self.filters = CowFilters::default();
        info!("event=store_clear module=store status=ok cleared={cleared}");
        Ok(())
    }

    /// Pure in-memory lookup.
    pub fn get_by_id(&self, id: &str) -> Option<&Cow> {
        self.cows.iter().find(|cow| cow.id == id)
    }

    /// Replaces the active criteria wholesale.
    pub fn set_filters(&mut self, filters: CowFilters) {
        self.filters = filters;
    }

    /// Cows matching the active criteria, in collection order.
    pub fn get_filtered(&self) -> Vec<Cow> {
        filter_cows(&self.cows, &self.filters)
    }

    /// Cows matching the active criteria, ordered by `compare`.
    pub fn filtered_sorted_by<F>(&self, compare: F) -> Vec<Cow>
    where
        F: FnMut(&Cow, &Cow) -> Ordering,
    {
        filter_cows_sorted_by(&self.cows, &self.filters, compare)
    }

    /// Sorted pen labels in use, for pen selector options.
    pub fn distinct_pens(&self) -> Vec<String> {
        distinct_pens(&self.cows)
    }

    /// Returns whether a trimmed `ear_tag` is already used (case-sensitive).
    pub fn is_ear_tag_taken(&self, ear_tag: &str) -> bool {
        let ear_tag = ear_tag.trim();
        self.cows.iter().any(|cow| cow.ear_tag == ear_tag)
    }

    /// Prepends `event` to the cow's history and persists it via `update`.
    ///
    /// Missing IDs are ignored without error.
    pub fn add_event(&mut self, id: &str, event: CowEvent) -> StoreResult<()> {
        let Some(mut cow) = self.get_by_id(id).cloned() else {
            debug!(
                "event=store_add_event module=store status=skipped reason=not_found cow_id={id}"
            );
            return Ok(());
        };

        cow.push_event(event);
        self.update(cow)
    }

    fn read_durable(&self) -> StoreResult<Vec<Cow>> {
        match self.storage.get(&self.storage_key)? {
            Some(document) => Ok(serde_json::from_str(&document)?),
            None => Ok(Vec::new()),
        }
    }

    /// Durable collection for a read-modify-write; unreadable reads as empty.
    fn read_for_write(&self, event: &str) -> Vec<Cow> {
        self.read_durable().unwrap_or_else(|err| {
            warn!(
                "event={event} module=store status=degraded error_code=read_failed error={err}"
            );
            Vec::new()
        })
    }

    fn write_durable(&mut self, cows: &[Cow]) -> StoreResult<()> {
        let document = serde_json::to_string(cows)?;
        self.storage.set(&self.storage_key, &document)?;
        Ok(())
    }
}

fn log_write_error(event: &str, cow_id: &str, err: &StoreError) {
    warn!(
        "event={event} module=store status=error error_code=write_failed cow_id={cow_id} error={err}"
    );
}

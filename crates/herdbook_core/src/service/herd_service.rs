//! Herd use-case service.
//!
//! # Responsibility
//! - Turn form input and lifecycle actions into store operations.
//! - Keep field updates and their history events in one durable write.
//!
//! # Invariants
//! - Every lifecycle action appends exactly one event, newest first.
//! - Actions on unknown cow IDs return `Ok(None)` without writing.
//! - Registration validates against the current in-memory herd.

use crate::model::cow::{Cow, CowEvent, CowStatus, EpochMillis};
use crate::service::cow_form::{CowDraft, CowField, FieldError, FieldErrorKind};
use crate::storage::KeyValueStore;
use crate::store::herd_store::{HerdStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type HerdServiceResult<T> = Result<T, HerdServiceError>;

/// Service error for herd use-cases.
#[derive(Debug)]
pub enum HerdServiceError {
    /// Input rejected before any write.
    Invalid(Vec<FieldError>),
    /// Durability failure from the store.
    Store(StoreError),
}

impl Display for HerdServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => {
                let messages = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                write!(f, "invalid input: {}", messages.join("; "))
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HerdServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for HerdServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case wrapper owning a [`HerdStore`].
pub struct HerdService<S: KeyValueStore> {
    store: HerdStore<S>,
}

impl<S: KeyValueStore> HerdService<S> {
    pub fn new(store: HerdStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &HerdStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut HerdStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> HerdStore<S> {
        self.store
    }

    /// Validates `draft` and adds the resulting cow.
    ///
    /// # Contract
    /// - New cow carries one `Created` event dated `now`.
    /// - Returns the stored cow.
    pub fn register_cow(&mut self, draft: &CowDraft, now: EpochMillis) -> HerdServiceResult<Cow> {
        let fields = draft
            .validate(self.store.cows())
            .map_err(HerdServiceError::Invalid)?;
        let cow = Cow::create(fields, now);
        self.store.add(cow.clone())?;
        Ok(cow)
    }

    /// Records a weigh-in and updates the current weight.
    pub fn record_weight(
        &mut self,
        id: &str,
        weight: f64,
        now: EpochMillis,
        description: impl Into<String>,
    ) -> HerdServiceResult<Option<Cow>> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(HerdServiceError::Invalid(vec![FieldError::new(
                CowField::Weight,
                FieldErrorKind::NotPositive,
            )]));
        }

        let event = CowEvent::weight_check(weight, now, description);
        self.apply(id, event, |cow| cow.weight = Some(weight))
    }

    /// Records a treatment without changing status.
    pub fn record_treatment(
        &mut self,
        id: &str,
        treatment_type: impl Into<String>,
        now: EpochMillis,
        description: impl Into<String>,
    ) -> HerdServiceResult<Option<Cow>> {
        let event = CowEvent::treatment(treatment_type, now, description);
        self.apply(id, event, |_| {})
    }

    /// Moves a cow to `new_pen`, recording the previous pen.
    pub fn move_to_pen(
        &mut self,
        id: &str,
        new_pen: &str,
        now: EpochMillis,
    ) -> HerdServiceResult<Option<Cow>> {
        let new_pen = new_pen.trim();
        if new_pen.is_empty() {
            return Err(HerdServiceError::Invalid(vec![FieldError::new(
                CowField::Pen,
                FieldErrorKind::Required,
            )]));
        }

        let Some(previous_pen) = self.store.get_by_id(id).map(|cow| cow.pen.clone()) else {
            return Ok(None);
        };
        let event = CowEvent::pen_change(previous_pen, new_pen, now);
        self.apply(id, event, |cow| cow.pen = new_pen.to_string())
    }

    /// Changes status, recording previous and new values.
    ///
    /// A change to the current status returns the cow unchanged.
    pub fn change_status(
        &mut self,
        id: &str,
        status: CowStatus,
        now: EpochMillis,
    ) -> HerdServiceResult<Option<Cow>> {
        let Some(previous) = self.store.get_by_id(id).map(|cow| cow.status) else {
            return Ok(None);
        };
        if previous == status {
            return Ok(self.store.get_by_id(id).cloned());
        }

        let event = CowEvent::status_change(previous, status, now);
        self.apply(id, event, |cow| cow.status = status)
    }

    /// Records a death and marks the cow `Deceased`.
    pub fn record_death(
        &mut self,
        id: &str,
        now: EpochMillis,
        description: impl Into<String>,
    ) -> HerdServiceResult<Option<Cow>> {
        let event = CowEvent::death(now, description);
        self.apply(id, event, |cow| cow.status = CowStatus::Deceased)
    }

    fn apply(
        &mut self,
        id: &str,
        event: CowEvent,
        mutate: impl FnOnce(&mut Cow),
    ) -> HerdServiceResult<Option<Cow>> {
        let Some(mut cow) = self.store.get_by_id(id).cloned() else {
            return Ok(None);
        };

        mutate(&mut cow);
        cow.push_event(event);
        self.store.update(cow.clone())?;
        Ok(Some(cow))
    }
}


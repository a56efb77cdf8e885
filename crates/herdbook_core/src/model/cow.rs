//! Cow domain model.
//!
//! # Responsibility
//! - Define the canonical animal record and its event history.
//! - Provide construction helpers for new records and typed events.
//!
//! # Invariants
//! - `id` is stable and never reused for another cow.
//! - `events` is ordered newest first.
//! - After any event append, `last_event_date == events[0].date`.
//!
//! # See also
//! - crates/herdbook_core/src/store/herd_store.rs

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a cow record.
///
/// Kept as a string so records imported from older documents load unchanged.
pub type CowId = String;

/// Stable identifier of a history event.
pub type EventId = String;

/// Unix epoch milliseconds.
pub type EpochMillis = i64;

/// Generates a fresh opaque identifier for records and events.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Biological sex of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CowSex {
    Male,
    Female,
}

/// Herd lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CowStatus {
    Active,
    #[serde(rename = "In Treatment")]
    InTreatment,
    Deceased,
}

impl CowStatus {
    /// All statuses in display order.
    pub const ALL: [CowStatus; 3] = [Self::Active, Self::InTreatment, Self::Deceased];

    /// Human-readable label, identical to the persisted form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::InTreatment => "In Treatment",
            Self::Deceased => "Deceased",
        }
    }

    /// Parses a display label back into a status.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == value)
    }
}

impl Display for CowStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl CowSex {
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Kind of history entry attached to a cow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Created,
    #[serde(rename = "Weight Check")]
    WeightCheck,
    Treatment,
    #[serde(rename = "Pen Change")]
    PenChange,
    #[serde(rename = "Status Change")]
    StatusChange,
    Death,
}

impl EventType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::WeightCheck => "Weight Check",
            Self::Treatment => "Treatment",
            Self::PenChange => "Pen Change",
            Self::StatusChange => "Status Change",
            Self::Death => "Death",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        [
            Self::Created,
            Self::WeightCheck,
            Self::Treatment,
            Self::PenChange,
            Self::StatusChange,
            Self::Death,
        ]
        .into_iter()
        .find(|kind| kind.label() == value)
    }
}

/// Optional typed payload of an event.
///
/// Shape depends on the event type; the store never validates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_pen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_pen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<CowStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status: Option<CowStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_type: Option<String>,
}

/// One timestamped history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CowEvent {
    pub id: EventId,
    /// Serialized as `type` to match the persisted document.
    #[serde(rename = "type")]
    pub kind: EventType,
    pub date: EpochMillis,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EventMetadata>,
}

impl CowEvent {
    /// Creates an event with a generated ID and no metadata.
    pub fn new(kind: EventType, date: EpochMillis, description: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            kind,
            date,
            description: description.into(),
            metadata: None,
        }
    }

    /// Initial history entry for a freshly created cow.
    pub fn created(ear_tag: &str, date: EpochMillis) -> Self {
        Self::new(EventType::Created, date, format!("Cow {ear_tag} created"))
    }

    pub fn weight_check(weight: f64, date: EpochMillis, description: impl Into<String>) -> Self {
        Self::new(EventType::WeightCheck, date, description).with_metadata(EventMetadata {
            weight: Some(weight),
            ..EventMetadata::default()
        })
    }

    pub fn treatment(
        treatment_type: impl Into<String>,
        date: EpochMillis,
        description: impl Into<String>,
    ) -> Self {
        Self::new(EventType::Treatment, date, description).with_metadata(EventMetadata {
            treatment_type: Some(treatment_type.into()),
            ..EventMetadata::default()
        })
    }

    pub fn pen_change(
        previous_pen: impl Into<String>,
        new_pen: impl Into<String>,
        date: EpochMillis,
    ) -> Self {
        let previous_pen = previous_pen.into();
        let new_pen = new_pen.into();
        let description = format!("Moved from pen {previous_pen} to {new_pen}");
        Self::new(EventType::PenChange, date, description).with_metadata(EventMetadata {
            previous_pen: Some(previous_pen),
            new_pen: Some(new_pen),
            ..EventMetadata::default()
        })
    }

    pub fn status_change(previous: CowStatus, next: CowStatus, date: EpochMillis) -> Self {
        let description = format!("Status changed from {previous} to {next}");
        Self::new(EventType::StatusChange, date, description).with_metadata(EventMetadata {
            previous_status: Some(previous),
            new_status: Some(next),
            ..EventMetadata::default()
        })
    }

    pub fn death(date: EpochMillis, description: impl Into<String>) -> Self {
        Self::new(EventType::Death, date, description).with_metadata(EventMetadata {
            new_status: Some(CowStatus::Deceased),
            ..EventMetadata::default()
        })
    }

    /// Replaces the metadata bag.
    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Validated field values for a new cow.
///
/// Produced by `service::cow_form::CowDraft::validate`; consumed by [`Cow::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewCow {
    pub ear_tag: String,
    pub sex: CowSex,
    pub pen: String,
    pub status: CowStatus,
    pub weight: Option<f64>,
}

/// Canonical record of one tracked animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cow {
    /// Stable ID used for lookups and persistence replacement.
    pub id: CowId,
    /// Unique human-readable tag, checked at creation only.
    pub ear_tag: String,
    pub sex: CowSex,
    pub pen: String,
    pub status: CowStatus,
    /// Kilograms. Positive when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Informational only; supplied externally, never derived here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_weight_gain: Option<f64>,
    pub created_at: EpochMillis,
    pub last_event_date: EpochMillis,
    /// Newest first.
    #[serde(default)]
    pub events: Vec<CowEvent>,
}

impl Cow {
    /// Builds a new record with a generated ID and its `Created` event.
    ///
    /// # Invariants
    /// - `created_at == last_event_date == now`.
    /// - `events` holds exactly one `EventType::Created` entry.
    pub fn create(fields: NewCow, now: EpochMillis) -> Self {
        let created = CowEvent::created(&fields.ear_tag, now);
        Self {
            id: new_id(),
            ear_tag: fields.ear_tag,
            sex: fields.sex,
            pen: fields.pen,
            status: fields.status,
            weight: fields.weight,
            daily_weight_gain: None,
            created_at: now,
            last_event_date: now,
            events: vec![created],
        }
    }

    /// Prepends `event` and moves `last_event_date` to its date.
    pub fn push_event(&mut self, event: CowEvent) {
        self.last_event_date = event.date;
        self.events.insert(0, event);
    }
}

//! Demo herd used for first-run previews and smoke checks.

use super::herd_store::{HerdStore, StoreResult};
use crate::model::cow::{Cow, CowEvent, CowSex, CowStatus, EpochMillis};
use crate::storage::KeyValueStore;

const DAY_MS: EpochMillis = 24 * 60 * 60 * 1000;

/// Builds the three demo cows relative to `now`.
///
/// IDs are fixed (`"1"`, `"2"`, `"3"`) so repeated seeding is recognizable.
pub fn sample_herd(now: EpochMillis) -> Vec<Cow> {
    let seven_days_ago = now - 7 * DAY_MS;
    let fourteen_days_ago = now - 14 * DAY_MS;

    vec![
        Cow {
            id: "1".to_string(),
            ear_tag: "COW-001".to_string(),
            sex: CowSex::Female,
            pen: "A1".to_string(),
            status: CowStatus::Active,
            weight: Some(450.0),
            daily_weight_gain: Some(1.2),
            created_at: fourteen_days_ago,
            last_event_date: seven_days_ago,
            events: vec![
                fixed_id(
                    "1-1",
                    CowEvent::weight_check(450.0, seven_days_ago, "Regular weight check"),
                ),
                fixed_id("1-2", CowEvent::created("COW-001", fourteen_days_ago)),
            ],
        },
        Cow {
            id: "2".to_string(),
            ear_tag: "COW-002".to_string(),
            sex: CowSex::Male,
            pen: "A1".to_string(),
            status: CowStatus::InTreatment,
            weight: Some(520.0),
            daily_weight_gain: Some(0.8),
            created_at: fourteen_days_ago,
            last_event_date: now,
            events: vec![
                fixed_id(
                    "2-1",
                    CowEvent::treatment("Antibiotics", now, "Started antibiotic treatment"),
                ),
                fixed_id("2-2", CowEvent::created("COW-002", fourteen_days_ago)),
            ],
        },
        Cow {
            id: "3".to_string(),
            ear_tag: "COW-003".to_string(),
            sex: CowSex::Female,
            pen: "B2".to_string(),
            status: CowStatus::Active,
            weight: Some(380.0),
            daily_weight_gain: None,
            created_at: seven_days_ago,
            last_event_date: seven_days_ago,
            events: vec![fixed_id("3-1", CowEvent::created("COW-003", seven_days_ago))],
        },
    ]
}

impl<S: KeyValueStore> HerdStore<S> {
    /// Adds every demo cow whose ear tag and ID are both unused.
    ///
    /// Returns how many cows were added.
    pub fn seed_sample_herd(&mut self, now: EpochMillis) -> StoreResult<usize> {
        let mut added = 0;
        for cow in sample_herd(now) {
            if self.is_ear_tag_taken(&cow.ear_tag) || self.get_by_id(&cow.id).is_some() {
                continue;
            }
            self.add(cow)?;
            added += 1;
        }
        Ok(added)
    }
}

fn fixed_id(id: &str, mut event: CowEvent) -> CowEvent {
    event.id = id.to_string();
    event
}

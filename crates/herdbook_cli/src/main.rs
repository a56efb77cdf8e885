//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `herdbook_core` linkage without the Flutter runtime.
//! - Exercise a seed, reload and filter round-trip on an in-memory database.

use herdbook_core::{
    core_version, now_epoch_ms, ping, CowFilters, CowStatus, HerdStore, SqliteKeyValueStore,
    StatusFilter,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("herdbook_core ping={}", ping());
    println!("herdbook_core version={}", core_version());

    match smoke_round_trip() {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("herdbook smoke failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn smoke_round_trip() -> Result<String, Box<dyn std::error::Error>> {
    let storage = SqliteKeyValueStore::open_in_memory()?;
    let mut store = HerdStore::open(storage);
    let seeded = store.seed_sample_herd(now_epoch_ms())?;

    let mut reloaded = HerdStore::new(store.into_storage());
    reloaded.load();
    reloaded.set_filters(CowFilters {
        status_filter: StatusFilter::Only(CowStatus::Active),
        ..CowFilters::default()
    });

    Ok(format!(
        "herdbook smoke seeded={} loaded={} active={} pens={}",
        seeded,
        reloaded.cows().len(),
        reloaded.get_filtered().len(),
        reloaded.distinct_pens().join(",")
    ))
}

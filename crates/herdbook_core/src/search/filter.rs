//! In-memory herd filtering.
//!
//! # Responsibility
//! - Evaluate `CowFilters` against cow records.
//! - Derive picker options (distinct pens) from a collection.
//!
//! # Invariants
//! - All three criteria combine with logical AND.
//! - Results preserve input order and never mutate the input.
//! - Search matching is case-insensitive; pen and status matching are exact.

use crate::model::cow::Cow;
use crate::model::filters::CowFilters;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Returns whether `cow` satisfies every criterion of `filters`.
pub fn matches(cow: &Cow, filters: &CowFilters) -> bool {
    matches_search(cow, &filters.search_query)
        && filters.status_filter.accepts(cow.status)
        && filters.pen_filter.accepts(&cow.pen)
}

/// Returns the matching cows in their original order.
pub fn filter_cows(cows: &[Cow], filters: &CowFilters) -> Vec<Cow> {
    cows.iter()
        .filter(|cow| matches(cow, filters))
        .cloned()
        .collect()
}

/// Returns the matching cows ordered by `compare`.
///
/// The sort is stable, so ties keep insertion order.
pub fn filter_cows_sorted_by<F>(cows: &[Cow], filters: &CowFilters, compare: F) -> Vec<Cow>
where
    F: FnMut(&Cow, &Cow) -> Ordering,
{
    let mut filtered = filter_cows(cows, filters);
    filtered.sort_by(compare);
    filtered
}

/// Sorted, deduplicated pen labels present in `cows`.
pub fn distinct_pens(cows: &[Cow]) -> Vec<String> {
    cows.iter()
        .map(|cow| cow.pen.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn matches_search(cow: &Cow, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    cow.ear_tag.to_lowercase().contains(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{distinct_pens, filter_cows, filter_cows_sorted_by, matches};
    use crate::model::cow::{Cow, CowSex, CowStatus, NewCow};
    use crate::model::filters::{CowFilters, PenFilter, StatusFilter};

    fn cow(tag: &str, status: CowStatus, pen: &str) -> Cow {
        Cow::create(
            NewCow {
                ear_tag: tag.to_string(),
                sex: CowSex::Female,
                pen: pen.to_string(),
                status,
                weight: None,
            },
            0,
        )
    }

    fn herd() -> Vec<Cow> {
        vec![
            cow("COW-001", CowStatus::Active, "A1"),
            cow("COW-002", CowStatus::InTreatment, "A1"),
            cow("COW-003", CowStatus::Active, "B2"),
        ]
    }

    fn tags(cows: &[Cow]) -> Vec<&str> {
        cows.iter().map(|cow| cow.ear_tag.as_str()).collect()
    }

    #[test]
    fn default_filters_are_identity() {
        let herd = herd();
        assert_eq!(filter_cows(&herd, &CowFilters::default()), herd);
    }

    #[test]
    fn status_filter_keeps_only_matching_status() {
        let filters = CowFilters {
            status_filter: StatusFilter::Only(CowStatus::Active),
            ..CowFilters::default()
        };
        assert_eq!(tags(&filter_cows(&herd(), &filters)), ["COW-001", "COW-003"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let filters = CowFilters {
            search_query: "cow-002".to_string(),
            ..CowFilters::default()
        };
        assert_eq!(tags(&filter_cows(&herd(), &filters)), ["COW-002"]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let filters = CowFilters {
            search_query: "00".to_string(),
            status_filter: StatusFilter::Only(CowStatus::Active),
            pen_filter: PenFilter::Only("A1".to_string()),
        };
        assert_eq!(tags(&filter_cows(&herd(), &filters)), ["COW-001"]);
    }

    #[test]
    fn pen_filter_is_exact_match() {
        let filters = CowFilters {
            pen_filter: PenFilter::Only("a1".to_string()),
            ..CowFilters::default()
        };
        assert!(filter_cows(&herd(), &filters).is_empty());
    }

    #[test]
    fn every_result_satisfies_all_predicates() {
        let herd = herd();
        let mut criteria = Vec::new();
        for status in StatusFilter::options() {
            for pen in [PenFilter::All, PenFilter::Only("A1".to_string())] {
                for search in ["", "cow", "3", "zzz"] {
                    criteria.push(CowFilters {
                        search_query: search.to_string(),
                        status_filter: status,
                        pen_filter: pen.clone(),
                    });
                }
            }
        }

        for filters in criteria {
            let result = filter_cows(&herd, &filters);
            assert!(result.iter().all(|cow| matches(cow, &filters)));
            assert!(result.iter().all(|cow| herd.contains(cow)));
            let expected = herd.iter().filter(|cow| matches(cow, &filters)).count();
            assert_eq!(result.len(), expected);
        }
    }

    #[test]
    fn sorted_view_applies_caller_ordering() {
        let sorted = filter_cows_sorted_by(&herd(), &CowFilters::default(), |a, b| {
            b.ear_tag.cmp(&a.ear_tag)
        });
        assert_eq!(tags(&sorted), ["COW-003", "COW-002", "COW-001"]);
    }

    #[test]
    fn distinct_pens_are_sorted_and_unique() {
        let mut herd = herd();
        herd.push(cow("COW-004", CowStatus::Deceased, "A0"));
        assert_eq!(distinct_pens(&herd), ["A0", "A1", "B2"]);
    }
}

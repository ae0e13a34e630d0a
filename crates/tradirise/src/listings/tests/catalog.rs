use super::common::*;

use crate::listings::catalog::{CatalogError, ListingCatalog};
use crate::listings::domain::{ListingKind, ListingSet};
use crate::listings::filters::{FilterState, SortMode};
use crate::listings::source::{ListingSource, SourceError};

struct StubSource;

impl ListingSource for StubSource {
    fn fetch(&self, kind: ListingKind) -> Result<ListingSet, SourceError> {
        Ok(match kind {
            ListingKind::Personnel => ListingSet::Personnel(roster()),
            ListingKind::Business => ListingSet::Businesses(vec![
                business("b-1", "2024-01-01", "Kauri Roofing"),
                business("b-2", "2024-03-01", "Tui Plumbing"),
            ]),
            other => ListingSet::empty(other),
        })
    }
}

struct OfflineSource;

impl ListingSource for OfflineSource {
    fn fetch(&self, _kind: ListingKind) -> Result<ListingSet, SourceError> {
        Err(SourceError::Unavailable("listings service offline".to_string()))
    }
}

#[test]
fn load_fetches_every_kind() {
    let catalog = ListingCatalog::load(&StubSource).expect("catalog loads");

    let personnel = catalog
        .search(ListingKind::Personnel, &FilterState::default())
        .expect("search personnel");
    assert_eq!(personnel.total, 4);
    assert_eq!(personnel.matched, 4);

    let positions = catalog
        .search(ListingKind::Position, &FilterState::default())
        .expect("search positions");
    assert_eq!(positions.total, 0);
    assert!(positions.items.is_empty());
    assert_eq!(positions.items.kind(), ListingKind::Position);
}

#[test]
fn load_surfaces_source_failures() {
    let err = ListingCatalog::load(&OfflineSource)
        .err()
        .expect("offline source fails");
    assert!(matches!(err, CatalogError::Source(SourceError::Unavailable(_))));
    assert!(err.to_string().contains("offline"));
}

#[test]
fn search_reports_totals_items_and_options() {
    let catalog = ListingCatalog::load(&StubSource).expect("catalog loads");
    let filters = FilterState::default()
        .with_exact("trade", "Electrician")
        .sorted_by(SortMode::Oldest);

    let results = catalog
        .search(ListingKind::Personnel, &filters)
        .expect("search personnel");
    assert_eq!(results.kind, ListingKind::Personnel);
    assert_eq!(results.total, 4);
    assert_eq!(results.matched, 2);
    assert_eq!(results.options.get("trade").len(), 3);

    let rows = results.rows();
    let row_ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(row_ids, vec!["p-4", "p-1"]);
    assert_eq!(rows[0].name, "Electrician");
    assert_eq!(rows[1].name, "Hemi Walker");
    assert_eq!(rows[1].detail("accreditations"), Some("EWRB, Site Safe"));
    assert_eq!(rows[1].available_on, Some(date(2024, 1, 10)));
    assert_eq!(rows[1].detail("available_from"), Some("2024-01-10"));
    assert_eq!(rows[0].detail("available_from"), None);
}

#[test]
fn total_reports_source_size_without_deriving_a_view() {
    let catalog = ListingCatalog::load(&StubSource).expect("catalog loads");

    assert_eq!(catalog.total(ListingKind::Personnel).expect("total"), 4);
    assert_eq!(catalog.total(ListingKind::Project).expect("total"), 0);

    let stats = catalog.stats(ListingKind::Personnel).expect("stats");
    assert_eq!(stats.view_derivations, 0);
}

#[test]
fn repeated_searches_hit_the_memoized_view() {
    let catalog = ListingCatalog::load(&StubSource).expect("catalog loads");
    let filters = FilterState::default().searching("plumbing");

    for _ in 0..3 {
        let results = catalog
            .search(ListingKind::Business, &filters)
            .expect("search businesses");
        assert_eq!(results.matched, 1);
    }

    let stats = catalog.stats(ListingKind::Business).expect("stats");
    assert_eq!(stats.view_derivations, 1);
    assert_eq!(stats.option_extractions, 2);
}

#[test]
fn replace_swaps_the_source_set() {
    let catalog = ListingCatalog::load(&StubSource).expect("catalog loads");
    let replacement = ListingSet::Personnel(electrician_and_plumber());

    let total = catalog.replace(replacement).expect("replace personnel");
    assert_eq!(total, 2);

    let options = catalog.options(ListingKind::Personnel).expect("options");
    assert_eq!(options.get("region"), ["Auckland", "Wellington"]);

    let results = catalog
        .search(ListingKind::Personnel, &FilterState::default())
        .expect("search personnel");
    let ListingSet::Personnel(items) = results.items else {
        panic!("expected personnel items");
    };
    let item_ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(item_ids, vec!["2", "1"]);
}

#[test]
fn default_catalog_is_empty() {
    let catalog = ListingCatalog::default();
    for kind in ListingKind::ordered() {
        let results = catalog
            .search(kind, &FilterState::default())
            .expect("search empty kind");
        assert_eq!(results.total, 0);
        assert!(results.options.is_empty());
    }
}

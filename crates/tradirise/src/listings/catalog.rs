use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::info;

use super::domain::{
    BusinessListing, Listing, ListingKind, ListingSet, PersonnelListing, PositionListing,
    ProjectListing,
};
use super::engine::FilterOptions;
use super::filters::FilterState;
use super::source::{ListingSource, SourceError};
use super::view::{ListingView, ViewStats};
use super::views::{listing_row, ListingRow};

/// One memoized view per listing kind, shared by request handlers.
pub struct ListingCatalog {
    personnel: Mutex<ListingView<PersonnelListing>>,
    positions: Mutex<ListingView<PositionListing>>,
    projects: Mutex<ListingView<ProjectListing>>,
    businesses: Mutex<ListingView<BusinessListing>>,
}

/// Result of running the pipeline for one kind.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub kind: ListingKind,
    pub total: usize,
    pub matched: usize,
    pub items: ListingSet,
    pub options: FilterOptions,
}

impl SearchResults {
    /// Display rows for terminal output.
    pub fn rows(&self) -> Vec<ListingRow> {
        match &self.items {
            ListingSet::Personnel(items) => rows_for(items),
            ListingSet::Positions(items) => rows_for(items),
            ListingSet::Projects(items) => rows_for(items),
            ListingSet::Businesses(items) => rows_for(items),
        }
    }
}

fn rows_for<T: Listing>(items: &[T]) -> Vec<ListingRow> {
    let schema = T::schema();
    items.iter().map(|item| listing_row(&schema, item)).collect()
}

/// Error raised by the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("{0} listing view is unavailable after a panic")]
    Poisoned(ListingKind),
}

impl Default for ListingCatalog {
    fn default() -> Self {
        Self {
            personnel: Mutex::new(ListingView::new(Arc::default())),
            positions: Mutex::new(ListingView::new(Arc::default())),
            projects: Mutex::new(ListingView::new(Arc::default())),
            businesses: Mutex::new(ListingView::new(Arc::default())),
        }
    }
}

impl ListingCatalog {
    /// Fetch every kind from `source` once, as a page load would.
    pub fn load<S: ListingSource + ?Sized>(source: &S) -> Result<Self, CatalogError> {
        let catalog = Self::default();
        for kind in ListingKind::ordered() {
            let set = source.fetch(kind)?;
            catalog.replace(set)?;
        }
        Ok(catalog)
    }

    /// Replace a kind's source set wholesale. Returns the new record count.
    pub fn replace(&self, set: ListingSet) -> Result<usize, CatalogError> {
        let kind = set.kind();
        let total = set.len();
        match set {
            ListingSet::Personnel(items) => {
                lock(&self.personnel, kind)?.replace_source(Arc::new(items))
            }
            ListingSet::Positions(items) => {
                lock(&self.positions, kind)?.replace_source(Arc::new(items))
            }
            ListingSet::Projects(items) => {
                lock(&self.projects, kind)?.replace_source(Arc::new(items))
            }
            ListingSet::Businesses(items) => {
                lock(&self.businesses, kind)?.replace_source(Arc::new(items))
            }
        }
        info!(%kind, total, "listing source set replaced");
        Ok(total)
    }

    pub fn search(
        &self,
        kind: ListingKind,
        filters: &FilterState,
    ) -> Result<SearchResults, CatalogError> {
        Ok(match kind {
            ListingKind::Personnel => {
                let (total, items, options) = run(&self.personnel, kind, filters)?;
                results(kind, total, ListingSet::Personnel(items), options)
            }
            ListingKind::Position => {
                let (total, items, options) = run(&self.positions, kind, filters)?;
                results(kind, total, ListingSet::Positions(items), options)
            }
            ListingKind::Project => {
                let (total, items, options) = run(&self.projects, kind, filters)?;
                results(kind, total, ListingSet::Projects(items), options)
            }
            ListingKind::Business => {
                let (total, items, options) = run(&self.businesses, kind, filters)?;
                results(kind, total, ListingSet::Businesses(items), options)
            }
        })
    }

    pub fn options(&self, kind: ListingKind) -> Result<FilterOptions, CatalogError> {
        Ok(match kind {
            ListingKind::Personnel => lock(&self.personnel, kind)?.options().clone(),
            ListingKind::Position => lock(&self.positions, kind)?.options().clone(),
            ListingKind::Project => lock(&self.projects, kind)?.options().clone(),
            ListingKind::Business => lock(&self.businesses, kind)?.options().clone(),
        })
    }

    /// Size of the kind's current source set.
    pub fn total(&self, kind: ListingKind) -> Result<usize, CatalogError> {
        Ok(match kind {
            ListingKind::Personnel => lock(&self.personnel, kind)?.source().len(),
            ListingKind::Position => lock(&self.positions, kind)?.source().len(),
            ListingKind::Project => lock(&self.projects, kind)?.source().len(),
            ListingKind::Business => lock(&self.businesses, kind)?.source().len(),
        })
    }

    pub fn stats(&self, kind: ListingKind) -> Result<ViewStats, CatalogError> {
        Ok(match kind {
            ListingKind::Personnel => lock(&self.personnel, kind)?.stats(),
            ListingKind::Position => lock(&self.positions, kind)?.stats(),
            ListingKind::Project => lock(&self.projects, kind)?.stats(),
            ListingKind::Business => lock(&self.businesses, kind)?.stats(),
        })
    }
}

fn lock<T>(
    slot: &Mutex<ListingView<T>>,
    kind: ListingKind,
) -> Result<std::sync::MutexGuard<'_, ListingView<T>>, CatalogError> {
    slot.lock().map_err(|_| CatalogError::Poisoned(kind))
}

fn run<T: Listing + Clone>(
    slot: &Mutex<ListingView<T>>,
    kind: ListingKind,
    filters: &FilterState,
) -> Result<(usize, Vec<T>, FilterOptions), CatalogError> {
    let mut view = lock(slot, kind)?;
    let total = view.source().len();
    let items: Vec<T> = view.apply(filters).into_iter().cloned().collect();
    Ok((total, items, view.options().clone()))
}

fn results(
    kind: ListingKind,
    total: usize,
    items: ListingSet,
    options: FilterOptions,
) -> SearchResults {
    SearchResults {
        kind,
        total,
        matched: items.len(),
        items,
        options,
    }
}

//! Marketplace listing search: personnel, positions, projects, and businesses.
//!
//! Records are fetched once from a [`ListingSource`], held as immutable source sets, and
//! every filter change re-derives an ordered view through the [`engine`] pipeline.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod filters;
pub mod router;
pub mod schema;
pub mod source;
pub mod view;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, ListingCatalog, SearchResults};
pub use domain::{
    BusinessListing, Listing, ListingKind, ListingSet, PersonnelListing, PositionListing,
    ProjectListing,
};
pub use engine::{derive_indices, derive_view, extract_options, FilterOptions};
pub use filters::{FilterState, SortMode};
pub use router::{listing_router, FilterRequest};
pub use schema::{FieldRole, ListingSchema};
pub use source::{FileListingSource, ListingSource, SourceError, SourceFormat};
pub use view::{ListingView, ViewStats};
pub use views::ListingRow;

//! The listing filter, search, and sort pipeline.
//!
//! Everything here is pure and synchronous: given a source set and a [`FilterState`] the
//! pipeline yields a fresh ordered view and never touches the source records.

pub mod options;
pub mod predicate;
pub mod search;
pub mod sort;

pub use options::{extract_options, FilterOptions};
pub use predicate::matches;
pub use search::matches_search;
pub use sort::{compare, locale_cmp};

use tracing::trace;

use super::domain::Listing;
use super::filters::FilterState;
use super::schema::ListingSchema;

/// Positions in `source` of the records that survive `filters`, in display order.
///
/// Search runs first, then the exact/any-of criteria, then the date threshold, and the
/// stable sort last.
pub fn derive_indices<T: Listing>(
    schema: &ListingSchema<T>,
    source: &[T],
    filters: &FilterState,
) -> Vec<usize> {
    let mut indices: Vec<usize> = source
        .iter()
        .enumerate()
        .filter(|(_, record)| search::matches_search(schema, *record, &filters.search_text))
        .filter(|(_, record)| predicate::matches_criteria(schema, *record, filters))
        .filter(|(_, record)| {
            predicate::matches_threshold(schema, *record, filters.available_from)
        })
        .map(|(index, _)| index)
        .collect();

    sort::sort_indices(schema, source, &mut indices, &filters.sort_by);

    trace!(
        kind = %schema.kind(),
        total = source.len(),
        matched = indices.len(),
        sort = %filters.sort_by,
        "derived listing view"
    );
    indices
}

/// The filtered, ordered view over `source` as a new list of references.
pub fn derive_view<'a, T: Listing>(
    schema: &ListingSchema<T>,
    source: &'a [T],
    filters: &FilterState,
) -> Vec<&'a T> {
    derive_indices(schema, source, filters)
        .into_iter()
        .map(|index| &source[index])
        .collect()
}

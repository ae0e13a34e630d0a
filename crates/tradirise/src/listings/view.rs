use std::sync::Arc;

use tracing::debug;

use super::domain::Listing;
use super::engine::{derive_indices, extract_options, FilterOptions};
use super::filters::FilterState;
use super::schema::ListingSchema;

/// Memoized view over one immutable source set.
///
/// Filter options are recomputed only when the source set identity changes, and the
/// derived list only when the filter state or source set changes.
pub struct ListingView<T> {
    schema: ListingSchema<T>,
    source: Arc<Vec<T>>,
    options: FilterOptions,
    cache: Option<CachedView>,
    stats: ViewStats,
}

struct CachedView {
    filters: FilterState,
    indices: Vec<usize>,
}

/// How often the view actually recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewStats {
    pub option_extractions: u64,
    pub view_derivations: u64,
}

impl<T: Listing> ListingView<T> {
    pub fn new(source: Arc<Vec<T>>) -> Self {
        Self::with_schema(T::schema(), source)
    }

    pub fn with_schema(schema: ListingSchema<T>, source: Arc<Vec<T>>) -> Self {
        let options = extract_options(&schema, &source);
        Self {
            schema,
            source,
            options,
            cache: None,
            stats: ViewStats {
                option_extractions: 1,
                view_derivations: 0,
            },
        }
    }

    pub fn schema(&self) -> &ListingSchema<T> {
        &self.schema
    }

    pub fn source(&self) -> &Arc<Vec<T>> {
        &self.source
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn stats(&self) -> ViewStats {
        self.stats
    }

    /// Swap in a freshly fetched source set. A clone of the current `Arc` is a no-op.
    pub fn replace_source(&mut self, source: Arc<Vec<T>>) {
        if Arc::ptr_eq(&self.source, &source) {
            return;
        }

        self.options = extract_options(&self.schema, &source);
        self.stats.option_extractions += 1;
        self.source = source;
        self.cache = None;
        debug!(
            kind = %self.schema.kind(),
            total = self.source.len(),
            "listing source replaced"
        );
    }

    /// The ordered records matching `filters`, reusing the last result when unchanged.
    pub fn apply(&mut self, filters: &FilterState) -> Vec<&T> {
        let cached = match self.cache.take() {
            Some(cached) if cached.filters == *filters => cached,
            _ => {
                self.stats.view_derivations += 1;
                CachedView {
                    filters: filters.clone(),
                    indices: derive_indices(&self.schema, &self.source, filters),
                }
            }
        };

        let cached = self.cache.insert(cached);
        cached
            .indices
            .iter()
            .filter_map(|&index| self.source.get(index))
            .collect()
    }

    /// Number of records the last `apply` produced, if any.
    pub fn matched(&self) -> Option<usize> {
        self.cache.as_ref().map(|cached| cached.indices.len())
    }
}

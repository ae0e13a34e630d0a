use chrono::NaiveDate;
use tracing::debug;

use crate::listings::filters::FilterState;
use crate::listings::schema::ListingSchema;

/// Inclusion test for the categorical, multi-valued, and date criteria.
pub fn matches<T>(schema: &ListingSchema<T>, record: &T, filters: &FilterState) -> bool {
    matches_criteria(schema, record, filters)
        && matches_threshold(schema, record, filters.available_from)
}

/// Exact-match and any-match criteria, AND-ed together.
pub fn matches_criteria<T>(schema: &ListingSchema<T>, record: &T, filters: &FilterState) -> bool {
    let exact_ok = filters.active_exact().all(|(key, wanted)| {
        match schema.exact_fields().iter().find(|field| field.key == key) {
            Some(field) => (field.get)(record) == Some(wanted),
            None => {
                debug!(kind = %schema.kind(), key, "ignoring exact criterion unknown to schema");
                true
            }
        }
    });
    if !exact_ok {
        return false;
    }

    filters.active_any_of().all(|(key, wanted)| {
        match schema.any_of_fields().iter().find(|field| field.key == key) {
            Some(field) => (field.get)(record)
                .iter()
                .any(|value| wanted.contains(value)),
            None => {
                debug!(kind = %schema.kind(), key, "ignoring any-of criterion unknown to schema");
                true
            }
        }
    })
}

/// Keeps records available on or before `threshold`; records without a date are dropped.
pub fn matches_threshold<T>(
    schema: &ListingSchema<T>,
    record: &T,
    threshold: Option<NaiveDate>,
) -> bool {
    let Some(threshold) = threshold else {
        return true;
    };
    if schema.date_field().is_none() {
        return true;
    }

    match schema.date_of(record) {
        Some(date) => date <= threshold,
        None => false,
    }
}

use crate::listings::schema::{ListingSchema, SearchField};

/// Case-insensitive substring match across the schema's search fields.
pub fn matches_search<T>(schema: &ListingSchema<T>, record: &T, search_text: &str) -> bool {
    if search_text.trim().is_empty() {
        return true;
    }

    let needle = search_text.to_lowercase();
    schema.search_fields().iter().any(|field| match field {
        SearchField::Text(get) => contains(get(record).unwrap_or_default(), &needle),
        SearchField::List(get) => get(record).iter().any(|value| contains(value, &needle)),
        SearchField::Computed(get) => contains(&get(record), &needle),
    })
}

fn contains(haystack: &str, needle: &str) -> bool {
    !haystack.is_empty() && haystack.to_lowercase().contains(needle)
}

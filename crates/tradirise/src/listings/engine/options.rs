use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::listings::schema::ListingSchema;

/// Selectable values per filter key, each sorted ascending and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterOptions {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl FilterOptions {
    pub fn get(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.fields.iter().map(|(key, values)| (*key, values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Vec::is_empty)
    }
}

/// Distinct non-empty values observed in `source` for every filterable field.
pub fn extract_options<T>(schema: &ListingSchema<T>, source: &[T]) -> FilterOptions {
    let mut fields = BTreeMap::new();

    for field in schema.exact_fields() {
        let values: BTreeSet<&str> = source
            .iter()
            .filter_map(|record| (field.get)(record))
            .filter(|value| !value.is_empty())
            .collect();
        fields.insert(field.key, values.into_iter().map(str::to_string).collect());
    }

    for field in schema.any_of_fields() {
        let values: BTreeSet<&str> = source
            .iter()
            .flat_map(|record| (field.get)(record).iter())
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .collect();
        fields.insert(field.key, values.into_iter().map(str::to_string).collect());
    }

    FilterOptions { fields }
}

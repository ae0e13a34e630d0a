use chrono::NaiveDate;
use serde::Serialize;

use super::domain::Listing;
use super::schema::ListingSchema;

/// Flattened, kind-agnostic summary of one record for terminal and report output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<(&'static str, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_on: Option<NaiveDate>,
}

impl ListingRow {
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(detail_key, _)| *detail_key == key)
            .map(|(_, value)| value.as_str())
    }
}

pub fn listing_row<T: Listing>(schema: &ListingSchema<T>, record: &T) -> ListingRow {
    let mut details = Vec::new();
    for field in schema.exact_fields() {
        if let Some(value) = (field.get)(record).filter(|value| !value.is_empty()) {
            details.push((field.key, value.to_string()));
        }
    }
    for field in schema.any_of_fields() {
        let values = (field.get)(record);
        if !values.is_empty() {
            details.push((field.key, values.join(", ")));
        }
    }
    let date = schema
        .date_field()
        .and_then(|field| (field.get)(record).map(|date| (field.key, date)));
    if let Some((key, date)) = date {
        details.push((key, date.to_string()));
    }

    ListingRow {
        id: record.id().to_string(),
        name: schema.display_name(record),
        created_at: record.created_at().to_string(),
        details,
        available_on: date.map(|(_, date)| date),
    }
}

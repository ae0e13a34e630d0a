use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::schema::ListingSchema;

/// The marketplace listing families served by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ListingKind {
    #[serde(rename = "personnel")]
    Personnel,
    #[serde(rename = "positions", alias = "position")]
    Position,
    #[serde(rename = "projects", alias = "project")]
    Project,
    #[serde(rename = "businesses", alias = "business")]
    Business,
}

impl ListingKind {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Personnel,
            Self::Position,
            Self::Project,
            Self::Business,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Personnel => "Personnel",
            Self::Position => "Positions",
            Self::Project => "Projects",
            Self::Business => "Businesses",
        }
    }

    /// Path segment and data file stem for the kind.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Personnel => "personnel",
            Self::Position => "positions",
            Self::Project => "projects",
            Self::Business => "businesses",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "personnel" | "person" | "people" => Some(Self::Personnel),
            "positions" | "position" | "jobs" => Some(Self::Position),
            "projects" | "project" => Some(Self::Project),
            "businesses" | "business" => Some(Self::Business),
            _ => None,
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A record the filter engine can operate on.
pub trait Listing: Sized {
    const KIND: ListingKind;

    fn id(&self) -> &str;
    fn created_at(&self) -> &str;
    fn updated_at(&self) -> &str;

    /// Field layout used for filtering, searching, and option extraction.
    fn schema() -> ListingSchema<Self>;
}

/// A tradesperson profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelListing {
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub primary_trade_role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub accreditations: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub available_from: Option<NaiveDate>,
}

impl PersonnelListing {
    /// First and last name joined by a single space, trimmed.
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        format!("{first} {last}").trim().to_string()
    }
}

/// A job position advertised by an employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionListing {
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub trade: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub employment_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub required_accreditations: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub start_date: Option<NaiveDate>,
}

/// A client project looking for trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectListing {
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub trade_category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub required_skills: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub start_date: Option<NaiveDate>,
}

/// A trade business directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessListing {
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub primary_trade: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub services: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub accreditations: Vec<String>,
}

macro_rules! impl_listing_identity {
    ($ty:ty, $kind:expr, $schema:path) => {
        impl Listing for $ty {
            const KIND: ListingKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn created_at(&self) -> &str {
                &self.created_at
            }

            fn updated_at(&self) -> &str {
                &self.updated_at
            }

            fn schema() -> ListingSchema<Self> {
                $schema()
            }
        }
    };
}

impl_listing_identity!(
    PersonnelListing,
    ListingKind::Personnel,
    super::schema::personnel_schema
);
impl_listing_identity!(
    PositionListing,
    ListingKind::Position,
    super::schema::position_schema
);
impl_listing_identity!(
    ProjectListing,
    ListingKind::Project,
    super::schema::project_schema
);
impl_listing_identity!(
    BusinessListing,
    ListingKind::Business,
    super::schema::business_schema
);

/// A complete source set of one listing kind, as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListingSet {
    Personnel(Vec<PersonnelListing>),
    Positions(Vec<PositionListing>),
    Projects(Vec<ProjectListing>),
    Businesses(Vec<BusinessListing>),
}

impl ListingSet {
    pub fn empty(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Personnel => Self::Personnel(Vec::new()),
            ListingKind::Position => Self::Positions(Vec::new()),
            ListingKind::Project => Self::Projects(Vec::new()),
            ListingKind::Business => Self::Businesses(Vec::new()),
        }
    }

    pub fn kind(&self) -> ListingKind {
        match self {
            Self::Personnel(_) => ListingKind::Personnel,
            Self::Positions(_) => ListingKind::Position,
            Self::Projects(_) => ListingKind::Project,
            Self::Businesses(_) => ListingKind::Business,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Personnel(items) => items.len(),
            Self::Positions(items) => items.len(),
            Self::Projects(items) => items.len(),
            Self::Businesses(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode a JSON array of records of the given kind.
    pub fn from_json_value(
        kind: ListingKind,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ListingKind::Personnel => Self::Personnel(serde_json::from_value(value)?),
            ListingKind::Position => Self::Positions(serde_json::from_value(value)?),
            ListingKind::Project => Self::Projects(serde_json::from_value(value)?),
            ListingKind::Business => Self::Businesses(serde_json::from_value(value)?),
        })
    }
}

/// Parse a backend timestamp; accepts RFC 3339 or a bare `YYYY-MM-DD`.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse a calendar day, dropping any time-of-day component.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(trimmed).map(|dt| dt.date()))
}

/// Text fields holding anything but a string decode as absent rather than failing the record.
pub(crate) fn deserialize_lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientTextVisitor)
}

pub(crate) fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_text(deserializer)?.unwrap_or_default())
}

/// Dates that are missing, malformed, or not strings decode as absent.
pub(crate) fn deserialize_lenient_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserialize_lenient_text(deserializer)?;
    Ok(raw.as_deref().and_then(parse_day))
}

/// Accepts an array, `null`, or a `;`-separated string (CSV cells).
pub(crate) fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(StringListVisitor)
}

struct LenientTextVisitor;

impl<'de> Visitor<'de> for LenientTextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an optional string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _value: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _value: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _value: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

/// One list element; non-string elements are dropped.
struct LenientItem(Option<String>);

impl<'de> Deserialize<'de> for LenientItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_lenient_text(deserializer).map(LenientItem)
    }
}

struct StringListVisitor;

impl StringListVisitor {
    fn split(value: &str) -> Vec<String> {
        value
            .split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl<'de> Visitor<'de> for StringListVisitor {
    type Value = Vec<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of strings or a ';'-separated string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Self::split(value))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_i64<E: de::Error>(self, _value: i64) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_u64<E: de::Error>(self, _value: u64) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_f64<E: de::Error>(self, _value: f64) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(LenientItem(item)) = seq.next_element()? {
            if let Some(item) = item {
                items.push(item);
            }
        }
        Ok(items)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamps_accept_dates_and_rfc3339() {
        let day = parse_timestamp("2024-01-01").expect("date parses");
        let stamp = parse_timestamp("2024-01-01T09:30:00+13:00").expect("rfc3339 parses");
        assert!(stamp < day + chrono::Duration::days(1));
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("last tuesday"), None);
    }

    #[test]
    fn day_drops_time_component() {
        assert_eq!(
            parse_day("2024-02-01T08:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
    }

    #[test]
    fn personnel_tolerates_missing_and_null_fields() {
        let record: PersonnelListing = serde_json::from_value(json!({
            "id": "p-1",
            "first_name": "Aroha",
            "skills": null,
            "accreditations": ["LBP", null, "Site Safe"],
            "available_from": "not a date",
        }))
        .expect("record decodes");

        assert_eq!(record.full_name(), "Aroha");
        assert!(record.skills.is_empty());
        assert_eq!(record.accreditations, vec!["LBP", "Site Safe"]);
        assert_eq!(record.available_from, None);
        assert_eq!(record.created_at, "");
    }

    #[test]
    fn non_string_values_decode_as_absent() {
        let record: PersonnelListing = serde_json::from_value(json!({
            "id": "p-9",
            "created_at": 1704067200,
            "first_name": 42,
            "region": { "name": "Auckland" },
            "skills": ["Solar", 7, true, "Heat pumps"],
            "accreditations": 12,
            "available_from": 20240110,
        }))
        .expect("record decodes");

        assert_eq!(record.created_at, "");
        assert_eq!(record.first_name, None);
        assert_eq!(record.region, None);
        assert_eq!(record.skills, vec!["Solar", "Heat pumps"]);
        assert!(record.accreditations.is_empty());
        assert_eq!(record.available_from, None);
    }

    #[test]
    fn kind_slugs_round_trip() {
        for kind in ListingKind::ordered() {
            assert_eq!(ListingKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(ListingKind::from_slug("Business"), Some(ListingKind::Business));
        assert_eq!(ListingKind::from_slug("subscriptions"), None);
    }
}

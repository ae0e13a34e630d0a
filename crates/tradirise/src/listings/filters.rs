use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordering applied as the last step of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortMode {
    /// Most recently created first.
    #[default]
    Newest,
    Oldest,
    /// Earliest availability (or start) date first.
    AvailableSoon,
    /// Locale-aware ascending order on the display name.
    NameAz,
    /// Any other key; leaves the filtered order untouched.
    Unrecognized(String),
}

impl SortMode {
    pub fn from_key(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "newest" => Self::Newest,
            "oldest" => Self::Oldest,
            "available_soon" => Self::AvailableSoon,
            "name_az" | "name_a_z" => Self::NameAz,
            _ => Self::Unrecognized(value.to_string()),
        }
    }

    pub fn as_key(&self) -> &str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::AvailableSoon => "available_soon",
            Self::NameAz => "name_az",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for SortMode {
    fn from(value: String) -> Self {
        Self::from_key(&value)
    }
}

impl From<&str> for SortMode {
    fn from(value: &str) -> Self {
        Self::from_key(value)
    }
}

impl From<SortMode> for String {
    fn from(value: SortMode) -> Self {
        value.as_key().to_string()
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// User-chosen inclusion and ordering criteria. Never mutates the source set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Exact-match criteria keyed by schema field key.
    #[serde(default)]
    pub exact: BTreeMap<String, String>,
    /// Any-match criteria keyed by schema field key.
    #[serde(default)]
    pub any_of: BTreeMap<String, BTreeSet<String>>,
    /// Keep records available on or before this day.
    #[serde(default)]
    pub available_from: Option<NaiveDate>,
    #[serde(default)]
    pub sort_by: SortMode,
    #[serde(default)]
    pub search_text: String,
}

impl FilterState {
    pub fn with_exact(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.exact.insert(key.into(), value.into());
        self
    }

    pub fn with_any_of<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.any_of
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn available_by(mut self, date: NaiveDate) -> Self {
        self.available_from = Some(date);
        self
    }

    pub fn sorted_by(mut self, mode: impl Into<SortMode>) -> Self {
        self.sort_by = mode.into();
        self
    }

    pub fn searching(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Exact criteria with a non-empty value.
    pub fn active_exact(&self) -> impl Iterator<Item = (&str, &str)> {
        self.exact
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Any-of criteria with at least one selected value.
    pub fn active_any_of(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.any_of
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, values)| (key.as_str(), values))
    }

    /// True when no criterion narrows the source set.
    pub fn is_unfiltered(&self) -> bool {
        self.search_text.trim().is_empty()
            && self.available_from.is_none()
            && self.active_exact().next().is_none()
            && self.active_any_of().next().is_none()
    }
}

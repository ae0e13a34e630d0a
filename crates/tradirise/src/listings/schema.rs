//! Describable listing schemas.
//!
//! Each listing kind declares which of its fields are exact-match filters, any-match
//! multi-valued filters, free-text search targets, and the date threshold, so a single
//! engine serves personnel, positions, projects, and businesses.

use chrono::NaiveDate;

use super::domain::{
    BusinessListing, ListingKind, PersonnelListing, PositionListing, ProjectListing,
};

pub type TextAccessor<T> = for<'a> fn(&'a T) -> Option<&'a str>;
pub type ListAccessor<T> = for<'a> fn(&'a T) -> &'a [String];
pub type DateAccessor<T> = fn(&T) -> Option<NaiveDate>;
pub type ComputedAccessor<T> = fn(&T) -> String;

/// Categorical field compared by exact, case-sensitive equality.
pub struct ExactField<T> {
    pub key: &'static str,
    pub get: TextAccessor<T>,
}

/// Multi-valued field that matches when any selected value is present.
pub struct AnyOfField<T> {
    pub key: &'static str,
    pub get: ListAccessor<T>,
}

/// Date field filtered by an inclusive "available by" threshold.
pub struct DateField<T> {
    pub key: &'static str,
    pub get: DateAccessor<T>,
}

/// A value inspected by free-text search.
pub enum SearchField<T> {
    Text(TextAccessor<T>),
    List(ListAccessor<T>),
    Computed(ComputedAccessor<T>),
}

/// How a filter key is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Exact,
    AnyOf,
}

pub struct ListingSchema<T> {
    kind: ListingKind,
    exact: Vec<ExactField<T>>,
    any_of: Vec<AnyOfField<T>>,
    search: Vec<SearchField<T>>,
    date: Option<DateField<T>>,
    display_name: ComputedAccessor<T>,
}

impl<T> ListingSchema<T> {
    pub fn builder(
        kind: ListingKind,
        display_name: ComputedAccessor<T>,
    ) -> ListingSchemaBuilder<T> {
        ListingSchemaBuilder {
            schema: ListingSchema {
                kind,
                exact: Vec::new(),
                any_of: Vec::new(),
                search: Vec::new(),
                date: None,
                display_name,
            },
        }
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn exact_fields(&self) -> &[ExactField<T>] {
        &self.exact
    }

    pub fn any_of_fields(&self) -> &[AnyOfField<T>] {
        &self.any_of
    }

    pub fn search_fields(&self) -> &[SearchField<T>] {
        &self.search
    }

    pub fn date_field(&self) -> Option<&DateField<T>> {
        self.date.as_ref()
    }

    pub fn display_name(&self, record: &T) -> String {
        (self.display_name)(record)
    }

    pub fn date_of(&self, record: &T) -> Option<NaiveDate> {
        self.date.as_ref().and_then(|field| (field.get)(record))
    }

    pub fn field_role(&self, key: &str) -> Option<FieldRole> {
        if self.exact.iter().any(|field| field.key == key) {
            Some(FieldRole::Exact)
        } else if self.any_of.iter().any(|field| field.key == key) {
            Some(FieldRole::AnyOf)
        } else {
            None
        }
    }
}

pub struct ListingSchemaBuilder<T> {
    schema: ListingSchema<T>,
}

impl<T> ListingSchemaBuilder<T> {
    pub fn exact(mut self, key: &'static str, get: TextAccessor<T>) -> Self {
        self.schema.exact.push(ExactField { key, get });
        self
    }

    pub fn any_of(mut self, key: &'static str, get: ListAccessor<T>) -> Self {
        self.schema.any_of.push(AnyOfField { key, get });
        self
    }

    pub fn search_text(mut self, get: TextAccessor<T>) -> Self {
        self.schema.search.push(SearchField::Text(get));
        self
    }

    pub fn search_list(mut self, get: ListAccessor<T>) -> Self {
        self.schema.search.push(SearchField::List(get));
        self
    }

    pub fn search_computed(mut self, get: ComputedAccessor<T>) -> Self {
        self.schema.search.push(SearchField::Computed(get));
        self
    }

    pub fn threshold_date(mut self, key: &'static str, get: DateAccessor<T>) -> Self {
        self.schema.date = Some(DateField { key, get });
        self
    }

    pub fn build(self) -> ListingSchema<T> {
        self.schema
    }
}

/// Trimmed primary value, or the fallback when the primary is blank.
fn name_or(primary: Option<&str>, fallback: Option<&str>) -> String {
    let primary = primary.unwrap_or_default().trim();
    if primary.is_empty() {
        fallback.unwrap_or_default().to_string()
    } else {
        primary.to_string()
    }
}

pub(crate) fn personnel_schema() -> ListingSchema<PersonnelListing> {
    ListingSchema::<PersonnelListing>::builder(ListingKind::Personnel, |p| {
        let name = p.full_name();
        if name.is_empty() {
            p.primary_trade_role.clone().unwrap_or_default()
        } else {
            name
        }
    })
    .exact("trade", |p| p.primary_trade_role.as_deref())
    .exact("region", |p| p.region.as_deref())
    .any_of("accreditations", |p| p.accreditations.as_slice())
    .search_computed(PersonnelListing::full_name)
    .search_text(|p| p.primary_trade_role.as_deref())
    .search_text(|p| p.bio.as_deref())
    .search_list(|p| p.skills.as_slice())
    .search_text(|p| p.region.as_deref())
    .threshold_date("available_from", |p| p.available_from)
    .build()
}

pub(crate) fn position_schema() -> ListingSchema<PositionListing> {
    ListingSchema::<PositionListing>::builder(ListingKind::Position, |p| {
        name_or(p.title.as_deref(), p.trade.as_deref())
    })
    .exact("trade", |p| p.trade.as_deref())
    .exact("region", |p| p.region.as_deref())
    .exact("employment_type", |p| p.employment_type.as_deref())
    .any_of("accreditations", |p| p.required_accreditations.as_slice())
    .search_text(|p| p.title.as_deref())
    .search_text(|p| p.business_name.as_deref())
    .search_text(|p| p.trade.as_deref())
    .search_text(|p| p.description.as_deref())
    .search_text(|p| p.region.as_deref())
    .threshold_date("start_date", |p| p.start_date)
    .build()
}

pub(crate) fn project_schema() -> ListingSchema<ProjectListing> {
    ListingSchema::<ProjectListing>::builder(ListingKind::Project, |p| {
        name_or(p.title.as_deref(), p.trade_category.as_deref())
    })
    .exact("trade", |p| p.trade_category.as_deref())
    .exact("region", |p| p.region.as_deref())
    .any_of("skills", |p| p.required_skills.as_slice())
    .search_text(|p| p.title.as_deref())
    .search_text(|p| p.client_name.as_deref())
    .search_text(|p| p.trade_category.as_deref())
    .search_text(|p| p.description.as_deref())
    .search_list(|p| p.required_skills.as_slice())
    .search_text(|p| p.region.as_deref())
    .threshold_date("start_date", |p| p.start_date)
    .build()
}

pub(crate) fn business_schema() -> ListingSchema<BusinessListing> {
    ListingSchema::<BusinessListing>::builder(ListingKind::Business, |b| {
        name_or(b.business_name.as_deref(), b.primary_trade.as_deref())
    })
    .exact("trade", |b| b.primary_trade.as_deref())
    .exact("region", |b| b.region.as_deref())
    .any_of("services", |b| b.services.as_slice())
    .any_of("accreditations", |b| b.accreditations.as_slice())
    .search_text(|b| b.business_name.as_deref())
    .search_text(|b| b.primary_trade.as_deref())
    .search_text(|b| b.description.as_deref())
    .search_list(|b| b.services.as_slice())
    .search_text(|b| b.region.as_deref())
    .build()
}

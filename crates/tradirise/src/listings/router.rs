use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::catalog::{CatalogError, ListingCatalog};
use super::domain::{
    deserialize_lenient_date, BusinessListing, Listing, ListingKind, ListingSet,
    PersonnelListing, PositionListing, ProjectListing,
};
use super::filters::{FilterState, SortMode};
use super::schema::FieldRole;

/// Flat filter payload as sent by the listing pages.
///
/// Any key besides the sort, search, and date fields is a criterion: a string selects an
/// exact value, an array selects any-of values.
#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default, alias = "sortBy")]
    pub sort_by: Option<SortMode>,
    #[serde(default, alias = "searchText")]
    pub search_text: Option<String>,
    #[serde(
        default,
        alias = "availableFrom",
        deserialize_with = "deserialize_lenient_date"
    )]
    pub available_from: Option<NaiveDate>,
    #[serde(flatten)]
    pub criteria: BTreeMap<String, CriterionValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    One(String),
    Many(Vec<String>),
    Other(serde_json::Value),
}

impl FilterRequest {
    /// Resolve criteria against the kind's schema. A single string sent for an any-of key
    /// selects that one value.
    pub fn into_state(self, kind: ListingKind) -> FilterState {
        let mut state = FilterState {
            sort_by: self.sort_by.unwrap_or_default(),
            search_text: self.search_text.unwrap_or_default(),
            available_from: self.available_from,
            ..FilterState::default()
        };

        for (key, value) in self.criteria {
            let role = field_role(kind, &key);
            match (value, role) {
                (CriterionValue::One(value), Some(FieldRole::AnyOf)) => {
                    state = state.with_any_of(key, [value]);
                }
                (CriterionValue::One(value), _) => state = state.with_exact(key, value),
                (CriterionValue::Many(values), Some(FieldRole::Exact)) => {
                    warn!(
                        %kind,
                        key = %key,
                        "exact criterion sent as a list; using first value"
                    );
                    if let Some(first) = values.into_iter().next() {
                        state = state.with_exact(key, first);
                    }
                }
                (CriterionValue::Many(values), _) => state = state.with_any_of(key, values),
                (CriterionValue::Other(_), _) => {}
            }
        }

        state
    }
}

fn field_role(kind: ListingKind, key: &str) -> Option<FieldRole> {
    match kind {
        ListingKind::Personnel => PersonnelListing::schema().field_role(key),
        ListingKind::Position => PositionListing::schema().field_role(key),
        ListingKind::Project => ProjectListing::schema().field_role(key),
        ListingKind::Business => BusinessListing::schema().field_role(key),
    }
}

/// Router builder exposing listing search, options, and source replacement.
pub fn listing_router(catalog: Arc<ListingCatalog>) -> Router {
    Router::new()
        .route("/api/v1/listings/:kind", put(replace_handler))
        .route("/api/v1/listings/:kind/search", post(search_handler))
        .route("/api/v1/listings/:kind/options", get(options_handler))
        .with_state(catalog)
}

pub(crate) async fn search_handler(
    State(catalog): State<Arc<ListingCatalog>>,
    Path(kind): Path<String>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    let filters = request.into_state(kind);
    match catalog.search(kind, &filters) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn options_handler(
    State(catalog): State<Arc<ListingCatalog>>,
    Path(kind): Path<String>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    match catalog.options(kind) {
        Ok(options) => {
            let payload = json!({ "kind": kind, "options": options });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn replace_handler(
    State(catalog): State<Arc<ListingCatalog>>,
    Path(kind): Path<String>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let Json(body) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    let set = match ListingSet::from_json_value(kind, body) {
        Ok(set) => set,
        Err(err) => {
            let payload = json!({ "error": format!("invalid {kind} listings: {err}") });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match catalog.replace(set) {
        Ok(total) => {
            let payload = json!({ "kind": kind, "total": total });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => catalog_error_response(err),
    }
}

fn parse_kind(raw: &str) -> Result<ListingKind, Response> {
    ListingKind::from_slug(raw).ok_or_else(|| {
        let payload = json!({ "error": format!("unknown listing kind '{raw}'") });
        (StatusCode::NOT_FOUND, Json(payload)).into_response()
    })
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (rejection.status(), Json(payload)).into_response()
}

fn catalog_error_response(err: CatalogError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

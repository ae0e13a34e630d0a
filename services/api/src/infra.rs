use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tradirise::listings::{ListingKind, ListingSet, ListingSource, SourceError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fixed source sets served when no data directory is configured.
#[derive(Debug, Clone)]
pub(crate) struct InMemoryListingSource {
    sets: BTreeMap<ListingKind, ListingSet>,
}

impl InMemoryListingSource {
    pub(crate) fn demo() -> Result<Self, SourceError> {
        let mut sets = BTreeMap::new();
        for kind in ListingKind::ordered() {
            sets.insert(kind, ListingSet::from_json_value(kind, demo_records(kind))?);
        }
        Ok(Self { sets })
    }
}

impl ListingSource for InMemoryListingSource {
    fn fetch(&self, kind: ListingKind) -> Result<ListingSet, SourceError> {
        Ok(self
            .sets
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| ListingSet::empty(kind)))
    }
}

fn demo_records(kind: ListingKind) -> Value {
    match kind {
        ListingKind::Personnel => json!([
            {
                "id": "per-101",
                "created_at": "2024-05-02T20:14:00Z",
                "first_name": "Hemi",
                "last_name": "Walker",
                "primary_trade_role": "Electrician",
                "region": "Auckland",
                "bio": "Registered electrician, residential rewires and heat pump installs.",
                "skills": ["Heat pumps", "Solar", "Switchboards"],
                "accreditations": ["EWRB", "Site Safe"],
                "available_from": "2024-06-03"
            },
            {
                "id": "per-102",
                "created_at": "2024-05-09T03:40:00Z",
                "first_name": "Sione",
                "last_name": "Taufa",
                "primary_trade_role": "Plumber",
                "region": "Wellington",
                "bio": "Commercial fit-outs and gas appliance servicing.",
                "skills": ["Gas fitting", "Drainage"],
                "accreditations": ["PGDB"],
                "available_from": "2024-07-01"
            },
            {
                "id": "per-103",
                "created_at": "2024-04-18T22:05:00Z",
                "first_name": "Aroha",
                "last_name": "Ngata",
                "primary_trade_role": "Builder",
                "region": "Canterbury",
                "bio": "LBP carpenter, decks and extensions around Ōtautahi.",
                "skills": ["Framing", "Decks"],
                "accreditations": ["LBP", "Site Safe"],
                "available_from": "2024-05-20"
            },
            {
                "id": "per-104",
                "created_at": "2024-05-11T01:30:00Z",
                "first_name": "Liam",
                "last_name": "O'Connor",
                "primary_trade_role": "Electrician",
                "region": "Queensland",
                "bio": "A-grade sparky relocating from Brisbane.",
                "skills": ["Commercial wiring", "Solar"],
                "accreditations": ["QLD Electrical Licence"]
            }
        ]),
        ListingKind::Position => json!([
            {
                "id": "pos-201",
                "created_at": "2024-05-06T19:00:00Z",
                "title": "Apprentice Electrician",
                "business_name": "Kōwhai Electrical",
                "trade": "Electrician",
                "region": "Auckland",
                "employment_type": "Apprenticeship",
                "description": "Second or third year apprentice for residential work.",
                "required_accreditations": ["Site Safe"],
                "start_date": "2024-06-10"
            },
            {
                "id": "pos-202",
                "created_at": "2024-05-08T21:00:00Z",
                "title": "Site Foreman",
                "business_name": "Kauri Construction",
                "trade": "Builder",
                "region": "Canterbury",
                "employment_type": "Full-time",
                "description": "Run multi-unit residential sites in Christchurch.",
                "required_accreditations": ["LBP", "Site Safe"],
                "start_date": "2024-07-15"
            },
            {
                "id": "pos-203",
                "created_at": "2024-04-29T23:45:00Z",
                "title": "Maintenance Plumber",
                "business_name": "Harbour Plumbing",
                "trade": "Plumber",
                "region": "New South Wales",
                "employment_type": "Contract",
                "required_accreditations": ["NSW Plumbing Licence"]
            }
        ]),
        ListingKind::Project => json!([
            {
                "id": "prj-301",
                "created_at": "2024-05-01T02:00:00Z",
                "title": "Villa kitchen renovation",
                "client_name": "Mere Tipene",
                "trade_category": "Builder",
                "region": "Wellington",
                "description": "Strip out and rebuild a 1920s villa kitchen.",
                "required_skills": ["Framing", "Cabinetry"],
                "start_date": "2024-06-17"
            },
            {
                "id": "prj-302",
                "created_at": "2024-05-10T04:20:00Z",
                "title": "Rooftop solar array",
                "client_name": "Sunny Acres Orchard",
                "trade_category": "Electrician",
                "region": "Bay of Plenty",
                "description": "30 kW array with battery storage for a packhouse.",
                "required_skills": ["Solar", "Switchboards"],
                "start_date": "2024-06-03"
            },
            {
                "id": "prj-303",
                "created_at": "2024-04-22T06:10:00Z",
                "title": "Bathroom repipe",
                "trade_category": "Plumber",
                "region": "Victoria",
                "required_skills": ["Drainage"]
            }
        ]),
        ListingKind::Business => json!([
            {
                "id": "biz-401",
                "created_at": "2024-03-14T00:00:00Z",
                "business_name": "Kauri Construction",
                "primary_trade": "Builder",
                "region": "Canterbury",
                "description": "Residential builds and earthquake repairs.",
                "services": ["New builds", "Renovations", "Earthquake repairs"],
                "accreditations": ["Master Builders", "Site Safe"]
            },
            {
                "id": "biz-402",
                "created_at": "2024-02-02T00:00:00Z",
                "business_name": "Kōwhai Electrical",
                "primary_trade": "Electrician",
                "region": "Auckland",
                "services": ["Rewires", "Heat pumps", "Solar"],
                "accreditations": ["Master Electricians"]
            },
            {
                "id": "biz-403",
                "created_at": "2024-04-09T00:00:00Z",
                "business_name": "Harbour Plumbing",
                "primary_trade": "Plumber",
                "region": "New South Wales",
                "services": ["Maintenance", "Blocked drains"]
            }
        ]),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_kind(raw: &str) -> Result<ListingKind, String> {
    ListingKind::from_slug(raw).ok_or_else(|| {
        format!("unknown listing kind '{raw}' (expected personnel, positions, projects, or businesses)")
    })
}

/// Parses a `key=value` criterion flag.
pub(crate) fn parse_criterion(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::listings::domain::{BusinessListing, PersonnelListing, PositionListing};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(crate) fn personnel(id: &str, created_at: &str) -> PersonnelListing {
    PersonnelListing {
        id: id.to_string(),
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        first_name: None,
        last_name: None,
        primary_trade_role: None,
        region: None,
        bio: None,
        skills: Vec::new(),
        accreditations: Vec::new(),
        available_from: None,
    }
}

pub(crate) fn tradie(
    id: &str,
    created_at: &str,
    trade: &str,
    region: &str,
) -> PersonnelListing {
    PersonnelListing {
        primary_trade_role: Some(trade.to_string()),
        region: Some(region.to_string()),
        ..personnel(id, created_at)
    }
}

/// The two-record set used throughout the listing examples.
pub(crate) fn electrician_and_plumber() -> Vec<PersonnelListing> {
    vec![
        tradie("1", "2024-01-01", "Electrician", "Auckland"),
        tradie("2", "2024-02-01", "Plumber", "Wellington"),
    ]
}

/// A richer personnel roster covering names, skills, accreditations, and dates.
pub(crate) fn roster() -> Vec<PersonnelListing> {
    vec![
        PersonnelListing {
            first_name: Some("Hemi".to_string()),
            last_name: Some("Walker".to_string()),
            bio: Some("Residential rewires and heat pump installs".to_string()),
            skills: vec!["Heat pumps".to_string(), "Solar".to_string()],
            accreditations: vec!["EWRB".to_string(), "Site Safe".to_string()],
            available_from: Some(date(2024, 1, 10)),
            ..tradie("p-1", "2024-01-05T09:00:00Z", "Electrician", "Auckland")
        },
        PersonnelListing {
            first_name: Some("Sione".to_string()),
            last_name: Some("Taufa".to_string()),
            bio: Some("Commercial fit-outs".to_string()),
            skills: vec!["Gas fitting".to_string()],
            accreditations: vec!["PGDB".to_string()],
            available_from: Some(date(2024, 2, 1)),
            ..tradie("p-2", "2024-03-12T22:15:00Z", "Plumber", "Wellington")
        },
        PersonnelListing {
            first_name: Some("aroha".to_string()),
            last_name: Some("Ngata".to_string()),
            skills: vec!["Framing".to_string(), "Decks".to_string()],
            accreditations: vec!["LBP".to_string(), "Site Safe".to_string()],
            available_from: Some(date(2024, 1, 15)),
            ..tradie("p-3", "2024-02-20T08:30:00Z", "Builder", "Ōtautahi")
        },
        PersonnelListing {
            bio: Some("Happy to travel for solar work".to_string()),
            ..tradie("p-4", "2023-11-30", "Electrician", "Otago")
        },
    ]
}

pub(crate) fn position(id: &str, created_at: &str, title: &str) -> PositionListing {
    PositionListing {
        id: id.to_string(),
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        title: Some(title.to_string()),
        business_name: None,
        trade: None,
        region: None,
        employment_type: None,
        description: None,
        required_accreditations: Vec::new(),
        start_date: None,
    }
}

pub(crate) fn business(id: &str, created_at: &str, name: &str) -> BusinessListing {
    BusinessListing {
        id: id.to_string(),
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        business_name: Some(name.to_string()),
        primary_trade: None,
        region: None,
        description: None,
        services: Vec::new(),
        accreditations: Vec::new(),
    }
}

pub(crate) fn ids<T: crate::listings::domain::Listing>(items: &[&T]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

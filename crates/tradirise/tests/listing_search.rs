use std::fs;

use chrono::NaiveDate;
use tempfile::TempDir;
use tradirise::listings::{
    derive_view, FileListingSource, FilterState, Listing, ListingCatalog, ListingKind,
    ListingSet, ListingSource, PersonnelListing, ProjectListing, SortMode,
};

const PERSONNEL_CSV: &str = "\
id,created_at,updated_at,first_name,last_name,primary_trade_role,region,bio,skills,accreditations,available_from
p-1,2024-01-05T09:00:00Z,,Hemi,Walker,Electrician,Auckland,Heat pump installs,Heat pumps;Solar,EWRB;Site Safe,2024-01-10
p-2,2024-03-12T22:15:00Z,,Sione,Taufa,Plumber,Wellington,,Gas fitting,PGDB,2024-02-01
p-3,2024-02-20T08:30:00Z,,Aroha,Ngata,Builder,Ōtautahi,,Framing;Decks,LBP;Site Safe,not-a-date
";

const PROJECTS_JSON: &str = r#"[
  {
    "id": "proj-1",
    "created_at": "2024-04-01",
    "title": "Kitchen renovation",
    "client_name": "Tane Mahuta",
    "trade_category": "Builder",
    "region": "Auckland",
    "required_skills": ["Framing", "Cabinetry"],
    "start_date": "2024-06-01"
  },
  {
    "id": "proj-2",
    "created_at": "2024-04-03",
    "title": "Solar array",
    "trade_category": "Electrician",
    "region": "Canterbury",
    "required_skills": "Solar; Switchboards",
    "start_date": null
  }
]"#;

fn data_dir() -> TempDir {
    let dir = TempDir::new().expect("create data dir");
    fs::write(dir.path().join("personnel.csv"), PERSONNEL_CSV).expect("write personnel");
    fs::write(dir.path().join("projects.json"), PROJECTS_JSON).expect("write projects");
    dir
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn file_source_feeds_the_catalog() {
    let dir = data_dir();
    let catalog =
        ListingCatalog::load(&FileListingSource::new(dir.path())).expect("catalog loads");

    let results = catalog
        .search(
            ListingKind::Personnel,
            &FilterState::default().with_any_of("accreditations", ["Site Safe"]),
        )
        .expect("search personnel");
    let ids: Vec<String> = results.rows().into_iter().map(|row| row.id).collect();
    assert_eq!(ids, vec!["p-3", "p-1"]);
    assert_eq!(results.total, 3);

    let businesses = catalog
        .search(ListingKind::Business, &FilterState::default())
        .expect("search businesses");
    assert_eq!(businesses.total, 0);
}

#[test]
fn unparseable_dates_load_as_missing() {
    let dir = data_dir();
    let source = FileListingSource::new(dir.path());

    let ListingSet::Personnel(records) = source.fetch(ListingKind::Personnel).expect("fetch")
    else {
        panic!("expected personnel");
    };
    let schema = PersonnelListing::schema();

    let threshold = FilterState::default()
        .available_by(day(2024, 12, 31))
        .sorted_by(SortMode::AvailableSoon);
    let view: Vec<&str> = derive_view(&schema, &records, &threshold)
        .into_iter()
        .map(|record| record.id.as_str())
        .collect();
    assert_eq!(view, vec!["p-1", "p-2"]);
}

#[test]
fn projects_filter_on_skills_and_start_date() {
    let dir = data_dir();
    let source = FileListingSource::new(dir.path());
    let ListingSet::Projects(records) = source.fetch(ListingKind::Project).expect("fetch")
    else {
        panic!("expected projects");
    };
    let schema = ProjectListing::schema();

    let solar = FilterState::default().with_any_of("skills", ["Solar"]);
    let matched = derive_view(&schema, &records, &solar);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, "proj-2");

    let by_client = FilterState::default().searching("mahuta");
    assert_eq!(derive_view(&schema, &records, &by_client)[0].id, "proj-1");

    let starting = FilterState::default().available_by(day(2024, 6, 30));
    let ids: Vec<&str> = derive_view(&schema, &records, &starting)
        .into_iter()
        .map(|record| record.id.as_str())
        .collect();
    assert_eq!(ids, vec!["proj-1"]);

    let mut regions: Vec<&str> = records
        .iter()
        .filter_map(|record| record.region.as_deref())
        .collect();
    regions.sort_unstable();
    let options = tradirise::listings::extract_options(&schema, &records);
    assert_eq!(options.get("region"), regions.as_slice());
}

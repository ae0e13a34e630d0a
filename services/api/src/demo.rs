use crate::infra::{parse_criterion, parse_date, parse_kind, InMemoryListingSource};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use tradirise::config::AppConfig;
use tradirise::error::AppError;
use tradirise::listings::source::read_path;
use tradirise::listings::{
    FileListingSource, FilterOptions, FilterState, ListingCatalog, ListingKind, ListingSource,
    SearchResults, SortMode,
};

#[derive(Args, Debug)]
pub(crate) struct ListingSearchArgs {
    /// Listing kind: personnel, positions, projects, or businesses
    #[arg(long, value_parser = parse_kind, default_value = "personnel")]
    pub(crate) kind: ListingKind,
    /// Read the source set from a single .json or .csv file
    #[arg(long, conflicts_with = "data_dir")]
    pub(crate) file: Option<PathBuf>,
    /// Directory holding <kind>.json or <kind>.csv (defaults to APP_LISTINGS_DIR, then demo data)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Exact trade to match
    #[arg(long)]
    pub(crate) trade: Option<String>,
    /// Exact region to match
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Additional exact criterion as key=value (repeatable)
    #[arg(long = "exact", value_parser = parse_criterion)]
    pub(crate) exact: Vec<(String, String)>,
    /// Any-of criterion as key=value; repeat a key to accept several values
    #[arg(long = "any-of", value_parser = parse_criterion)]
    pub(crate) any_of: Vec<(String, String)>,
    /// Keep listings available (or starting) on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) available_from: Option<NaiveDate>,
    /// Sort key: newest, oldest, available_soon, or name_az
    #[arg(long, default_value = "newest")]
    pub(crate) sort: String,
    /// Case-insensitive free-text search
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Print the results as JSON instead of a listing table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory holding <kind>.json or <kind>.csv; demo data is used when omitted
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

impl ListingSearchArgs {
    fn filters(&self) -> FilterState {
        let mut filters = FilterState::default()
            .sorted_by(self.sort.as_str())
            .searching(self.search.clone().unwrap_or_default());

        if let Some(trade) = &self.trade {
            filters = filters.with_exact("trade", trade.as_str());
        }
        if let Some(region) = &self.region {
            filters = filters.with_exact("region", region.as_str());
        }
        for (key, value) in &self.exact {
            filters = filters.with_exact(key.as_str(), value.as_str());
        }
        for (key, value) in &self.any_of {
            filters = filters.with_any_of(key.as_str(), [value.as_str()]);
        }
        if let Some(date) = self.available_from {
            filters = filters.available_by(date);
        }
        filters
    }
}

pub(crate) fn run_listing_search(args: ListingSearchArgs) -> Result<(), AppError> {
    let filters = args.filters();
    if !filters.sort_by.is_recognized() {
        eprintln!(
            "warning: unknown sort key '{}'; results keep source order",
            filters.sort_by
        );
    }

    let catalog = ListingCatalog::default();
    let set = match &args.file {
        Some(path) => read_path(args.kind, path)?,
        None => resolve_source(args.data_dir.clone())?.fetch(args.kind)?,
    };
    catalog.replace(set)?;

    let results = catalog.search(args.kind, &filters)?;
    if args.json {
        let payload = serde_json::to_string_pretty(&results).map_err(std::io::Error::other)?;
        println!("{payload}");
    } else {
        render_results(&results, &filters);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let source = resolve_source(args.data_dir)?;
    let catalog = ListingCatalog::load(source.as_ref())?;

    println!("TradiRise listing demo");
    for kind in ListingKind::ordered() {
        println!("- {}: {} listings", kind.label(), catalog.total(kind)?);
        render_options(&catalog.options(kind)?);
    }

    let threshold = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap_or_default();
    let scenarios = [
        (
            "Electricians, newest first",
            ListingKind::Personnel,
            FilterState::default().with_exact("trade", "Electrician"),
        ),
        (
            "Anyone mentioning solar",
            ListingKind::Personnel,
            FilterState::default().searching("solar"),
        ),
        (
            "Site Safe holders by availability",
            ListingKind::Personnel,
            FilterState::default()
                .with_any_of("accreditations", ["Site Safe"])
                .sorted_by(SortMode::AvailableSoon),
        ),
        (
            "Positions starting by mid June",
            ListingKind::Position,
            FilterState::default().available_by(threshold),
        ),
        (
            "Projects needing solar or drainage skills",
            ListingKind::Project,
            FilterState::default().with_any_of("skills", ["Solar", "Drainage"]),
        ),
        (
            "Businesses A to Z",
            ListingKind::Business,
            FilterState::default().sorted_by(SortMode::NameAz),
        ),
    ];

    for (title, kind, filters) in &scenarios {
        println!("\n{title}");
        let results = catalog.search(*kind, filters)?;
        render_results(&results, filters);
    }

    // Re-running an unchanged filter is served from the memoized view.
    let (_, kind, filters) = &scenarios[0];
    catalog.search(*kind, filters)?;
    let stats = catalog.stats(*kind)?;
    println!(
        "\nMemoization: {} view derivations, {} option extractions for {}",
        stats.view_derivations,
        stats.option_extractions,
        kind.label()
    );

    Ok(())
}

fn resolve_source(data_dir: Option<PathBuf>) -> Result<Box<dyn ListingSource>, AppError> {
    let data_dir = match data_dir {
        Some(dir) => Some(dir),
        None => AppConfig::load()?.listings.data_dir,
    };

    Ok(match data_dir {
        Some(dir) => Box::new(FileListingSource::new(dir)),
        None => Box::new(InMemoryListingSource::demo()?),
    })
}

fn describe_filters(filters: &FilterState) {
    let mut parts: Vec<String> = filters
        .active_exact()
        .map(|(key, value)| format!("{key} = {value}"))
        .collect();
    parts.extend(filters.active_any_of().map(|(key, values)| {
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        format!("{key} in [{}]", values.join(", "))
    }));
    if let Some(date) = filters.available_from {
        parts.push(format!("available by {date}"));
    }
    if !filters.search_text.trim().is_empty() {
        parts.push(format!("search \"{}\"", filters.search_text));
    }
    println!("Filters: {}", parts.join("; "));
}

fn render_options(options: &FilterOptions) {
    for (key, values) in options.iter() {
        if !values.is_empty() {
            println!("    {key}: {}", values.join(", "));
        }
    }
}

fn render_results(results: &SearchResults, filters: &FilterState) {
    println!(
        "{}: {} of {} listings (sort: {})",
        results.kind.label(),
        results.matched,
        results.total,
        filters.sort_by
    );
    if filters.is_unfiltered() {
        println!("Filters: none");
    } else {
        describe_filters(filters);
    }

    let rows = results.rows();
    if rows.is_empty() {
        println!("  (no listings match)");
        return;
    }

    for row in rows {
        let name = if row.name.is_empty() {
            "(unnamed)"
        } else {
            row.name.as_str()
        };
        println!("  - {name} [{}]", row.id);
        if !row.details.is_empty() {
            let details = row
                .details
                .iter()
                .map(|(key, value)| format!("{key}: {value}"))
                .collect::<Vec<_>>()
                .join(" | ");
            println!("      {details}");
        }
    }
}

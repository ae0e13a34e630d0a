use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::info;

use super::domain::{ListingKind, ListingSet};

/// Page-load data fetch for one listing kind.
pub trait ListingSource: Send + Sync {
    fn fetch(&self, kind: ListingKind) -> Result<ListingSet, SourceError>;
}

/// Error enumeration for source failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid listing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid listing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("listing source unavailable: {0}")]
    Unavailable(String),
}

/// Supported on-disk encodings for a source set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Reads `<dir>/<slug>.json` or `<dir>/<slug>.csv`; a kind with neither file is empty.
#[derive(Debug, Clone)]
pub struct FileListingSource {
    root: PathBuf,
}

impl FileListingSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ListingSource for FileListingSource {
    fn fetch(&self, kind: ListingKind) -> Result<ListingSet, SourceError> {
        for format in [SourceFormat::Json, SourceFormat::Csv] {
            let extension = match format {
                SourceFormat::Json => "json",
                SourceFormat::Csv => "csv",
            };
            let path = self.root.join(format!("{}.{extension}", kind.slug()));
            if path.is_file() {
                let set = read_path(kind, &path)?;
                info!(%kind, path = %path.display(), total = set.len(), "loaded listings");
                return Ok(set);
            }
        }

        info!(%kind, root = %self.root.display(), "no listing file found; using empty set");
        Ok(ListingSet::empty(kind))
    }
}

/// Load a source set from a `.json` or `.csv` file.
pub fn read_path(kind: ListingKind, path: &Path) -> Result<ListingSet, SourceError> {
    let format = SourceFormat::from_path(path).ok_or_else(|| {
        SourceError::Unavailable(format!(
            "{} is neither a .json nor a .csv file",
            path.display()
        ))
    })?;
    let file = std::fs::File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_listings(kind, format, file)
}

pub fn read_listings<R: Read>(
    kind: ListingKind,
    format: SourceFormat,
    reader: R,
) -> Result<ListingSet, SourceError> {
    Ok(match kind {
        ListingKind::Personnel => ListingSet::Personnel(decode(format, reader)?),
        ListingKind::Position => ListingSet::Positions(decode(format, reader)?),
        ListingKind::Project => ListingSet::Projects(decode(format, reader)?),
        ListingKind::Business => ListingSet::Businesses(decode(format, reader)?),
    })
}

fn decode<T: DeserializeOwned, R: Read>(
    format: SourceFormat,
    reader: R,
) -> Result<Vec<T>, SourceError> {
    match format {
        SourceFormat::Json => Ok(serde_json::from_reader(reader)?),
        SourceFormat::Csv => {
            let mut csv_reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(reader);
            let headers = csv_reader.headers()?.clone();
            let mut records = Vec::new();
            for row in csv_reader.records() {
                records.push(serde_json::from_value(row_object(&headers, &row?))?);
            }
            Ok(records)
        }
    }
}

// Cells stay text; empty cells are left out so the field takes its default.
fn row_object(headers: &csv::StringRecord, row: &csv::StringRecord) -> Value {
    let fields: Map<String, Value> = headers
        .iter()
        .zip(row.iter())
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
        .collect();
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    #[test]
    fn csv_rows_split_multi_valued_cells() {
        let csv = "id,created_at,first_name,last_name,primary_trade_role,region,skills,accreditations,available_from\n\
                   p-1,2024-01-01,Hemi,Walker,Electrician,Auckland,Wiring; Solar,EWRB;Site Safe,2024-01-10\n\
                   p-2,2024-02-01,,,Plumber,Wellington,,,\n";

        let set = read_listings(
            ListingKind::Personnel,
            SourceFormat::Csv,
            Cursor::new(csv.as_bytes()),
        )
        .expect("csv decodes");

        let ListingSet::Personnel(records) = set else {
            panic!("expected personnel set");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].skills, vec!["Wiring", "Solar"]);
        assert_eq!(records[0].accreditations, vec!["EWRB", "Site Safe"]);
        assert_eq!(records[0].available_from, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(records[1].first_name, None);
        assert!(records[1].accreditations.is_empty());
        assert_eq!(records[1].available_from, None);
    }

    #[test]
    fn csv_cells_keep_their_text() {
        let csv = "id,created_at,skills,accreditations,region,available_from\n\
                   007,2024-01-01,007,1.50,2024,20240110\n";

        let set = read_listings(
            ListingKind::Personnel,
            SourceFormat::Csv,
            Cursor::new(csv.as_bytes()),
        )
        .expect("csv decodes");

        let ListingSet::Personnel(records) = set else {
            panic!("expected personnel set");
        };
        assert_eq!(records[0].id, "007");
        assert_eq!(records[0].skills, vec!["007"]);
        assert_eq!(records[0].accreditations, vec!["1.50"]);
        assert_eq!(records[0].region.as_deref(), Some("2024"));
        assert_eq!(records[0].available_from, None);
    }

    #[test]
    fn malformed_optional_fields_do_not_reject_the_set() {
        let json = r#"[
            {"id":"p-1","created_at":"2024-01-01","available_from":20240110,"first_name":42},
            {"id":"p-2","created_at":"2024-02-01","available_from":"2024-01-10","first_name":"Hemi"}
        ]"#;

        let set = read_listings(
            ListingKind::Personnel,
            SourceFormat::Json,
            Cursor::new(json.as_bytes()),
        )
        .expect("json decodes");

        let ListingSet::Personnel(records) = set else {
            panic!("expected personnel set");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].available_from, None);
        assert_eq!(records[0].first_name, None);
        assert_eq!(records[1].available_from, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(records[1].first_name.as_deref(), Some("Hemi"));
    }

    #[test]
    fn json_arrays_decode_by_kind() {
        let json = r#"[{"id":"b-1","created_at":"2024-03-01T00:00:00Z","business_name":"Kauri Roofing","services":["Re-roofing"]}]"#;
        let set = read_listings(
            ListingKind::Business,
            SourceFormat::Json,
            Cursor::new(json.as_bytes()),
        )
        .expect("json decodes");
        assert_eq!(set.kind(), ListingKind::Business);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn missing_directory_yields_empty_sets() {
        let source = FileListingSource::new("/nonexistent/tradirise-listings");
        let set = source.fetch(ListingKind::Project).expect("empty set");
        assert!(set.is_empty());
        assert_eq!(set.kind(), ListingKind::Project);
    }

    #[test]
    fn format_detection_uses_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("data/personnel.CSV")),
            Some(SourceFormat::Csv)
        );
        assert_eq!(SourceFormat::from_path(Path::new("data/personnel.xlsx")), None);
    }
}

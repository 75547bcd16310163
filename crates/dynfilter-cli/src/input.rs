//! Loading customer records from disk.
//!
//! The format is chosen by file extension: `.json`, `.yaml` / `.yml`, `.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading records.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported input format for {0} (expected .json, .yaml, .yml or .csv)")]
    UnsupportedFormat(PathBuf),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
    Csv,
}

impl InputFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(InputFormat::Json),
            "yaml" | "yml" => Some(InputFormat::Yaml),
            "csv" => Some(InputFormat::Csv),
            _ => None,
        }
    }
}

/// Parses a list of records from `content`.
pub fn parse_records<T: DeserializeOwned>(
    content: &str,
    format: InputFormat,
) -> Result<Vec<T>, InputError> {
    match format {
        InputFormat::Json => Ok(serde_json::from_str(content)?),
        InputFormat::Yaml => Ok(serde_yaml::from_str(content)?),
        InputFormat::Csv => {
            let mut reader = csv::Reader::from_reader(content.as_bytes());
            let records = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
            Ok(records)
        }
    }
}

/// Reads and parses the records stored at `path`.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, InputError> {
    let format =
        InputFormat::from_path(path).ok_or_else(|| InputError::UnsupportedFormat(path.into()))?;
    let content = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.into(),
        source,
    })?;
    let records = parse_records(&content, format)?;
    debug!(path = %path.display(), ?format, count = records.len(), "loaded records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::Customer;
    use rust_decimal::Decimal;

    const YAML: &str = "
- id: 1
  name: ahmed
  telephone: 201000000001
  age: 18
  spendAverage: 1500.5
  categoryId: 1
  isActive: true
  joinDate: 2020-01-15
";

    const CSV: &str = "id,name,telephone,age,spendAverage,categoryId,isActive,joinDate
1,ahmed,201000000001,18,1500.5,1,true,2020-01-15
2,Mona,201000000002,25,2500,2,false,2019-11-02
";

    #[test]
    fn format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.JSON")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("a.yml")), Some(InputFormat::Yaml));
        assert_eq!(InputFormat::from_path(Path::new("a.csv")), Some(InputFormat::Csv));
        assert_eq!(InputFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(InputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn parse_yaml_customers() {
        let customers: Vec<Customer> = parse_records(YAML, InputFormat::Yaml).unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].spend_average, Decimal::new(15005, 1));
        assert_eq!(customers[0].join_date.to_string(), "2020-01-15");
    }

    #[test]
    fn parse_csv_customers() {
        let customers: Vec<Customer> = parse_records(CSV, InputFormat::Csv).unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[1].name, "Mona");
        assert!(!customers[1].is_active);
    }

    #[test]
    fn json_round_trips_through_serde() {
        let customers: Vec<Customer> = parse_records(YAML, InputFormat::Yaml).unwrap();
        let json = serde_json::to_string(&customers).unwrap();
        let back: Vec<Customer> = parse_records(&json, InputFormat::Json).unwrap();
        assert_eq!(back, customers);
    }

    #[test]
    fn unsupported_extension() {
        let err = load_records::<Customer>(Path::new("customers.txt")).unwrap_err();
        assert!(matches!(err, InputError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file() {
        let err = load_records::<Customer>(Path::new("/nonexistent/customers.json")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }
}

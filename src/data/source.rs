//! Reference dataset loading.
//!
//! The model is fitted on the California housing census table. It can come from:
//! - a remote CSV (default: the public `housing.csv` mirror)
//! - a local CSV file
//! - the seeded synthetic generator in `data::sample`
//! - an in-memory table (embedding and tests)
//!
//! Two CSV layouts are accepted, header names case-insensitive:
//!
//! - raw census columns: `housing_median_age`, `total_rooms`, `households`,
//!   `median_income`, `median_house_value`
//! - derived columns: `MedInc`, `HouseAge`, `AveRooms`, `MedHouseVal`
//!
//! For the raw layout we derive `average_rooms = total_rooms / households` and
//! `median_value = median_house_value / 100000`.
//!
//! Rows with a missing or unparsable selected value are skipped and counted;
//! a missing selected column or an empty result is a `DataUnavailable` error.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use csv::StringRecord;
use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::data::sample::generate_reference;
use crate::domain::{ReferenceDataset, ReferenceRecord};
use crate::error::EstimatorError;

/// Public mirror of the California housing census table.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/ageron/handson-ml2/master/datasets/housing/housing.csv";

/// Divisor taking `median_house_value` to units of 100,000.
const VALUE_UNIT: f64 = 100_000.0;

/// Where the reference table comes from.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    Remote { url: String, timeout: Duration },
    File(PathBuf),
    Synthetic { rows: usize, seed: u64, noise_sd: f64 },
    Memory(ReferenceDataset),
}

impl DatasetSource {
    /// Short description for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            DatasetSource::Remote { url, .. } => url.clone(),
            DatasetSource::File(path) => path.display().to_string(),
            DatasetSource::Synthetic { rows, seed, .. } => format!("synthetic (rows={rows}, seed={seed})"),
            DatasetSource::Memory(dataset) => dataset.origin().to_string(),
        }
    }
}

/// Obtain the reference table from `source`.
pub fn load_reference_dataset(source: &DatasetSource) -> Result<ReferenceDataset, EstimatorError> {
    let dataset = match source {
        DatasetSource::Remote { url, timeout } => fetch_remote(url, *timeout)?,
        DatasetSource::File(path) => {
            let file = File::open(path).map_err(|e| {
                EstimatorError::DataUnavailable(format!("Failed to open '{}': {e}", path.display()))
            })?;
            parse_reference_csv(file, path.display().to_string())?
        }
        DatasetSource::Synthetic { rows, seed, noise_sd } => generate_reference(*rows, *seed, *noise_sd)?,
        DatasetSource::Memory(dataset) => dataset.clone(),
    };

    info!(origin = dataset.origin(), rows = dataset.len(), "reference dataset loaded");
    Ok(dataset)
}

fn fetch_remote(url: &str, timeout: Duration) -> Result<ReferenceDataset, EstimatorError> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| EstimatorError::DataUnavailable(format!("HTTP client error: {e}")))?;

    let resp = client
        .get(url)
        .send()
        .map_err(|e| EstimatorError::DataUnavailable(format!("Request to {url} failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(EstimatorError::DataUnavailable(format!(
            "Request to {url} failed with status {}.",
            resp.status()
        )));
    }

    let body = resp
        .bytes()
        .map_err(|e| EstimatorError::DataUnavailable(format!("Failed to read response body: {e}")))?;

    parse_reference_csv(&body[..], url.to_string())
}

/// Column positions for the two supported layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Census {
        income: usize,
        age: usize,
        total_rooms: usize,
        households: usize,
        value: usize,
    },
    Derived {
        income: usize,
        age: usize,
        rooms: usize,
        value: usize,
    },
}

/// Parse a reference CSV from any reader.
pub fn parse_reference_csv<R: Read>(reader: R, origin: String) -> Result<ReferenceDataset, EstimatorError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| EstimatorError::DataUnavailable(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let layout = resolve_layout(&build_header_map(&headers))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row.map_err(|e| EstimatorError::DataUnavailable(format!("Malformed CSV: {e}")))?;
        match parse_row(&row, layout) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, origin = origin.as_str(), "skipped reference rows with missing values");
    }
    if records.is_empty() {
        return Err(EstimatorError::DataUnavailable(format!(
            "No usable rows in {origin}."
        )));
    }

    Ok(ReferenceDataset::new(records, origin))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Strip a UTF-8 BOM some spreadsheet exports put on the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_layout(header_map: &HashMap<String, usize>) -> Result<Layout, EstimatorError> {
    let col = |name: &str| header_map.get(name).copied();

    if let (Some(income), Some(age), Some(rooms), Some(value)) =
        (col("medinc"), col("houseage"), col("averooms"), col("medhouseval"))
    {
        return Ok(Layout::Derived {
            income,
            age,
            rooms,
            value,
        });
    }

    let required = [
        "median_income",
        "housing_median_age",
        "total_rooms",
        "households",
        "median_house_value",
    ];
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(EstimatorError::DataUnavailable(format!(
            "Missing required column(s): {}",
            missing.join(", ")
        )));
    }

    Ok(Layout::Census {
        income: header_map["median_income"],
        age: header_map["housing_median_age"],
        total_rooms: header_map["total_rooms"],
        households: header_map["households"],
        value: header_map["median_house_value"],
    })
}

fn parse_row(row: &StringRecord, layout: Layout) -> Option<ReferenceRecord> {
    match layout {
        Layout::Derived {
            income,
            age,
            rooms,
            value,
        } => Some(ReferenceRecord {
            median_income: field(row, income)?,
            house_age: field(row, age)?,
            average_rooms: field(row, rooms)?,
            median_value: field(row, value)?,
        }),
        Layout::Census {
            income,
            age,
            total_rooms,
            households,
            value,
        } => {
            let households = field(row, households)?;
            if households <= 0.0 {
                return None;
            }
            Some(ReferenceRecord {
                median_income: field(row, income)?,
                house_age: field(row, age)?,
                average_rooms: field(row, total_rooms)? / households,
                median_value: field(row, value)? / VALUE_UNIT,
            })
        }
    }
}

fn field(row: &StringRecord, idx: usize) -> Option<f64> {
    let v = row.get(idx)?.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

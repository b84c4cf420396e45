//! Climate CSV ingestion: one file per location, a `date` column plus one
//! column per parameter, blank cells meaning missing.

use acvi_core::{LocationRecord, Parameter, TimeSeries};
use anyhow::Context;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Date format of the first CSV column: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional manifest in the input directory mapping location ids to
/// coordinates: `location,latitude,longitude`.
pub const MANIFEST_FILE: &str = "locations.csv";

/// Load every location CSV in a directory, in lexical filename order.
///
/// The filename stem is the location id. Files that fail to parse are
/// skipped with a warning; the rest of the cohort loads normally. The
/// lexical order doubles as the documented ranking tie-break order.
pub fn load_locations(input_dir: &str) -> anyhow::Result<Vec<LocationRecord>> {
    let dir = Path::new(input_dir);
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading input directory {input_dir}"))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|e| e == "csv").unwrap_or(false))
        .filter(|path| {
            path.file_name()
                .map(|name| name != MANIFEST_FILE)
                .unwrap_or(true)
        })
        .collect();
    files.sort();

    let coordinates = load_manifest(&dir.join(MANIFEST_FILE));
    let mut locations = Vec::new();
    for file in files {
        let id = file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        match load_series(&file) {
            Ok(series) => {
                let (latitude, longitude) = coordinates.get(&id).copied().unwrap_or((0.0, 0.0));
                locations.push(LocationRecord::new(id, latitude, longitude, series));
            }
            Err(error) => warn!("skipping {}: {error}", file.display()),
        }
    }
    info!("loaded {} locations from {input_dir}", locations.len());
    Ok(locations)
}

fn load_manifest(path: &Path) -> BTreeMap<String, (f64, f64)> {
    let mut coordinates = BTreeMap::new();
    let Ok(content) = fs::read_to_string(path) else {
        return coordinates;
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());
    for record in reader.records().flatten() {
        let id = record.get(0).map(str::trim);
        let latitude = record.get(1).and_then(parse_value);
        let longitude = record.get(2).and_then(parse_value);
        if let (Some(id), Some(latitude), Some(longitude)) = (id, latitude, longitude) {
            coordinates.insert(id.to_string(), (latitude, longitude));
        }
    }
    coordinates
}

/// Parse one location CSV into a gap-free daily series.
///
/// Dates may arrive unordered or with holes; the series is materialized
/// over the full first-to-last day range with absent dates as missing
/// values, which is the invariant the core types expect.
fn load_series(path: &Path) -> anyhow::Result<TimeSeries> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    anyhow::ensure!(headers.len() >= 2, "{} has no parameter columns", path.display());

    let parameters: Vec<Option<Parameter>> = headers
        .iter()
        .skip(1)
        .map(|name| {
            let parameter = Parameter::from_name(name.trim());
            if parameter.is_none() {
                debug!("unknown column '{}' in {}", name, path.display());
            }
            parameter
        })
        .collect();

    let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
    for record in reader.records() {
        let record = record?;
        let Some(date_field) = record.get(0) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_field.trim(), DATE_FORMAT) else {
            warn!("bad date '{}' in {}", date_field, path.display());
            continue;
        };
        let values: Vec<Option<f64>> = (1..headers.len())
            .map(|index| record.get(index).and_then(parse_value))
            .collect();
        rows.insert(date, values);
    }
    anyhow::ensure!(!rows.is_empty(), "no usable records in {}", path.display());

    let first = *rows.keys().next().unwrap();
    let last = *rows.keys().next_back().unwrap();
    let mut dates = Vec::new();
    let mut day = first;
    while day <= last {
        dates.push(day);
        day += chrono::Duration::days(1);
    }

    let mut series = TimeSeries::new(dates.clone())?;
    for (position, parameter) in parameters.iter().enumerate() {
        let Some(parameter) = parameter else {
            continue;
        };
        let column = dates
            .iter()
            .map(|date| {
                rows.get(date)
                    .and_then(|values| values.get(position).copied().flatten())
            })
            .collect();
        series.insert_column(*parameter, column)?;
    }
    Ok(series)
}

fn parse_value(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 3.5 "), Some(3.5));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("  "), None);
        assert_eq!(parse_value("n/a"), None);
    }
}

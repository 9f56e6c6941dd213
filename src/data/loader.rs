use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::model::{FeatureMatrix, MeasurementTable};
use crate::error::{DiscretizeError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one Bioplex measurement table from a comma-separated file.
///
/// Layout: a header row naming the index (time) column followed by the
/// feature columns, then one data row per time point.  The table ends at
/// the first data row whose index cell repeats the first data row's index
/// (the series restarting) or repeats the header's index name (a second
/// header block).  Everything from that row on is discarded.
pub fn load_table(path: &Path) -> Result<MeasurementTable> {
    let file = File::open(path).map_err(|source| DiscretizeError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Reading measurement table {}", path.display());
    read_table(file, &path.display().to_string())
}

/// A read failure on the underlying source means it is unreadable, not
/// malformed.
fn record_error(err: csv::Error, source_name: &str) -> DiscretizeError {
    if !err.is_io_error() {
        return DiscretizeError::parse(source_name, err.to_string());
    }
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DiscretizeError::NotFound {
            path: PathBuf::from(source_name),
            source,
        },
        other => DiscretizeError::parse(source_name, format!("{other:?}")),
    }
}

/// Parse a measurement table from any reader.  `source_name` only labels
/// error messages.
pub fn read_table<R: Read>(reader: R, source_name: &str) -> Result<MeasurementTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = rdr.records();

    let header = match records.next() {
        Some(result) => result.map_err(|e| record_error(e, source_name))?,
        None => return Err(DiscretizeError::parse(source_name, "empty source, no header row")),
    };
    let width = header.len();
    let index_name = header.get(0).unwrap_or("").to_string();
    let features: Vec<String> = header.iter().skip(1).map(|h| h.trim().to_string()).collect();
    if features.is_empty() {
        return Err(DiscretizeError::parse(
            source_name,
            "header names no feature columns",
        ));
    }
    info!("Species in {source_name}: {}", features.join(", "));

    let mut time_index = Vec::new();
    let mut rows = Vec::new();
    let mut sentinel: Option<String> = None;

    for result in records {
        let record = result.map_err(|e| record_error(e, source_name))?;
        let line = record.position().map_or(0, |p| p.line());
        let index = record.get(0).unwrap_or("");

        if index == index_name {
            debug!("{source_name}: repeated header at line {line}, stopping");
            break;
        }
        match &sentinel {
            Some(first) if first == index => {
                debug!("{source_name}: index '{index}' repeats at line {line}, stopping");
                break;
            }
            Some(_) => {}
            None => sentinel = Some(index.to_string()),
        }

        if record.len() != width {
            return Err(DiscretizeError::parse(
                source_name,
                format!("line {line}: {} cells, header has {width}", record.len()),
            ));
        }

        let values = record
            .iter()
            .skip(1)
            .zip(&features)
            .map(|(cell, name)| parse_cell(cell, name, line, source_name))
            .collect::<Result<Vec<f64>>>()?;

        time_index.push(index.to_string());
        rows.push(values);
    }

    debug!("{source_name}: {} time points", time_index.len());
    let matrix = FeatureMatrix::new(rows, features.len())?;
    Ok(MeasurementTable {
        index_name,
        time_index,
        features,
        matrix,
    })
}

fn parse_cell(cell: &str, feature: &str, line: u64, source_name: &str) -> Result<f64> {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DiscretizeError::parse(
            source_name,
            format!("line {line}, column '{feature}': '{cell}' is not a finite number"),
        )),
    }
}

//! Writer for discretized tables.
//!
//! File layout, one line per time point:
//!
//! ```text
//! # Erk<TAB>EGFR<TAB>mTor
//! 0<TAB>1<TAB>0<TAB>1
//! 5<TAB>0<TAB>0<TAB>1
//! ```
//!
//! The header lists only the species (the time column is unnamed) and is
//! prefixed with `# `.  Data lines are always tab-separated; the header
//! delimiter is configurable because the treated and untreated files have
//! historically used different ones.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::BinaryMatrix;
use crate::error::{DiscretizeError, Result};

/// Delimiter joining the species names in the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderDelimiter {
    Tab,
    Comma,
}

impl HeaderDelimiter {
    fn as_str(self) -> &'static str {
        match self {
            HeaderDelimiter::Tab => "\t",
            HeaderDelimiter::Comma => ",",
        }
    }
}

/// Header convention for the two files of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// Treated header tab-joined, untreated header comma-joined.
    #[default]
    Mixed,
    Tab,
    Comma,
}

impl HeaderStyle {
    /// `(treated, untreated)` header delimiters.
    pub fn delimiters(self) -> (HeaderDelimiter, HeaderDelimiter) {
        match self {
            HeaderStyle::Mixed => (HeaderDelimiter::Tab, HeaderDelimiter::Comma),
            HeaderStyle::Tab => (HeaderDelimiter::Tab, HeaderDelimiter::Tab),
            HeaderStyle::Comma => (HeaderDelimiter::Comma, HeaderDelimiter::Comma),
        }
    }
}

/// Write a binary matrix annotated with its time index.
pub fn write_binary_table<W: Write>(
    mut writer: W,
    features: &[String],
    time_index: &[String],
    matrix: &BinaryMatrix,
    header: HeaderDelimiter,
) -> Result<()> {
    if time_index.len() != matrix.n_rows() {
        return Err(DiscretizeError::parse(
            "discretized output",
            format!(
                "{} time points for {} matrix rows",
                time_index.len(),
                matrix.n_rows()
            ),
        ));
    }
    writeln!(writer, "# {}", features.join(header.as_str()))?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);
    for (time, row) in time_index.iter().zip(matrix.rows()) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(time.clone());
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render a discretized table to a string.
pub fn render_binary_table(
    features: &[String],
    time_index: &[String],
    matrix: &BinaryMatrix,
    header: HeaderDelimiter,
) -> Result<String> {
    let mut buf = Vec::new();
    write_binary_table(&mut buf, features, time_index, matrix, header)?;
    String::from_utf8(buf).map_err(|e| DiscretizeError::parse("discretized output", e.to_string()))
}

/// Write a discretized table to `path`.
pub fn save_binary_table(
    path: &Path,
    features: &[String],
    time_index: &[String],
    matrix: &BinaryMatrix,
    header: HeaderDelimiter,
) -> Result<()> {
    let file = File::create(path)?;
    write_binary_table(BufWriter::new(file), features, time_index, matrix, header)
}

/// `<dir>/<prefix><file name>`, where `dir` defaults to the input's directory.
pub fn output_path(input: &Path, output_dir: Option<&Path>, prefix: &str) -> Result<PathBuf> {
    let name = input.file_name().ok_or_else(|| {
        DiscretizeError::Config(format!("'{}' has no file name", input.display()))
    })?;
    let mut file_name = std::ffi::OsString::from(prefix);
    file_name.push(name);

    let dir = output_dir.or_else(|| input.parent()).unwrap_or(Path::new(""));
    Ok(dir.join(file_name))
}

/// Comparable form of a file path.  The parent directory is resolved on disk
/// when it exists; otherwise `.` components are dropped lexically.
pub fn normalized_path(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let base = fs::canonicalize(parent).unwrap_or_else(|_| {
        parent
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    });
    match path.file_name() {
        Some(name) => base.join(name),
        None => base,
    }
}

use std::fmt;

use crate::error::{DiscretizeError, Result};

// ---------------------------------------------------------------------------
// FeatureMatrix – real-valued measurements, rows = time points
// ---------------------------------------------------------------------------

/// An M×N matrix of measurements.  Row order is the temporal order of the
/// source table, column order is the feature order of its header.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f64>>,
    n_features: usize,
}

impl FeatureMatrix {
    /// Build a matrix with `n_features` columns.  Every row must have exactly
    /// `n_features` values.
    pub fn new(rows: Vec<Vec<f64>>, n_features: usize) -> Result<Self> {
        if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(DiscretizeError::parse(
                "feature matrix",
                format!("row {i} has {} values, expected {n_features}", r.len()),
            ));
        }
        Ok(FeatureMatrix { rows, n_features })
    }

    /// Build a matrix from rows, taking the width from the first row.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);
        Self::new(rows, n_features)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// `(rows, features)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_features)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Iterate the values of feature column `j` in row order.
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |r| r[j])
    }
}

// ---------------------------------------------------------------------------
// BinaryMatrix – discretized measurements
// ---------------------------------------------------------------------------

/// Same shape as its source [`FeatureMatrix`], every cell 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMatrix {
    rows: Vec<Vec<u8>>,
    n_features: usize,
}

impl BinaryMatrix {
    pub(crate) fn new(rows: Vec<Vec<u8>>, n_features: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == n_features));
        BinaryMatrix { rows, n_features }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_features)
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Rows as nested vectors, convenient for comparisons.
    pub fn to_vec(&self) -> Vec<Vec<u8>> {
        self.rows.clone()
    }
}

impl fmt::Display for BinaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MeasurementTable – one loaded condition
// ---------------------------------------------------------------------------

/// One condition as loaded from disk: time index, feature names and values.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    /// Header cell of the index column (e.g. `Time`).
    pub index_name: String,
    /// Raw index-column values, one per matrix row.
    pub time_index: Vec<String>,
    /// Feature (species) names in header order.
    pub features: Vec<String>,
    pub matrix: FeatureMatrix,
}

impl MeasurementTable {
    /// Number of time points.
    pub fn len(&self) -> usize {
        self.time_index.len()
    }

    /// Whether the table holds no time points.
    pub fn is_empty(&self) -> bool {
        self.time_index.is_empty()
    }
}

//! Threshold discretization of a condition pair.
//!
//! For each feature the values of both conditions are pooled, a mean or
//! median threshold is taken over the pool, and every measurement is mapped
//! to 1 when it is at or above the threshold and to 0 otherwise.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::data::model::{BinaryMatrix, FeatureMatrix};
use crate::error::{DiscretizeError, Result};

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// Central tendency used as the per-feature threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Mean,
    #[default]
    Median,
}

impl Method {
    /// Statistic of `values` under this method.  `NaN` for an empty slice.
    pub fn apply(self, values: &mut [f64]) -> f64 {
        match self {
            Method::Mean => mean(values),
            Method::Median => median(values),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Mean => write!(f, "mean"),
            Method::Median => write!(f, "median"),
        }
    }
}

impl FromStr for Method {
    type Err = DiscretizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Method::Mean),
            "median" => Ok(Method::Median),
            other => Err(DiscretizeError::Config(format!(
                "unknown discretization method '{other}' (expected mean or median)"
            ))),
        }
    }
}

/// Arithmetic mean, `NaN` when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median, averaging the two central order statistics for even lengths.
/// Sorts `values` in place; `NaN` when empty.
pub fn median(values: &mut [f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }
    values.sort_by(f64::total_cmp);
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Thresholds and result
// ---------------------------------------------------------------------------

/// One threshold per feature, computed over a pooled condition pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdVector {
    pub method: Method,
    pub values: Vec<f64>,
}

impl ThresholdVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Binary label of `value` against feature `j`'s threshold.  Ties map to 1.
    /// `j` must be below [`len`](Self::len).
    pub(crate) fn label(&self, j: usize, value: f64) -> u8 {
        u8::from(value >= self.values[j])
    }

    /// Label every cell of `matrix`, which must have one column per threshold.
    pub fn binarize(&self, matrix: &FeatureMatrix) -> Result<BinaryMatrix> {
        if matrix.n_features() != self.len() {
            return Err(DiscretizeError::ShapeMismatch {
                left: self.len(),
                right: matrix.n_features(),
            });
        }
        let rows = matrix
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, &v)| self.label(j, v))
                    .collect()
            })
            .collect();
        Ok(BinaryMatrix::new(rows, matrix.n_features()))
    }
}

/// Output of [`discretize`]: the shared thresholds and one binary matrix
/// per input, each with its input's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Discretization {
    pub thresholds: ThresholdVector,
    pub first: BinaryMatrix,
    pub second: BinaryMatrix,
}

// ---------------------------------------------------------------------------
// Discretizer
// ---------------------------------------------------------------------------

/// Compute per-feature thresholds from the pooled rows of `a` and `b`.
pub fn pooled_thresholds(a: &FeatureMatrix, b: &FeatureMatrix, method: Method) -> Result<ThresholdVector> {
    if a.n_features() != b.n_features() {
        return Err(DiscretizeError::ShapeMismatch {
            left: a.n_features(),
            right: b.n_features(),
        });
    }

    let mut pool = Vec::with_capacity(a.n_rows() + b.n_rows());
    let values = (0..a.n_features())
        .map(|j| {
            pool.clear();
            pool.extend(a.column(j).chain(b.column(j)));
            if pool.is_empty() {
                warn!("feature {j}: no values in either condition, threshold undefined");
            }
            method.apply(&mut pool)
        })
        .collect();

    Ok(ThresholdVector { method, values })
}

/// Discretize a condition pair.
///
/// Both matrices must have the same feature count; row counts may differ.
/// A matrix with zero rows simply contributes nothing to the pool.
pub fn discretize(a: &FeatureMatrix, b: &FeatureMatrix, method: Method) -> Result<Discretization> {
    let thresholds = pooled_thresholds(a, b, method)?;
    debug!("Discretized values of species by {method}: {:?}", thresholds.values);

    Ok(Discretization {
        first: thresholds.binarize(a)?,
        second: thresholds.binarize(b)?,
        thresholds,
    })
}

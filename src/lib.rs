//! Discretization of Bioplex time-series measurements.
//!
//! A treated and an untreated measurement table are loaded, a per-species
//! threshold (mean or median) is computed over both conditions pooled, and
//! every measurement becomes 1 (at or above the threshold) or 0.  The
//! resulting Boolean series can be turned into temporal-logic properties
//! for an external model checker.

pub mod config;
pub mod data;
pub mod discretize;
pub mod error;
pub mod formula;
pub mod output;
pub mod pipeline;

pub use config::{BatchConfig, PairConfig};
pub use data::loader::{load_table, read_table};
pub use data::model::{BinaryMatrix, FeatureMatrix, MeasurementTable};
pub use discretize::{discretize, Discretization, Method, ThresholdVector};
pub use error::{DiscretizeError, Result};
pub use pipeline::{run_batch, run_pair, PairOutcome};

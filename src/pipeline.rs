//! Condition-pair job: load both tables, discretize against pooled
//! thresholds, write one annotated output file per condition.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use crate::config::{BatchConfig, PairConfig};
use crate::data::loader::load_table;
use crate::data::model::{BinaryMatrix, MeasurementTable};
use crate::data::select::select_features;
use crate::discretize::{discretize, Discretization, Method, ThresholdVector};
use crate::error::{DiscretizeError, Result};
use crate::formula::{matrix_formula, Chaining, PropertySpec};
use crate::output::save_binary_table;

/// One discretized condition and where it was written.
#[derive(Debug, Clone)]
pub struct ConditionOutput {
    pub input: PathBuf,
    pub output: PathBuf,
    pub time_index: Vec<String>,
    pub binary: BinaryMatrix,
}

/// Result of a completed pair job.
#[derive(Debug, Clone)]
pub struct PairOutcome {
    pub features: Vec<String>,
    pub thresholds: ThresholdVector,
    pub treated: ConditionOutput,
    pub untreated: ConditionOutput,
    pub properties: Vec<PropertySpec>,
}

/// Both tables must name the same features in the same order.
pub fn check_features(left: &[String], right: &[String]) -> Result<()> {
    if left.len() != right.len() {
        return Err(DiscretizeError::ShapeMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    match left.iter().zip(right).position(|(l, r)| l != r) {
        Some(position) => Err(DiscretizeError::FeatureMismatch {
            position,
            left: left[position].clone(),
            right: right[position].clone(),
        }),
        None => Ok(()),
    }
}

/// Discretize two loaded tables against their pooled thresholds.
pub fn discretize_tables(
    treated: &MeasurementTable,
    untreated: &MeasurementTable,
    method: Method,
) -> Result<Discretization> {
    check_features(&treated.features, &untreated.features)?;
    if treated.len() != untreated.len() {
        warn!(
            "condition lengths differ: {} vs {} time points",
            treated.len(),
            untreated.len()
        );
    }
    discretize(&treated.matrix, &untreated.matrix, method)
}

fn load_condition(path: &Path, species: Option<&[String]>) -> Result<MeasurementTable> {
    let table = load_table(path)?;
    match species {
        Some(names) => select_features(&table, names),
        None => Ok(table),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Property specification for one discretized condition.
pub fn condition_property(
    input: &Path,
    features: &[String],
    binary: &BinaryMatrix,
    drug: Option<(&str, u8)>,
) -> Result<PropertySpec> {
    let name = file_stem(input);
    let series = matrix_formula(features, binary, Chaining::Reachability, false)
        .map_err(|e| match e {
            DiscretizeError::Formula(msg) => DiscretizeError::Formula(format!("{name}: {msg}")),
            other => other,
        })?;
    let spec = PropertySpec::from_series(&name, &format!("Bioplex measurement for {name}."), series);
    Ok(match drug {
        Some((component, value)) => spec.with_fixed(component, value),
        None => spec,
    })
}

fn write_properties(path: &Path, properties: &[PropertySpec]) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), properties)?;
    Ok(())
}

/// Run one pair job end to end.
pub fn run_pair(config: &PairConfig) -> Result<PairOutcome> {
    config.validate()?;
    let species = config.species.as_deref();
    let treated = load_condition(&config.treated, species)?;
    let untreated = load_condition(&config.untreated, species)?;

    let Discretization {
        thresholds,
        first,
        second,
    } = discretize_tables(&treated, &untreated, config.method)?;

    let (treated_out, untreated_out) = config.output_paths()?;
    let (treated_header, untreated_header) = config.header_style.delimiters();

    save_binary_table(&treated_out, &treated.features, &treated.time_index, &first, treated_header)?;
    save_binary_table(
        &untreated_out,
        &untreated.features,
        &untreated.time_index,
        &second,
        untreated_header,
    )?;
    info!(
        "Saved discretized data in {} and {}",
        treated_out.display(),
        untreated_out.display()
    );

    let mut properties = Vec::new();
    if let Some(path) = &config.properties {
        let drug = config.drug.as_deref();
        properties.push(condition_property(
            &config.treated,
            &treated.features,
            &first,
            drug.map(|d| (d, 1)),
        )?);
        properties.push(condition_property(
            &config.untreated,
            &untreated.features,
            &second,
            drug.map(|d| (d, 0)),
        )?);
        write_properties(path, &properties)?;
        info!("Saved property specifications in {}", path.display());
    }

    Ok(PairOutcome {
        features: treated.features,
        thresholds,
        treated: ConditionOutput {
            input: config.treated.clone(),
            output: treated_out,
            time_index: treated.time_index,
            binary: first,
        },
        untreated: ConditionOutput {
            input: config.untreated.clone(),
            output: untreated_out,
            time_index: untreated.time_index,
            binary: second,
        },
        properties,
    })
}

/// Run independent pair jobs in parallel.  Results keep the input order.
///
/// The batch is validated first, so no two jobs can write the same file.
pub fn run_batch(batch: &BatchConfig) -> Result<Vec<Result<PairOutcome>>> {
    batch.validate()?;
    Ok(batch.pairs.par_iter().map(run_pair).collect())
}

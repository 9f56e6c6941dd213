//! Temporal-logic properties from Boolean time series.
//!
//! A discretized series is handed to an external model checker as an
//! initial-state constraint (the first measurement) plus a CTL formula
//! requiring every later measurement to be reached in order:
//!
//! ```text
//! names  = [Erk, Akt]
//! series = [[1,1], [1,0], [0,0]]
//!
//! initial_state = Erk=1&Akt=1
//! formula       = EF(Erk=1&Akt=0&EF(Erk=0&Akt=0))
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::model::BinaryMatrix;
use crate::error::{DiscretizeError, Result};

const HOLE: char = '?';
const RESERVED: &[char] = &[HOLE, '&', '|', '=', '(', ')', '!', '-', '>', ' ', '\t'];

/// How consecutive measurements are chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chaining {
    /// `EF(next ...)`: the next measurement is reachable.
    #[default]
    Reachability,
    /// `((keep) U (next ...))`: components already at their next value keep it
    /// until the next measurement is reached.
    Monotone,
}

/// Initial-state constraint and the chained formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesProperty {
    pub initial_state: String,
    pub formula: String,
}

fn render_state(names: &[String], values: &[u8]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(n, v)| format!("{n}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn render_keep(names: &[String], values: &[u8]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(n, v)| format!("({n}={v}->X {n}={v})"))
        .collect::<Vec<_>>()
        .join("&")
}

fn check_inputs(names: &[String], measurements: &[Vec<u8>]) -> Result<()> {
    if let Some(bad) = names
        .iter()
        .find(|n| n.is_empty() || n.contains(RESERVED))
    {
        return Err(DiscretizeError::Formula(format!(
            "'{bad}' is not a valid component name"
        )));
    }
    for (i, m) in measurements.iter().enumerate() {
        if m.len() != names.len() {
            return Err(DiscretizeError::Formula(format!(
                "measurement {i} is of length {} but {} names are given",
                m.len(),
                names.len()
            )));
        }
        if let Some(v) = m.iter().find(|&&v| v > 1) {
            return Err(DiscretizeError::Formula(format!(
                "measurement {i} holds non-Boolean value {v}"
            )));
        }
    }
    if measurements.len() < 2 {
        return Err(DiscretizeError::Formula(
            "need at least 2 measurements".to_string(),
        ));
    }
    Ok(())
}

/// Build the initial state and chained formula for a Boolean time series.
///
/// With `fixpoint`, the last measurement must additionally be a steady
/// state (`Delta=0`).
pub fn time_series_formula(
    names: &[String],
    measurements: &[Vec<u8>],
    chaining: Chaining,
    fixpoint: bool,
) -> Result<TimeSeriesProperty> {
    check_inputs(names, measurements)?;

    let initial_state = render_state(names, &measurements[0]);
    let mut formula = HOLE.to_string();
    for (i, m) in measurements.iter().enumerate().skip(1) {
        let state = render_state(names, m);
        let mut term = match chaining {
            Chaining::Reachability => format!("EF({state}{HOLE})"),
            Chaining::Monotone => {
                format!("(({}) U ({state}{HOLE}))", render_keep(names, m))
            }
        };
        if i > 1 {
            term.insert(0, '&');
        }
        formula = formula.replacen(HOLE, &term, 1);
    }
    let tail = if fixpoint { "&Delta=0" } else { "" };
    formula = formula.replacen(HOLE, tail, 1);

    Ok(TimeSeriesProperty {
        initial_state,
        formula,
    })
}

/// [`time_series_formula`] over the rows of a discretized matrix.
pub fn matrix_formula(
    names: &[String],
    matrix: &BinaryMatrix,
    chaining: Chaining,
    fixpoint: bool,
) -> Result<TimeSeriesProperty> {
    time_series_formula(names, matrix.rows(), chaining, fixpoint)
}

// ---------------------------------------------------------------------------
// Property specification handed to the model checker
// ---------------------------------------------------------------------------

/// Whether a property must hold for some or for all initial states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationType {
    #[default]
    ForSome,
    ForAll,
}

/// One named property annotation request for the external checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    pub description: String,
    pub formula: String,
    pub initial_states: String,
    pub verification_type: VerificationType,
    /// Components clamped to a value in every state, e.g. the drug input.
    pub fix: BTreeMap<String, u8>,
}

impl PropertySpec {
    pub fn from_series(name: &str, description: &str, series: TimeSeriesProperty) -> Self {
        PropertySpec {
            name: name.to_string(),
            description: description.to_string(),
            formula: series.formula,
            initial_states: series.initial_state,
            verification_type: VerificationType::ForSome,
            fix: BTreeMap::new(),
        }
    }

    /// Clamp `component` to `value`.
    pub fn with_fixed(mut self, component: &str, value: u8) -> Self {
        self.fix.insert(component.to_string(), value);
        self
    }
}

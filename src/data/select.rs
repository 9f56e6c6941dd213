use super::model::{FeatureMatrix, MeasurementTable};
use crate::error::{DiscretizeError, Result};

// ---------------------------------------------------------------------------
// Feature selection: keep a named subset of species, in the requested order
// ---------------------------------------------------------------------------

/// Return the column positions of `names` within `features`.
pub fn feature_positions(features: &[String], names: &[String]) -> Result<Vec<usize>> {
    names
        .iter()
        .map(|name| {
            features
                .iter()
                .position(|f| f == name)
                .ok_or_else(|| DiscretizeError::UnknownFeature(name.clone()))
        })
        .collect()
}

/// Restrict a table to the named features.
///
/// The result's columns follow the order of `names`, not the source header,
/// so two conditions selected with the same list always line up.
pub fn select_features(table: &MeasurementTable, names: &[String]) -> Result<MeasurementTable> {
    let positions = feature_positions(&table.features, names)?;
    let rows = table
        .matrix
        .rows()
        .iter()
        .map(|row| positions.iter().map(|&j| row[j]).collect())
        .collect();

    Ok(MeasurementTable {
        index_name: table.index_name.clone(),
        time_index: table.time_index.clone(),
        features: names.to_vec(),
        matrix: FeatureMatrix::new(rows, positions.len())?,
    })
}

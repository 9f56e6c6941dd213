//! Run configuration: one condition pair, or a batch of them from JSON.
//!
//! ```json
//! {
//!   "pairs": [
//!     { "treated": "Bp1851Sora.csv", "untreated": "Bp1851DMSO.csv", "method": "median" },
//!     { "treated": "Bp1257Sora.csv", "untreated": "Bp1257DMSO.csv",
//!       "species": ["Erk", "EGFR", "mTor", "Akt"], "drug": "Sora" }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discretize::Method;
use crate::error::{DiscretizeError, Result};
use crate::output::{normalized_path, output_path, HeaderStyle};

fn default_prefix() -> String {
    "Dis".to_string()
}

/// Everything needed to discretize one treated/untreated pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairConfig {
    pub treated: PathBuf,
    pub untreated: PathBuf,
    #[serde(default)]
    pub method: Method,
    /// Directory for the output files; defaults to each input's directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub header_style: HeaderStyle,
    /// Restrict discretization to these species, in this order.
    #[serde(default)]
    pub species: Option<Vec<String>>,
    /// Drug component clamped to 1 (treated) / 0 (untreated) in properties.
    #[serde(default)]
    pub drug: Option<String>,
    /// Write model-checker property specifications to this JSON file.
    #[serde(default)]
    pub properties: Option<PathBuf>,
}

impl PairConfig {
    pub fn new(treated: impl Into<PathBuf>, untreated: impl Into<PathBuf>, method: Method) -> Self {
        PairConfig {
            treated: treated.into(),
            untreated: untreated.into(),
            method,
            output_dir: None,
            prefix: default_prefix(),
            header_style: HeaderStyle::default(),
            species: None,
            drug: None,
            properties: None,
        }
    }

    /// `(treated, untreated)` output file paths.
    pub fn output_paths(&self) -> Result<(PathBuf, PathBuf)> {
        let dir = self.output_dir.as_deref();
        Ok((
            output_path(&self.treated, dir, &self.prefix)?,
            output_path(&self.untreated, dir, &self.prefix)?,
        ))
    }

    /// Every file the pair job writes: both outputs and the property file.
    pub fn written_paths(&self) -> Result<Vec<PathBuf>> {
        let (treated, untreated) = self.output_paths()?;
        let mut paths = vec![treated, untreated];
        paths.extend(self.properties.iter().cloned());
        Ok(paths)
    }

    /// Check the pair before anything is read or written.  The files it
    /// writes must be distinct from each other and from both inputs.
    pub fn validate(&self) -> Result<()> {
        let inputs = [normalized_path(&self.treated), normalized_path(&self.untreated)];
        if inputs[0] == inputs[1] {
            return Err(DiscretizeError::Config(format!(
                "treated and untreated inputs are the same file '{}'",
                self.treated.display()
            )));
        }
        if let Some(species) = &self.species {
            if species.is_empty() {
                return Err(DiscretizeError::Config("species list is empty".to_string()));
            }
        }

        let mut written = BTreeSet::new();
        for path in self.written_paths()? {
            let key = normalized_path(&path);
            if inputs.contains(&key) {
                return Err(DiscretizeError::Config(format!(
                    "output '{}' would overwrite an input",
                    path.display()
                )));
            }
            if !written.insert(key) {
                return Err(DiscretizeError::Config(format!(
                    "two outputs of the pair resolve to '{}'",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// A list of independent pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub pairs: Vec<PairConfig>,
}

impl BatchConfig {
    /// Parse and validate a batch configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: BatchConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a batch configuration file.  Relative input, output and property
    /// paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DiscretizeError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: BatchConfig = serde_json::from_str(&text)?;
        if let Some(base) = path.parent() {
            for pair in &mut config.pairs {
                pair.treated = base.join(&pair.treated);
                pair.untreated = base.join(&pair.untreated);
                pair.output_dir = pair.output_dir.as_ref().map(|d| base.join(d));
                pair.properties = pair.properties.as_ref().map(|p| base.join(p));
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate every pair, then require that no two pairs write the same
    /// file and that no pair writes a file another pair reads.
    pub fn validate(&self) -> Result<()> {
        let mut writers: BTreeMap<PathBuf, usize> = BTreeMap::new();
        for (i, pair) in self.pairs.iter().enumerate() {
            pair.validate().map_err(|e| match e {
                DiscretizeError::Config(msg) => DiscretizeError::Config(format!("pair {i}: {msg}")),
                other => other,
            })?;
            for path in pair.written_paths()? {
                if let Some(j) = writers.insert(normalized_path(&path), i) {
                    return Err(DiscretizeError::Config(format!(
                        "pairs {j} and {i} both write '{}'",
                        path.display()
                    )));
                }
            }
        }
        for (i, pair) in self.pairs.iter().enumerate() {
            for input in [&pair.treated, &pair.untreated] {
                if let Some(j) = writers.get(&normalized_path(input)) {
                    return Err(DiscretizeError::Config(format!(
                        "pair {j} writes '{}', which pair {i} reads",
                        input.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let c = BatchConfig::from_json(r#"{"pairs":[{"treated":"a.csv","untreated":"b.csv"}]}"#)
            .unwrap();
        let p = &c.pairs[0];
        assert_eq!(p.method, Method::Median);
        assert_eq!(p.prefix, "Dis");
        assert_eq!(p.header_style, HeaderStyle::Mixed);
        assert!(p.species.is_none());
    }

    #[test]
    fn explicit_fields_are_read() {
        let c = BatchConfig::from_json(
            r#"{"pairs":[{"treated":"a.csv","untreated":"b.csv","method":"mean",
                "header_style":"tab","species":["Erk","Akt"],"drug":"Sora"}]}"#,
        )
        .unwrap();
        let p = &c.pairs[0];
        assert_eq!(p.method, Method::Mean);
        assert_eq!(p.header_style, HeaderStyle::Tab);
        assert_eq!(p.species.as_deref(), Some(&["Erk".to_string(), "Akt".to_string()][..]));
        assert_eq!(p.drug.as_deref(), Some("Sora"));
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = BatchConfig::from_json(
            r#"{"pairs":[{"treated":"a.csv","untreated":"b.csv","method":"mode"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DiscretizeError::Json(_)));
    }

    #[test]
    fn same_input_twice_is_rejected() {
        let p = PairConfig::new("a.csv", "a.csv", Method::Mean);
        assert!(matches!(p.validate(), Err(DiscretizeError::Config(_))));
    }

    #[test]
    fn empty_prefix_needs_output_dir() {
        let mut p = PairConfig::new("a.csv", "b.csv", Method::Mean);
        p.prefix.clear();
        assert!(p.validate().is_err());
        p.output_dir = Some(PathBuf::from("out"));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn outputs_sharing_a_name_are_rejected() {
        let mut p = PairConfig::new("rep1/Bp.csv", "rep2/Bp.csv", Method::Mean);
        assert!(p.validate().is_ok());
        p.output_dir = Some(PathBuf::from("out"));
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("two outputs of the pair"));
    }

    #[test]
    fn empty_prefix_into_input_dir_is_rejected() {
        let mut p = PairConfig::new("data/a.csv", "data/b.csv", Method::Mean);
        p.prefix.clear();
        p.output_dir = Some(PathBuf::from("data/."));
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("would overwrite an input"));
    }

    #[test]
    fn property_file_cannot_replace_an_output() {
        let mut p = PairConfig::new("a.csv", "b.csv", Method::Mean);
        p.properties = Some(PathBuf::from("Disa.csv"));
        assert!(matches!(p.validate(), Err(DiscretizeError::Config(_))));
    }

    #[test]
    fn batch_pairs_sharing_an_output_are_rejected() {
        let err = BatchConfig::from_json(
            r#"{"pairs":[{"treated":"Sora.csv","untreated":"DMSO.csv"},
                         {"treated":"Sora.csv","untreated":"DMSO2.csv"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("pairs 0 and 1 both write"));
    }

    #[test]
    fn batch_pair_reading_another_pairs_output_is_rejected() {
        let err = BatchConfig::from_json(
            r#"{"pairs":[{"treated":"a.csv","untreated":"b.csv"},
                         {"treated":"Disa.csv","untreated":"c.csv"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("which pair 1 reads"));
    }
}

//! Pipeline configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::series::{NationalPolicy, StatePolicy, YearOverride};

/// Name of the configuration file looked up in the project root
pub const DEFAULT_CONFIG_FILE: &str = "energyprep.toml";

/// Main pipeline configuration.
///
/// Every field has a default, so an absent file or section means the
/// built-in extraction settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub energy: EnergyPaths,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub national: NationalConfig,
    #[serde(default)]
    pub petroleum: PetroleumPaths,
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Explicit file if given, else `energyprep.toml` under `root` if present,
    /// else defaults
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let default_path = root.join(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check settings that would otherwise produce an empty or ambiguous run
    pub fn validate(&self) -> Result<()> {
        if self.national.sheet.trim().is_empty() {
            anyhow::bail!("Configuration error: national.sheet must not be empty");
        }
        if self.state.series_code.trim().is_empty() {
            anyhow::bail!("Configuration error: state.series_code must not be empty");
        }

        let mut seen = HashSet::new();
        for ov in &self.national.overrides {
            if !seen.insert(ov.year) {
                anyhow::bail!(
                    "Configuration error: duplicate override for year {} in national.overrides",
                    ov.year
                );
            }
            if !ov.value.is_finite() {
                anyhow::bail!(
                    "Configuration error: override for year {} is not a finite number",
                    ov.year
                );
            }
        }

        Ok(())
    }

    pub fn state_policy(&self) -> StatePolicy {
        StatePolicy {
            series_code: self.state.series_code.clone(),
            min_year: self.state.min_year,
        }
    }

    pub fn national_policy(&self) -> NationalPolicy {
        NationalPolicy {
            min_year: self.national.min_year,
            value_column: self.national.value_column,
        }
    }
}

/// Inputs and output of the energy data generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyPaths {
    pub seds_csv: PathBuf,
    pub workbook: PathBuf,
    pub output: PathBuf,
}

impl Default for EnergyPaths {
    fn default() -> Self {
        Self {
            seds_csv: PathBuf::from("src/data/Complete_SEDS.csv"),
            workbook: PathBuf::from("src/data/Table_1.1_Primary_Energy_Overview.xlsx"),
            output: PathBuf::from("src/data/energyData.js"),
        }
    }
}

/// State series extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    pub series_code: String,
    pub min_year: i32,
}

impl Default for StateConfig {
    fn default() -> Self {
        let policy = StatePolicy::default();
        Self {
            series_code: policy.series_code,
            min_year: policy.min_year,
        }
    }
}

/// National series extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalConfig {
    /// Sheet holding the annual rows
    pub sheet: String,
    pub value_column: usize,
    pub min_year: i32,
    /// Curated values for years missing from the workbook
    pub overrides: Vec<YearOverride>,
}

impl Default for NationalConfig {
    fn default() -> Self {
        let policy = NationalPolicy::default();
        Self {
            sheet: "Annual Data".to_string(),
            value_column: policy.value_column,
            min_year: policy.min_year,
            overrides: vec![YearOverride {
                year: 2025,
                value: 56.270816,
            }],
        }
    }
}

/// Input and output of the petroleum share generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetroleumPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for PetroleumPaths {
    fn default() -> Self {
        Self {
            input: PathBuf::from("src/data/petroleum_shares_raw.csv"),
            output: PathBuf::from("src/data/petroleumShares.js"),
        }
    }
}

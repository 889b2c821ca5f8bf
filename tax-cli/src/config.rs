//! TOML configuration for the command-line front end.
//!
//! ```toml
//! log_level = "debug"
//! brackets_csv = "brackets.csv"   # relative to this file
//!
//! [display]
//! currency_symbol = "Rs "
//! show_breakdown = false
//!
//! [policy]
//! default_standard_deduction = 60000
//!
//! [policy.credits]
//! education_cap = 40000
//! ```
//!
//! Every key is optional. The `[policy]` table overlays the built-in rules.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tax_core::{PolicyError, TaxPolicy};
use tax_data::{BracketTableLoader, BracketTableLoaderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid tax policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("cannot load bracket table: {0}")]
    Brackets(#[from] BracketTableLoaderError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    /// Print the per-band table under each estimate.
    pub show_breakdown: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            show_breakdown: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    /// CSV of bracket rows installed on top of `policy`.
    pub brackets_csv: Option<PathBuf>,
    pub display: DisplayConfig,
    pub policy: TaxPolicy,
}

impl AppConfig {
    /// Parses TOML text and validates the policy it describes. A
    /// `brackets_csv` entry is not loaded here; see [`AppConfig::load`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.policy.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`, resolves relative paths against its
    /// directory and installs any bracket CSV it names.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.brackets_csv = config.brackets_csv.map(|p| base.join(p));
        config.log_file = config.log_file.map(|p| base.join(p));

        if let Some(csv_path) = config.brackets_csv.clone() {
            config.install_brackets(&csv_path)?;
        }

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads a bracket CSV into the policy, replacing the tables it names.
    pub fn install_brackets(
        &mut self,
        csv_path: &Path,
    ) -> Result<usize, ConfigError> {
        let file = std::fs::File::open(csv_path).map_err(|source| ConfigError::Io {
            path: csv_path.to_path_buf(),
            source,
        })?;
        let records = BracketTableLoader::parse(file)?;
        Ok(BracketTableLoader::apply(&mut self.policy, &records)?)
    }
}

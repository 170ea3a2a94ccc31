//! Configuration management and validation.
//!
//! [`ExtractionConfig`] is built in layers: built-in defaults, an optional
//! JSON file, then command-line overrides. The result is validated once
//! before any file is touched.

use crate::constants::{
    DEFAULT_DATASET_SEPARATOR, DEFAULT_DATASETS_ROOT, DEFAULT_MASTER_SEPARATOR,
};
use crate::error::{FeatureError, Result};
use crate::io::separator_byte;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for a feature extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Separator of the master feature table
    pub master_separator: char,

    /// Separator of the raw per-file datasets
    pub dataset_separator: char,

    /// Directory holding `<domain>/<file>` datasets
    pub datasets_root: PathBuf,

    /// Maximum concurrent file processing
    pub max_concurrent_files: usize,

    /// Write unit-normalized datasets back over the originals
    pub persist_normalized: bool,

    /// Run the unit normalizer before computing features
    pub normalize_units: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            master_separator: DEFAULT_MASTER_SEPARATOR,
            dataset_separator: DEFAULT_DATASET_SEPARATOR,
            datasets_root: PathBuf::from(DEFAULT_DATASETS_ROOT),
            max_concurrent_files: num_cpus::get(),
            persist_normalized: false,
            normalize_units: true,
        }
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub datasets_root: Option<PathBuf>,
    pub max_concurrent_files: Option<usize>,
    pub persist_normalized: bool,
}

impl ExtractionConfig {
    /// Load defaults, then `file` if given, then `overrides`, and validate
    pub fn load_layered(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(root) = &overrides.datasets_root {
            config.datasets_root = root.clone();
        }
        if let Some(max_files) = overrides.max_concurrent_files {
            config.max_concurrent_files = max_files;
        }
        if overrides.persist_normalized {
            config.persist_normalized = true;
        }

        config.validate()?;
        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| FeatureError::Configuration {
            message: format!("invalid config file {}: {}", path.display(), e),
        })
    }

    /// Reject settings that cannot drive a run
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(FeatureError::Configuration {
                message: "max_concurrent_files must be at least 1".to_string(),
            });
        }
        separator_byte(self.master_separator)?;
        separator_byte(self.dataset_separator)?;
        Ok(())
    }

    /// Master table separator as a byte
    pub fn master_separator_byte(&self) -> Result<u8> {
        separator_byte(self.master_separator)
    }

    /// Dataset separator as a byte
    pub fn dataset_separator_byte(&self) -> Result<u8> {
        separator_byte(self.dataset_separator)
    }

    /// Path of a dataset named in the master table
    pub fn dataset_path(&self, domain: &str, file_name: &str) -> PathBuf {
        self.datasets_root.join(domain).join(file_name)
    }

    /// Set the datasets root directory
    pub fn with_datasets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.datasets_root = root.into();
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    /// Enable writing normalized datasets back to disk
    pub fn with_persist_normalized(mut self) -> Self {
        self.persist_normalized = true;
        self
    }

    /// Skip the unit normalizer
    pub fn without_unit_normalization(mut self) -> Self {
        self.normalize_units = false;
        self
    }

    /// Set the master table separator
    pub fn with_master_separator(mut self, separator: char) -> Self {
        self.master_separator = separator;
        self
    }

    /// Set the dataset separator
    pub fn with_dataset_separator(mut self, separator: char) -> Self {
        self.dataset_separator = separator;
        self
    }
}

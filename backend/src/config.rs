//! # Advent Configuration
//!
//! Settings are read from a single YAML file, created with defaults the
//! first time it is loaded:
//!
//! ```yaml
//! season_end: 2025-12-25
//! voucher_milestones: [3, 13, 23, 33, 43, 53, 63, 73, 83, 94]
//! storage:
//!   backend: csv
//!   data_directory: advent_data
//! ```
//!
//! `ADVENT_DATA_DIR` overrides the csv data directory.

use anyhow::Context;
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AdventError, AdventResult, DEFAULT_VOUCHER_MILESTONES};

pub const DATA_DIR_ENV: &str = "ADVENT_DATA_DIR";
pub const DEFAULT_DATA_DIRECTORY: &str = "advent_data";

/// Which storage backend to open at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Process-local, lost on exit
    Memory,
    /// CSV and YAML files in a data directory
    Csv { data_directory: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Csv {
            data_directory: PathBuf::from(DEFAULT_DATA_DIRECTORY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventConfig {
    /// Last day of the season; `days_left` counts towards it
    #[serde(default = "default_season_end")]
    pub season_end: NaiveDate,
    /// Total-star thresholds that each unlock one draw
    #[serde(default = "default_voucher_milestones")]
    pub voucher_milestones: Vec<u32>,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_season_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 25).unwrap_or_default()
}

fn default_voucher_milestones() -> Vec<u32> {
    DEFAULT_VOUCHER_MILESTONES.to_vec()
}

impl Default for AdventConfig {
    fn default() -> Self {
        Self {
            season_end: default_season_end(),
            voucher_milestones: default_voucher_milestones(),
            storage: StorageConfig::default(),
        }
    }
}

impl AdventConfig {
    /// In-memory configuration, mostly for tests
    pub fn in_memory() -> Self {
        Self {
            storage: StorageConfig::Memory,
            ..Self::default()
        }
    }

    /// Milestones must be positive and strictly ascending.
    pub fn validate(&self) -> AdventResult<()> {
        if self.voucher_milestones.is_empty() {
            return Err(AdventError::InvalidConfig("voucher_milestones must not be empty".to_string()));
        }
        if self.voucher_milestones.contains(&0) {
            return Err(AdventError::InvalidConfig("voucher_milestones must be positive".to_string()));
        }
        if self.voucher_milestones.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(AdventError::InvalidConfig(
                "voucher_milestones must be strictly ascending".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml_content: &str) -> AdventResult<Self> {
        let config: AdventConfig = serde_yaml::from_str(yaml_content)
            .map_err(|e| AdventError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, creating the default if it doesn't exist.
    ///
    /// Environment overrides are applied after loading.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> AdventResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let yaml_content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config = Self::from_yaml(&yaml_content)?;
            debug!("Loaded advent config from {:?}", path);
            config
        } else {
            let config = Self::default();
            config.save(path)?;
            info!("Created default advent config at {:?}", path);
            config
        };

        config.apply_data_directory_override(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from));
        Ok(config)
    }

    /// Write config atomically (temp file + rename)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> AdventResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let yaml_content = serde_yaml::to_string(self).context("Failed to serialise advent config")?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path).with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Saved advent config to {:?}", path);
        Ok(())
    }

    /// Point csv storage at `directory`, if given. A memory backend is left alone.
    pub fn apply_data_directory_override(&mut self, directory: Option<PathBuf>) {
        let Some(directory) = directory else {
            return;
        };
        if let StorageConfig::Csv { data_directory } = &mut self.storage {
            info!("Using data directory {:?} from {}", directory, DATA_DIR_ENV);
            *data_directory = directory;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("advent.yaml");

        let config = AdventConfig::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.voucher_milestones, DEFAULT_VOUCHER_MILESTONES.to_vec());
        assert_eq!(config.season_end, NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());

        let reloaded = AdventConfig::load_or_create(&path).unwrap();
        assert_eq!(reloaded.voucher_milestones, config.voucher_milestones);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = AdventConfig::from_yaml("storage:\n  backend: memory\n").unwrap();
        assert_eq!(config.storage, StorageConfig::Memory);
        assert_eq!(config.voucher_milestones.len(), 10);

        let config = AdventConfig::from_yaml(
            "season_end: 2026-12-24\nvoucher_milestones: [2, 5]\nstorage:\n  backend: csv\n  data_directory: /tmp/advent\n",
        )
        .unwrap();
        assert_eq!(config.season_end, NaiveDate::from_ymd_opt(2026, 12, 24).unwrap());
        assert_eq!(
            config.storage,
            StorageConfig::Csv {
                data_directory: PathBuf::from("/tmp/advent")
            }
        );
    }

    #[test]
    fn test_invalid_milestones_are_rejected() {
        for yaml in [
            "voucher_milestones: []\n",
            "voucher_milestones: [0, 3]\n",
            "voucher_milestones: [3, 3, 13]\n",
            "voucher_milestones: [13, 3]\n",
        ] {
            let err = AdventConfig::from_yaml(yaml).unwrap_err();
            assert!(err.is_configuration_error(), "{yaml} should be rejected");
        }
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let err = AdventConfig::from_yaml("storage:\n  backend: spreadsheet\n").unwrap_err();
        assert!(matches!(err, AdventError::InvalidConfig(_)));
    }

    #[test]
    fn test_data_directory_override() {
        let mut config = AdventConfig::default();
        config.apply_data_directory_override(Some(PathBuf::from("/srv/advent")));
        assert_eq!(
            config.storage,
            StorageConfig::Csv {
                data_directory: PathBuf::from("/srv/advent")
            }
        );

        let mut memory = AdventConfig::in_memory();
        memory.apply_data_directory_override(Some(PathBuf::from("/srv/advent")));
        assert_eq!(memory.storage, StorageConfig::Memory);
    }
}

//! Configuration for expert-templates

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::merge::MergeOptions;
use crate::stamp::DEFAULT_OPTIMIZED_BY;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "expert-templates.yml";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Catalog to update in place
    pub catalog: PathBuf,

    /// Optimization source to merge from
    pub source: PathBuf,

    /// Expert keys to consider, in processing order
    pub experts: Vec<String>,

    /// Cap on each updated industry's template list
    pub max_templates: usize,

    /// Version written to the catalog
    pub version: String,

    /// `optimizationInfo.optimizedBy` value
    pub optimized_by: String,

    /// Replace the catalog through a temporary file and rename
    pub atomic_write: bool,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("data/templates-2025.json"),
            source: PathBuf::from("optimized-expert-prompts.json"),
            experts: crate::DEFAULT_EXPERTS.iter().map(|s| s.to_string()).collect(),
            max_templates: crate::DEFAULT_MAX_TEMPLATES,
            version: crate::DEFAULT_VERSION.to_string(),
            optimized_by: DEFAULT_OPTIMIZED_BY.to_string(),
            atomic_write: true,
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Explicit path, then `./expert-templates.yml`, then
    /// `~/.config/expert-templates/config.yml`, then defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("expert-templates").join("config.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject settings the merge cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_templates == 0 {
            return Err(eyre!("max-templates must be at least 1"));
        }
        if self.experts.iter().any(|e| e.trim().is_empty()) {
            return Err(eyre!("experts must not contain empty keys"));
        }
        Ok(())
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            experts: self.experts.clone(),
            max_templates: self.max_templates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.experts, ["teacher", "lawyer", "accountant", "realtor", "insurance"]);
        assert_eq!(config.max_templates, 10);
        assert_eq!(config.version, "2025.2-optimized");
        assert!(config.atomic_write);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_yaml_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(
            &path,
            "catalog: /srv/data/templates.json\nexperts: [lawyer]\nmax-templates: 5\natomic-write: false\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.catalog, PathBuf::from("/srv/data/templates.json"));
        assert_eq!(config.experts, ["lawyer"]);
        assert_eq!(config.max_templates, 5);
        assert!(!config.atomic_write);
        assert_eq!(config.source, Config::default().source);
    }

    #[test]
    fn test_load_rejects_zero_cap() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "max-templates: 0\n").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_merge_options_follow_config() {
        let config = Config {
            experts: vec!["realtor".to_string()],
            max_templates: 3,
            ..Default::default()
        };
        let options = config.merge_options();
        assert_eq!(options.experts, ["realtor"]);
        assert_eq!(options.max_templates, 3);
    }
}

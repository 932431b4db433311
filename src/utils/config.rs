use crate::api::FormatRules;
use crate::core::Ellipsoid;
use crate::position::LoadPolicy;
use crate::validation::{check_ellipsoid, check_rounding, CoordinateError, CoordinateResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Defaults applied to newly built positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CoordinateConfig {
    /// Rendering rules for position text
    pub format_rules: FormatRules,
    /// Which derived representations recompute eagerly
    pub load_policy: LoadPolicy,
    /// Reference ellipsoid (defaults to WGS84)
    pub ellipsoid: Ellipsoid,
}

impl CoordinateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format_rules(mut self, format_rules: FormatRules) -> Self {
        self.format_rules = format_rules;
        self
    }

    pub fn with_load_policy(mut self, load_policy: LoadPolicy) -> Self {
        self.load_policy = load_policy;
        self
    }

    pub fn with_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }
}

/// Loads, validates and saves a [`CoordinateConfig`] as JSON
#[derive(Debug, Clone, Default)]
pub struct ConfigurationManager {
    config: CoordinateConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoordinateResult<Self> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &CoordinateConfig {
        &self.config
    }

    /// Replace the whole configuration after validating it
    pub fn update_config(&mut self, config: CoordinateConfig) -> CoordinateResult<()> {
        Self::validate(&config)?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    pub fn set_format_rules(&mut self, format_rules: FormatRules) -> CoordinateResult<()> {
        self.update_config(self.config.with_format_rules(format_rules))
    }

    pub fn set_load_policy(&mut self, load_policy: LoadPolicy) {
        self.config.load_policy = load_policy;
        self.is_modified = true;
    }

    pub fn set_ellipsoid(&mut self, ellipsoid: Ellipsoid) -> CoordinateResult<()> {
        self.update_config(self.config.with_ellipsoid(ellipsoid))
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> CoordinateResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| {
            CoordinateError::config(format!("failed to read config file '{}': {}", path_str, e))
        })?;

        let config: CoordinateConfig = serde_json::from_str(&content).map_err(|e| {
            CoordinateError::config(format!("failed to parse config file '{}': {}", path_str, e))
        })?;

        // Validate before applying
        Self::validate(&config)?;

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        info!(path = %path.as_ref().display(), "configuration loaded");
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> CoordinateResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|e| CoordinateError::config(format!("failed to serialize config: {}", e)))?;

        fs::write(&path, content).map_err(|e| {
            CoordinateError::config(format!("failed to write config file '{}': {}", path_str, e))
        })?;

        debug!(path = %path_str, "configuration saved");
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> CoordinateResult<()> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(CoordinateError::config(
                "no file path set for saving configuration",
            )),
        }
    }

    /// Check if configuration has been modified since last load or save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Checks every value a position would reject
    pub fn validate(config: &CoordinateConfig) -> CoordinateResult<()> {
        check_ellipsoid(&config.ellipsoid)
            .and_then(|_| check_rounding(config.format_rules.rounding))
            .map_err(|e| CoordinateError::config(format!("invalid configuration: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FormatStyle;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CoordinateConfig::default();
        assert_eq!(config.ellipsoid, Ellipsoid::wgs84());
        assert_eq!(config.load_policy, LoadPolicy::eager());
        assert_eq!(config.format_rules, FormatRules::default());
        assert!(ConfigurationManager::validate(&config).is_ok());
    }

    #[test]
    fn test_configuration_manager_creation() {
        let manager = ConfigurationManager::new();
        assert!(!manager.is_modified());
        assert_eq!(manager.config(), &CoordinateConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("coordinates.json");

        let mut manager = ConfigurationManager::new();
        manager
            .set_format_rules(FormatRules::new(FormatStyle::Decimal).with_rounding(6))
            .unwrap();
        manager.set_load_policy(LoadPolicy::lazy().with_grid(true));
        assert!(manager.is_modified());

        manager.save_to_file(&path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(loaded.config(), manager.config());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let mut manager = ConfigurationManager::new();
        assert!(manager.set_ellipsoid(Ellipsoid::new(-1.0, 298.0)).is_err());
        assert!(manager
            .set_format_rules(FormatRules::default().with_rounding(20))
            .is_err());
        assert!(!manager.is_modified());
    }

    #[test]
    fn test_load_rejects_invalid_ellipsoid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"ellipsoid":{"equatorial_radius":0.0,"inverse_flattening":298.257223563}}"#,
        )
        .unwrap();

        let err = ConfigurationManager::from_file(&path).unwrap_err();
        assert!(matches!(err, CoordinateError::Config { .. }));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"format_rules":{"style":"DegreeDecimalMinute"}}"#).unwrap();

        let manager = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(manager.config().format_rules.style, FormatStyle::DegreeDecimalMinute);
        assert_eq!(manager.config().ellipsoid, Ellipsoid::wgs84());
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut manager = ConfigurationManager::new();
        assert!(manager.save().is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = ConfigurationManager::from_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(CoordinateError::Config { .. })));
    }
}

use std::fs;
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use strata_types::{StrataError, StrataResult};

/// Engine settings loaded from TOML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Default `env_logger` filter; `RUST_LOG` takes precedence
    pub log_filter: String,

    /// Install a global logger during `Engine::init`
    pub install_logger: bool,

    /// Fail spot price queries above 1.0 instead of returning them
    pub reject_above_par: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            install_logger: true,
            reject_above_par: false,
        }
    }
}

impl EngineSettings {
    /// Load settings from a TOML file
    pub fn load(path: &str) -> StrataResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StrataError::invalid_configuration("settings", &format!("failed to read {}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> StrataResult<Self> {
        let settings: EngineSettings = toml::from_str(content).map_err(|e| {
            StrataError::invalid_configuration("settings", &format!("failed to parse: {}", e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to TOML text
    pub fn to_toml_string(&self) -> StrataResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            StrataError::invalid_configuration("settings", &format!("failed to serialize: {}", e))
        })
    }

    /// Validate settings
    pub fn validate(&self) -> StrataResult<()> {
        let filter = self.log_filter.trim();
        if filter.is_empty() {
            return Err(StrataError::invalid_configuration("log_filter", "empty filter"));
        }

        // Directives are `level`, `module`, or `module=level`, optionally
        // followed by `/regex`
        let directives = filter.split('/').next().unwrap_or_default();
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            if let Some((module, level)) = directive.split_once('=') {
                if module.trim().is_empty() || LevelFilter::from_str(level.trim()).is_err() {
                    return Err(StrataError::invalid_configuration(
                        "log_filter",
                        &format!("invalid directive '{}'", directive),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_types::ErrorKind;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::from_toml_str("").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.log_filter, "info");
        assert!(settings.install_logger);
        assert!(!settings.reject_above_par);
    }

    #[test]
    fn test_from_toml() {
        let settings = EngineSettings::from_toml_str(
            r#"
            log_filter = "warn,strata_core=debug"
            install_logger = false
            reject_above_par = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.log_filter, "warn,strata_core=debug");
        assert!(!settings.install_logger);
        assert!(settings.reject_above_par);

        let round_trip = EngineSettings::from_toml_str(&settings.to_toml_string().unwrap()).unwrap();
        assert_eq!(round_trip, settings);
    }

    #[test]
    fn test_invalid_settings() {
        let err = EngineSettings::from_toml_str("log_filter = \"strata_core=loud\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);

        let err = EngineSettings::from_toml_str("log_filter = \"  \"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);

        let err = EngineSettings::from_toml_str("install_logger = \"yes\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineSettings::load("/nonexistent/strata.toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }
}

//! Data-access configuration.
//!
//! Loaded from a TOML file, then overridden from the environment:
//!
//! ```toml
//! data_dir = "/srv/protocol-data"
//! components_file = "components.json"
//! log_level = "debug"
//! pretty_output = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{DataError, DataResult};

pub const ENV_DATA_DIR: &str = "SYNERGY_DOSING_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "SYNERGY_DOSING_LOG_LEVEL";
pub const ENV_PRETTY: &str = "SYNERGY_DOSING_PRETTY";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Where reference data comes from and how output is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the JSON record sets; `None` uses the bundled seed data
    pub data_dir: Option<PathBuf>,
    pub components_file: String,
    pub interactions_file: String,
    pub stages_file: String,
    /// Optional; missing file means default CI labels
    pub ci_scale_file: String,
    pub log_level: String,
    pub pretty_output: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            components_file: "components.json".to_string(),
            interactions_file: "interactions.json".to_string(),
            stages_file: "stages.json".to_string(),
            ci_scale_file: "ci_scale.json".to_string(),
            log_level: "info".to_string(),
            pretty_output: true,
        }
    }
}

impl DataConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> DataResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then apply environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> DataResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: Self = toml::from_str(&content)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `SYNERGY_DOSING_*` variables.
    pub fn apply_env(&mut self) -> DataResult<()> {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            self.log_level = level.trim().to_lowercase();
        }

        if let Ok(val) = std::env::var(ENV_PRETTY) {
            self.pretty_output = parse_flag(ENV_PRETTY, &val)?;
        }

        Ok(())
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn validate(&self) -> DataResult<()> {
        let files = [
            ("components_file", &self.components_file),
            ("interactions_file", &self.interactions_file),
            ("stages_file", &self.stages_file),
            ("ci_scale_file", &self.ci_scale_file),
        ];
        for (field, value) in files {
            if value.trim().is_empty() {
                return Err(DataError::Config(format!("{field} must not be empty")));
            }
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(DataError::Config(format!(
                "unknown log level '{}', expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Full path of a record file inside the data directory.
    pub fn file_path(&self, file: &str) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(file))
    }
}

fn parse_flag(name: &str, value: &str) -> DataResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(DataError::Config(format!(
            "{name} must be true or false, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = DataConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.data_dir.is_none());
        assert!(config.file_path("components.json").is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DataConfig = toml::from_str(
            r#"
            data_dir = "/tmp/protocol"
            pretty_output = false
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/protocol")));
        assert!(!config.pretty_output);
        assert_eq!(config.stages_file, "stages.json");
        assert_eq!(
            config.file_path("stages.json"),
            Some(PathBuf::from("/tmp/protocol/stages.json"))
        );
    }

    #[test]
    fn test_rejects_empty_file_name() {
        let config = DataConfig {
            stages_file: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DataError::Config(msg)) if msg.contains("stages_file")));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let config = DataConfig {
            log_level: "loud".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DataError::Config(_))));
    }

    #[test]
    fn test_flag_values() {
        assert!(parse_flag(ENV_PRETTY, " Yes ").unwrap());
        assert!(!parse_flag(ENV_PRETTY, "0").unwrap());
        assert!(matches!(
            parse_flag(ENV_PRETTY, "maybe"),
            Err(DataError::Config(msg)) if msg.contains(ENV_PRETTY) && msg.contains("maybe")
        ));
    }
}

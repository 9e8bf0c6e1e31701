//! Reference data access for the synergy-dosing calculator.
//!
//! Reads the component, interaction and stage record sets (plus the optional
//! CI label scale) from JSON, validates them, and builds the immutable
//! [`ReferenceData`] the core engines compute against.
//!
//! ```rust,ignore
//! use synergy_dosing_data::{DataConfig, ReferenceLoader};
//!
//! let config = DataConfig::from_env()?;
//! let reference = ReferenceLoader::new(&config).load()?;
//! let calculator = synergy_dosing_core::Calculator::with_reference(reference);
//! ```

pub mod bundled;
pub mod config;
pub mod loader;
pub mod validation;

pub use config::DataConfig;
pub use loader::{resolve_pair_key, ReferenceLoader, ReferenceSources};

use synergy_dosing_core::reference::ReferenceData;
use synergy_dosing_core::DosingError;
use thiserror::Error;

/// Data-access errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Reference data failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] DosingError),
}

pub type DataResult<T> = Result<T, DataError>;

/// Load reference data as configured.
pub fn load_reference(config: &DataConfig) -> DataResult<ReferenceData> {
    ReferenceLoader::new(config).load()
}

//! Dispatch configuration: matching tunables plus the rate card.
//!
//! Loaded from a JSON file. Every section is optional and falls back to
//! defaults; whatever is present is validated before it is handed out.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::matching::MatchingConfig;
use crate::pricing::RateCard;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub matching: MatchingConfig,
    pub rates: RateCard,
}

impl DispatchConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            services = config.rates.services().count(),
            "loaded dispatch config"
        );
        Ok(config)
    }

    /// Parse and validate. Rate tables validate while deserializing.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: DispatchConfig = serde_json::from_str(raw).map_err(|error| {
            warn!(%error, "rejected dispatch config");
            ConfigError::Parse(error)
        })?;
        config.matching.validate().map_err(|error| {
            warn!(%error, "rejected matching config");
            error
        })?;
        Ok(config)
    }
}

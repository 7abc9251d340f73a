//! Configuration
//!
//! Layered configuration built with the `config` crate. Sources, lowest
//! precedence first: built-in defaults, the global file
//! (`$XDG_CONFIG_HOME/csum/config.toml`), an explicit `--config` file, and
//! `CSUM__<SECTION>__<KEY>` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::report::ReportConfig;
use crate::tree::WalkerConfig;
use serde::{Deserialize, Serialize};

/// Effective csum configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsumConfig {
    #[serde(default)]
    pub walker: WalkerConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CsumConfig {
    /// Render as TOML, the format config files are written in.
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render configuration: {}", e)))
    }
}

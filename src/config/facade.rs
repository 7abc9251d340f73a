//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::CsumConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the standard sources, plus `explicit` when given.
    pub fn load(explicit: Option<&Path>) -> Result<CsumConfig, ConfigError> {
        MergeService::load(explicit)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<CsumConfig, ConfigError> {
        MergeService::load_layers(None, Some(path))
    }

    /// Create default configuration.
    pub fn default() -> CsumConfig {
        CsumConfig::default()
    }
}

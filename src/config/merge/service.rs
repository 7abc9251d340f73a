//! MergeService: orchestrates sources, applies merge policy, deserializes to CsumConfig.

use crate::config::paths::xdg_root;
use crate::config::sources::{environment, explicit_file, global_file};
use crate::config::CsumConfig;
use config::ConfigError;
use std::path::Path;
use tracing::debug;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the standard sources.
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<CsumConfig, ConfigError> {
        let global = xdg_root::global_config_path();
        Self::load_layers(global.as_deref(), explicit)
    }

    /// Load with the global file location supplied by the caller.
    pub fn load_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<CsumConfig, ConfigError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        if let Some(path) = global {
            debug!(path = %path.display(), "Global config layer");
            builder = global_file::add_to_builder(builder, path)?;
        }
        if let Some(path) = explicit {
            debug!(path = %path.display(), "Explicit config layer");
            builder = explicit_file::add_to_builder(builder, path)?;
        }
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}

//! Built-in defaults, the lowest layer of every merge.

use crate::report::ReportFormat;
use crate::tree::ChecksumAlgorithm;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

/// Start a builder seeded with the built-in defaults.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("walker.include_special_files", false)?
        .set_default("walker.follow_symlinks", false)?
        .set_default("walker.algorithm", ChecksumAlgorithm::default().name())?
        .set_default("report.color", true)?
        .set_default("report.format", ReportFormat::default().name())?
        .set_default("logging.enabled", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}

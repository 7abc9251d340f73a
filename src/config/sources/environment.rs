//! Environment variable source: CSUM__ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `CSUM__REPORT__FORMAT=json` sets `report.format`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("CSUM")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}

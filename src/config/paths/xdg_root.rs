//! XDG Base Directory locations for csum's own files.

use std::path::PathBuf;

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise the platform config directory
/// (`$HOME/.config` on Linux).
pub fn config_home() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Some(PathBuf::from(xdg_config_home));
        }
    }
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns `$XDG_CONFIG_HOME/csum/config.toml`
pub fn global_config_path() -> Option<PathBuf> {
    config_home().map(|home| home.join("csum").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_config_lives_under_csum() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("csum/config.toml"));
        }
    }
}

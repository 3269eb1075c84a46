//! Default values shared across commands.

use std::path::PathBuf;

/// File name of the global configuration in the home directory.
pub const GLOBAL_CONFIG_FILENAME: &str = ".prideconfig";

/// Environment variable overriding the global configuration path.
pub const GLOBAL_CONFIG_ENV: &str = "PRIDE_GLOBAL_CONFIG";

/// Returns the default global configuration file.
///
/// This is `~/.prideconfig`, falling back to `.prideconfig` in the current
/// directory when the home directory cannot be determined. It can be
/// overridden by the `--global-config` flag or the `PRIDE_GLOBAL_CONFIG`
/// environment variable.
pub fn default_global_config() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(GLOBAL_CONFIG_FILENAME)
}

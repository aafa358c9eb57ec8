//! User config file source: $XDG_CONFIG_HOME/cmdloop/config.toml or ~/.config/cmdloop/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use std::path::PathBuf;
use tracing::debug;

/// Path to the user-level config file.
pub fn global_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("cmdloop").join("config.toml"));
        }
    }
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("cmdloop")
            .join("config.toml")
    })
}

/// Add the user config file to the builder if it exists.
pub fn add_to_builder(mut builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    if let Some(path) = global_config_path() {
        if path.exists() {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        } else {
            debug!(config_path = %path.display(), "No user configuration file");
        }
    }
    builder
}

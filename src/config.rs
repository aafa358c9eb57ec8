//! Configuration System
//!
//! Layered configuration for the command loop: built-in defaults, the user
//! config file, workspace config files, then `CMDLOOP_*` environment
//! variables. Registry contents are not configuration; handlers are registered
//! in code before a run.

use crate::action::DEFAULT_ERROR_LOG;
use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge {
    pub mod merge_policy;
}

mod sources {
    pub mod global_file;
}

pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmdLoopConfig {
    /// File appended to by [`crate::action::LogToFile::from_config`]
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Profile used when `CMDLOOP_ENV` is unset
const DEFAULT_PROFILE: &str = "development";

fn default_error_log() -> PathBuf {
    PathBuf::from(DEFAULT_ERROR_LOG)
}

impl Default for CmdLoopConfig {
    fn default() -> Self {
        Self {
            error_log: default_error_log(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CmdLoopConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.error_log.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "Error log path cannot be empty".to_string(),
            ));
        }
        self.logging.validate().map_err(ConfigError::Invalid)
    }

    /// Write the configuration as TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let rendered = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, rendered)?;
        Ok(())
    }
}

/// Loads [`CmdLoopConfig`] from all sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, user config file,
    /// `<root>/config/config.toml`, `<root>/config/{CMDLOOP_ENV}.toml`,
    /// environment (`CMDLOOP_ERROR_LOG`, `CMDLOOP_LOGGING__LEVEL`, ...).
    pub fn load(workspace_root: &Path) -> Result<CmdLoopConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder);
        let builder = Self::add_workspace_files(builder, workspace_root);
        let builder = builder.add_source(
            Environment::with_prefix("CMDLOOP")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: CmdLoopConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            workspace = %workspace_root.display(),
            error_log = %config.error_log.display(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Workspace files in the order they are layered. Only files that exist
    /// are returned.
    pub fn workspace_files(workspace_root: &Path) -> Vec<PathBuf> {
        let config_dir = workspace_root.join("config");
        let profile = std::env::var("CMDLOOP_ENV").unwrap_or_else(|_| DEFAULT_PROFILE.to_string());
        [
            config_dir.join("config.toml"),
            config_dir.join(format!("{}.toml", profile)),
        ]
        .into_iter()
        .filter(|path| path.is_file())
        .collect()
    }

    fn add_workspace_files(
        mut builder: ConfigBuilder<DefaultState>,
        workspace_root: &Path,
    ) -> ConfigBuilder<DefaultState> {
        for path in Self::workspace_files(workspace_root) {
            debug!(path = %path.display(), "Adding workspace config file");
            builder = builder.add_source(File::from(path.as_path()));
        }
        builder
    }

    /// Load a single TOML file on top of the defaults.
    pub fn load_from_file(path: &Path) -> Result<CmdLoopConfig, ConfigError> {
        let config: CmdLoopConfig = merge::merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

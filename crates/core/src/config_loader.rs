use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration from `config/Config.toml` and `IFRIT_` env vars.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads application configuration by layering built-in defaults, the TOML
    /// file at `path` (if present), and environment variables.
    ///
    /// Nested keys use a double underscore: `IFRIT_SERVER__PORT=9000`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment contain invalid values.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        tracing::debug!("Loading config from {}", path.display());

        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("IFRIT_").split("__"))
            .extract()?;

        Ok(config)
    }
}

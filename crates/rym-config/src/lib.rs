//! # rym-config
//!
//! Layered configuration loading for rym using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Command-line overrides ([`Overrides`])
//! 2. Environment variables (`RYM_*` prefix, `__` as separator)
//! 3. Project-level `rym.toml` (or the file passed with `--config`)
//! 4. User-level `~/.config/rym/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RYM_SERVER__PASSWORD` -> `server.password`,
//! `RYM_SYNC__PAGE_SIZE` -> `sync.page_size`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use rym_config::{Overrides, RymConfig};
//!
//! let config = RymConfig::load_with_dotenv(None, &Overrides::default()).expect("config");
//! if config.server.is_configured() {
//!     println!("mirroring {}", config.server.host());
//! }
//! ```

mod error;
mod server;
mod sync;

pub use error::ConfigError;
pub use server::ServerConfig;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILE: &str = "rym.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RymConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Values given on the command line. `None` leaves the layered value alone;
/// ignore rules are appended to the configured ones.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub domain: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub page_size: Option<u32>,
    pub max_concurrent: Option<usize>,
    pub ignore: Vec<String>,
}

impl RymConfig {
    /// Load configuration from all sources.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env`
    /// support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be read or a value
    /// has the wrong type.
    pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::figment(config_file, overrides)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(
        config_file: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(config_file, overrides)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on
    /// top.
    pub fn figment(config_file: Option<&Path>, overrides: &Overrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Explicit or project-local config
        match config_file {
            Some(path) => figment = figment.merge(Toml::file_exact(path)),
            None => {
                let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
                if local_path.exists() {
                    figment = figment.merge(Toml::file(local_path));
                }
            }
        }

        // Layer 3: Environment variables
        figment = figment.merge(Env::prefixed("RYM_").split("__"));

        // Layer 4: Command line
        overrides.apply(figment)
    }

    /// Validate the settings every networked command needs.
    ///
    /// # Errors
    ///
    /// Returns the first missing server field, out-of-range sync value, or
    /// malformed ignore rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sync.validate()?;
        self.server.require()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rym").join("config.toml"))
    }
}

impl Overrides {
    fn apply(&self, mut figment: Figment) -> Figment {
        if let Some(domain) = &self.domain {
            figment = figment.merge(("server.domain", domain));
        }
        if let Some(username) = &self.username {
            figment = figment.merge(("server.username", username));
        }
        if let Some(password) = &self.password {
            figment = figment.merge(("server.password", password));
        }
        if let Some(export_dir) = &self.export_dir {
            figment = figment.merge(("sync.export_dir", export_dir));
        }
        if let Some(page_size) = self.page_size {
            figment = figment.merge(("sync.page_size", page_size));
        }
        if let Some(max_concurrent) = self.max_concurrent {
            figment = figment.merge(("sync.max_concurrent", max_concurrent));
        }
        if !self.ignore.is_empty() {
            figment = figment.admerge(("sync.ignore", &self.ignore));
        }
        figment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_not_configured() {
        let config = RymConfig::default();
        assert!(!config.server.is_configured());
        assert_eq!(config.sync.page_size, 1000);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: RymConfig = RymConfig::figment(None, &Overrides::default()).extract()?;
            assert!(!config.server.is_configured());
            assert_eq!(config.sync.retry_attempts, 9);
            Ok(())
        });
    }

    #[test]
    fn validate_requires_server_fields() {
        let config = RymConfig::default();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Missing { .. }
        ));
    }
}

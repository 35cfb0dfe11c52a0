//! Chat server connection configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host name (e.g., `acme.ryver.com`), without scheme.
    #[serde(default)]
    pub domain: String,

    /// Account used for the login exchange.
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl ServerConfig {
    /// Check if every field needed to log in is present.
    pub fn is_configured(&self) -> bool {
        !self.domain.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }

    /// Report the first missing login field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first empty field.
    pub fn require(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("server.domain", &self.domain),
            ("server.username", &self.username),
            ("server.password", &self.password),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Missing {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Domain with any `https://` prefix or trailing slash removed.
    pub fn host(&self) -> &str {
        let host = self
            .domain
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        host.trim_end_matches('/')
    }
}

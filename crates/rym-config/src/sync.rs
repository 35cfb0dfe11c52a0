//! Synchronization engine configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use rym_core::{IgnoreRules, PageCursor};

use crate::error::ConfigError;

fn default_export_dir() -> PathBuf {
    PathBuf::from("export")
}

/// Messages requested per history page.
const fn default_page_size() -> u32 {
    1000
}

/// Entities synchronized at the same time.
const fn default_max_concurrent() -> usize {
    8
}

/// Total attempts for one page request, first try included.
const fn default_retry_attempts() -> u32 {
    9
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

const fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Root directory of the mirror. A leading `~/` is expanded.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on concurrently running entity synchronizers; `0` means
    /// unbounded.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-request client timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Which message of a fetched page becomes the next cursor.
    #[serde(default)]
    pub page_cursor: PageCursor,

    /// Ignore rules in `<kind>=<id>` form.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            page_size: default_page_size(),
            max_concurrent: default_max_concurrent(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            page_cursor: PageCursor::default(),
            ignore: Vec::new(),
        }
    }
}

impl SyncConfig {
    /// Export root with `~/` expanded against the home directory.
    pub fn export_root(&self) -> PathBuf {
        if let Ok(rest) = self.export_dir.strip_prefix("~")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        self.export_dir.clone()
    }

    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the configured ignore rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IgnoreRule`] for the first malformed rule.
    pub fn ignore_rules(&self) -> Result<IgnoreRules, ConfigError> {
        IgnoreRules::parse_all(&self.ignore).map_err(ConfigError::from)
    }

    /// Check value ranges and ignore rule syntax.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for out-of-range numbers and
    /// [`ConfigError::IgnoreRule`] for malformed ignore rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sync.page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sync.retry_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.export_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sync.export_dir".into(),
                reason: "must not be empty".into(),
            });
        }
        self.ignore_rules().map(|_| ())
    }
}

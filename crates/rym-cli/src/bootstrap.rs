use std::sync::Arc;

use anyhow::Context;
use rym_client::{ClientOptions, RetryPolicy, RymClient};
use rym_config::{Overrides, RymConfig};
use rym_sync::{CheckpointStore, Credentials, Orchestrator, SyncOptions};

use crate::cli::GlobalFlags;

/// Load layered configuration; `.env` in the working directory is read first.
pub fn load_config(flags: &GlobalFlags, overrides: &Overrides) -> anyhow::Result<RymConfig> {
    if let Some(path) = &flags.config
        && !path.is_file()
    {
        return Err(rym_config::ConfigError::InvalidValue {
            field: "--config".into(),
            reason: format!("{} is not a file", path.display()),
        })
        .context("failed to load configuration");
    }

    let config = RymConfig::load_with_dotenv(flags.config.as_deref(), overrides)
        .context("failed to load configuration")?;
    tracing::debug!(
        domain = %config.server.host(),
        export_dir = %config.sync.export_root().display(),
        "configuration loaded"
    );
    Ok(config)
}

/// Validate a configuration for networked commands.
pub fn validate(config: &RymConfig) -> anyhow::Result<()> {
    config.validate().context("invalid configuration")
}

fn client(config: &RymConfig) -> anyhow::Result<RymClient> {
    let options = ClientOptions {
        timeout: config.sync.request_timeout(),
        retry: RetryPolicy::new(config.sync.retry_attempts, config.sync.retry_delay()),
        page_cursor: config.sync.page_cursor,
    };
    RymClient::new(config.server.host(), options).context("failed to build HTTP client")
}

/// Wire a validated configuration into a ready-to-run orchestrator.
pub fn orchestrator(config: &RymConfig) -> anyhow::Result<Orchestrator<RymClient>> {
    let ignore = config
        .sync
        .ignore_rules()
        .context("invalid configuration")?;
    let options = SyncOptions {
        page_size: config.sync.page_size,
        max_concurrent: config.sync.max_concurrent,
    };
    Ok(Orchestrator::new(
        Arc::new(client(config)?),
        CheckpointStore::new(config.sync.export_root()),
        ignore,
        options,
    ))
}

#[must_use]
pub fn credentials(config: &RymConfig) -> Credentials {
    Credentials {
        username: config.server.username.clone(),
        password: config.server.password.clone(),
    }
}

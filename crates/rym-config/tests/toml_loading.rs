//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use std::path::{Path, PathBuf};

use figment::Jail;
use pretty_assertions::assert_eq;
use rym_config::{Overrides, RymConfig};
use rym_core::PageCursor;

#[test]
fn loads_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "rym.toml",
            r#"
[server]
domain = "acme.ryver.com"
username = "alice"
password = "hunter2"

[sync]
export_dir = "/srv/mirror"
page_size = 250
max_concurrent = 2
retry_attempts = 4
retry_delay_ms = 10
page_cursor = "last_of_page"
ignore = ["team=42"]
"#,
        )?;

        let config = RymConfig::load(None, &Overrides::default()).expect("config loads");
        assert_eq!(config.server.domain, "acme.ryver.com");
        assert_eq!(config.server.username, "alice");
        assert!(config.server.is_configured());
        assert_eq!(config.sync.export_dir, PathBuf::from("/srv/mirror"));
        assert_eq!(config.sync.page_size, 250);
        assert_eq!(config.sync.max_concurrent, 2);
        assert_eq!(config.sync.retry_attempts, 4);
        assert_eq!(config.sync.retry_delay_ms, 10);
        assert_eq!(config.sync.page_cursor, PageCursor::LastOfPage);
        assert_eq!(config.sync.ignore, vec!["team=42".to_string()]);
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn explicit_file_replaces_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file("rym.toml", "[server]\ndomain = \"project.example\"\n")?;
        jail.create_file("other.toml", "[server]\ndomain = \"explicit.example\"\n")?;

        let config = RymConfig::load(Some(Path::new("other.toml")), &Overrides::default())
            .expect("config loads");
        assert_eq!(config.server.domain, "explicit.example");
        Ok(())
    });
}

#[test]
fn partial_sync_section_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("rym.toml", "[sync]\npage_size = 50\n")?;

        let config = RymConfig::load(None, &Overrides::default()).expect("config loads");
        assert_eq!(config.sync.page_size, 50);
        assert_eq!(config.sync.retry_attempts, 9);
        assert_eq!(config.sync.retry_delay_ms, 1000);
        assert_eq!(config.sync.export_dir, PathBuf::from("export"));
        Ok(())
    });
}

#[test]
fn wrong_type_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file("rym.toml", "[sync]\npage_size = \"lots\"\n")?;

        assert!(RymConfig::load(None, &Overrides::default()).is_err());
        Ok(())
    });
}

use std::path::PathBuf;

use clap::{Args, Subcommand};
use rym_config::Overrides;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Mirror every entity's history into the export directory.
    Sync(SyncArgs),
    /// Print a mirrored history file for reading.
    Show(ShowArgs),
    /// List the entities the account can see, without synchronizing.
    Entities(EntitiesArgs),
}

/// Connection settings that override the configured ones.
#[derive(Clone, Debug, Default, Args)]
pub struct ServerArgs {
    /// Chat server domain, e.g. acme.ryver.com
    #[arg(long)]
    pub domain: Option<String>,

    #[arg(short, long)]
    pub username: Option<String>,

    /// Prefer RYM_SERVER__PASSWORD; command lines are visible to other users
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Root of the mirror (default: ./export)
    #[arg(short, long)]
    pub export_dir: Option<PathBuf>,

    /// Ignore an entity, as <kind>=<id> (repeatable, e.g. team=42)
    #[arg(short, long = "ignore", value_name = "KIND=ID")]
    pub ignore: Vec<String>,

    /// Messages requested per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Entities synchronized at once (0 = unbounded)
    #[arg(long)]
    pub max_concurrent: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct ShowArgs {
    /// Artifact written by `rym sync`, e.g. export/teams/7-Dev.json
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct EntitiesArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Mark an entity as ignored, as <kind>=<id> (repeatable)
    #[arg(short, long = "ignore", value_name = "KIND=ID")]
    pub ignore: Vec<String>,
}

impl ServerArgs {
    fn apply(&self, overrides: &mut Overrides) {
        overrides.domain.clone_from(&self.domain);
        overrides.username.clone_from(&self.username);
        overrides.password.clone_from(&self.password);
    }
}

impl Commands {
    /// Configuration overrides carried by the command's flags.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        let mut overrides = Overrides::default();
        match self {
            Self::Sync(args) => {
                args.server.apply(&mut overrides);
                overrides.export_dir.clone_from(&args.export_dir);
                overrides.page_size = args.page_size;
                overrides.max_concurrent = args.max_concurrent;
                overrides.ignore.clone_from(&args.ignore);
            }
            Self::Entities(args) => {
                args.server.apply(&mut overrides);
                overrides.ignore.clone_from(&args.ignore);
            }
            Self::Show(_) => {}
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    use crate::cli::Cli;

    #[test]
    fn sync_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "rym",
            "sync",
            "--domain",
            "acme.ryver.com",
            "-u",
            "alice",
            "--export-dir",
            "/srv/mirror",
            "--ignore",
            "team=42",
            "-i",
            "user=3",
            "--max-concurrent",
            "2",
        ])
        .expect("cli should parse");

        let overrides = cli.command.overrides();
        assert_eq!(overrides.domain.as_deref(), Some("acme.ryver.com"));
        assert_eq!(overrides.username.as_deref(), Some("alice"));
        assert_eq!(overrides.password, None);
        assert_eq!(overrides.export_dir, Some(PathBuf::from("/srv/mirror")));
        assert_eq!(overrides.ignore, vec!["team=42", "user=3"]);
        assert_eq!(overrides.max_concurrent, Some(2));
        assert_eq!(overrides.page_size, None);
    }

    #[test]
    fn show_has_no_overrides() {
        let cli = Cli::try_parse_from(["rym", "show", "a.json"]).expect("cli should parse");
        let overrides = cli.command.overrides();
        assert!(overrides.ignore.is_empty());
        assert_eq!(overrides.domain, None);
    }
}

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::exit::PartialSync;
use crate::export_lock::ExportLock;
use crate::output::render_report;
use crate::progress::SyncProgress;

pub async fn handle(command: &Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, &command.overrides())?;
    bootstrap::validate(&config)?;
    let orchestrator = bootstrap::orchestrator(&config)?;

    let export_root = config.sync.export_root();
    let _lock = ExportLock::acquire(&export_root).await?;

    tracing::info!(
        domain = config.server.host(),
        export_dir = %export_root.display(),
        "starting sync"
    );
    let mut progress = SyncProgress::default();
    let report = orchestrator
        .run_with(&bootstrap::credentials(&config), &mut progress)
        .await?;
    progress.finish();

    println!("{}", render_report(&report, flags.format)?);

    if !report.is_complete() {
        return Err(PartialSync {
            failed: report.failed(),
            attempted: report.synced() + report.failed(),
        }
        .into());
    }
    Ok(())
}

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Sync(_) => commands::sync::handle(&command, flags).await,
        Commands::Entities(_) => commands::entities::handle(&command, flags).await,
        Commands::Show(args) => commands::show::handle(&args, flags),
    }
}

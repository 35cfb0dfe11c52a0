use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::output::render_entities;

pub async fn handle(command: &Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags, &command.overrides())?;
    bootstrap::validate(&config)?;

    let entities = bootstrap::orchestrator(&config)?
        .catalog(&bootstrap::credentials(&config))
        .await?;

    println!("{}", render_entities(&entities, flags.format)?);
    Ok(())
}

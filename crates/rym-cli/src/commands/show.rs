use anyhow::Context;
use rym_core::Message;

use crate::cli::root_commands::ShowArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::history::render_history;
use crate::output::output_json;
use crate::ui;

pub fn handle(args: &ShowArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let messages: Vec<Message> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a rym history file", args.file.display()))?;

    match flags.format {
        OutputFormat::Table => {
            if !messages.is_empty() {
                println!("{}", render_history(&messages, ui::prefs().color));
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output_json(&messages, flags.format),
    }
}

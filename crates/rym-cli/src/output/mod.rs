use rym_core::Entity;
use rym_sync::{EntityOutcome, SyncReport};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

pub mod history;
pub mod table;

/// Print a serializable value as JSON (pretty for `json`, one line for `raw`).
pub fn output_json<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = match format {
        OutputFormat::Raw => serde_json::to_string(value)?,
        OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(value)?,
    };
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.color,
    }
}

/// Render a sync report in the requested format.
pub fn render_report(report: &SyncReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Raw => Ok(serde_json::to_string(report)?),
        OutputFormat::Table => Ok(report_table(report, table_options())),
    }
}

fn report_table(report: &SyncReport, options: table::TableOptions) -> String {
    let rows = report
        .entities
        .iter()
        .map(|r| {
            let (appended, total, note) = match &r.outcome {
                EntityOutcome::Synced(stats) => (
                    stats.appended.to_string(),
                    stats.total.to_string(),
                    String::new(),
                ),
                EntityOutcome::Failed { error } => ("-".into(), "-".into(), error.clone()),
                EntityOutcome::Skipped => ("-".into(), "-".into(), String::new()),
            };
            vec![
                r.entity.kind.to_string(),
                r.entity.id.to_string(),
                r.entity.display_name.clone(),
                r.outcome.as_str().to_string(),
                appended,
                total,
                note,
            ]
        })
        .collect::<Vec<_>>();

    if rows.is_empty() {
        return String::from("(no entities)");
    }

    let mut out = table::render_table(
        &["kind", "id", "name", "status", "new", "total", "error"],
        &rows,
        options,
    );
    out.push_str(&format!(
        "\n\n{} synced, {} failed, {} skipped, {} new messages",
        report.synced(),
        report.failed(),
        report.skipped(),
        report.appended()
    ));
    out
}

/// Render a catalog listing in the requested format.
pub fn render_entities(entities: &[Entity], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entities)?),
        OutputFormat::Raw => Ok(serde_json::to_string(entities)?),
        OutputFormat::Table => Ok(entities_table(entities, table_options())),
    }
}

fn entities_table(entities: &[Entity], options: table::TableOptions) -> String {
    if entities.is_empty() {
        return String::from("(no entities)");
    }
    let rows = entities
        .iter()
        .map(|e| {
            vec![
                e.kind.to_string(),
                e.id.to_string(),
                e.display_name.clone(),
                if e.skip { "skipped" } else { "" }.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::render_table(&["kind", "id", "name", "ignored"], &rows, options)
}

use indicatif::{ProgressBar, ProgressStyle};
use rym_sync::{EntityOutcome, EntityReport, SyncObserver};

use crate::ui;

fn terminal_columns() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
}

fn bar_template() -> &'static str {
    match terminal_columns() {
        Some(cols) if cols >= 110 => "{bar:40.cyan/blue} {pos}/{len} {msg}",
        Some(cols) if cols >= 80 => "{wide_bar:.cyan/blue} {pos}/{len} {msg}",
        _ => "{wide_bar:.cyan/blue} {percent}% {msg}",
    }
}

/// Progress bar counting finished entities; inert when progress is disabled.
#[derive(Default)]
pub struct SyncProgress {
    bar: Option<ProgressBar>,
    failed: usize,
}

impl SyncProgress {
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            if self.failed == 0 {
                bar.finish_with_message("done");
            } else {
                bar.abandon_with_message(format!("{} failed", self.failed));
            }
        }
    }
}

impl SyncObserver for SyncProgress {
    fn planned(&mut self, entities: usize) {
        if !ui::prefs().progress {
            return;
        }

        let bar = ProgressBar::new(entities as u64);
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message("synchronizing");
        self.bar = Some(bar);
    }

    fn finished(&mut self, report: &EntityReport) {
        if matches!(report.outcome, EntityOutcome::Failed { .. }) {
            self.failed += 1;
        }
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{} {}", report.entity.kind, report.entity.display_name));
            bar.inc(1);
        }
    }
}

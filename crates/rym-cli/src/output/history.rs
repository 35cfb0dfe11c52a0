//! Human-readable rendering of a mirrored history.

use rym_core::Message;

const DIM: &str = "\u{1b}[2m";
const BOLD_GREEN: &str = "\u{1b}[1;32m";
const RESET: &str = "\u{1b}[0m";

/// One line per message, `<when>: <from> -- <body>`, with continuation lines
/// of a multi-line body indented to start under the sender column.
#[must_use]
pub fn render_history(messages: &[Message], color: bool) -> String {
    messages
        .iter()
        .map(|m| render_message(m, color))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_message(message: &Message, color: bool) -> String {
    let when = message.when_to_seconds();
    let indent = " ".repeat(when.chars().count() + 2);
    let body = message
        .body_text()
        .split('\n')
        .collect::<Vec<_>>()
        .join(&format!("\n{indent}"));

    if color {
        format!(
            "{DIM}{when}{RESET}: {BOLD_GREEN}{}{RESET}{DIM} --{RESET} {body}",
            message.sender_name()
        )
    } else {
        format!("{when}: {} -- {body}", message.sender_name())
    }
}

//! Terminal rendering of chat messages.

use helpdesk_conversation::Message;

/// Indent that pushes user messages to the right of desk messages.
const USER_INDENT: &str = "        ";

/// Formats a message as a chat line, e.g. `[9:05 AM] IT Support: Hello`.
///
/// User messages are indented so the two sides of the conversation stay
/// visually apart.
#[must_use]
pub fn format_message(message: &Message) -> String {
    let indent = if message.is_user() { USER_INDENT } else { "" };
    format!(
        "{indent}[{}] {}: {}",
        message.display_time(),
        message.sender(),
        message.body()
    )
}

/// Formats a local notice that is not part of the transcript.
#[must_use]
pub fn format_notice(text: &str) -> String {
    format!("* {text}")
}

/// Formats an input warning.
#[must_use]
pub fn format_warning(text: &str) -> String {
    format!("! {text}")
}

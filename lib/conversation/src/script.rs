//! Canned texts the support desk sends.

/// Sender name used for desk messages unless configured otherwise.
pub const SUPPORT_NAME: &str = "IT Support";

/// Greeting appended when a session starts.
pub const WELCOME: &str = "Welcome to AnyState IT Support. How can I help you today?";

pub const PASSWORD_RESET: &str = "To reset your password, please visit the self-service portal at https://reset.anystate.gov or call the IT helpdesk at 555-123-4567.";

pub const SOFTWARE_REQUEST: &str = "For software installation requests, please use the Software Request form in the Employee Portal. An IT technician will review and process your request.";

pub const VPN_ACCESS: &str = "For VPN access or remote connectivity issues, please ensure you're using the latest AnyState VPN client. For installation instructions, visit https://vpn.anystate.gov";

/// Reply when no keyword rule matches.
pub const FALLBACK: &str =
    "I'm not sure I understand your question. Would you like to speak with a live IT support agent?";

pub const CONNECTING: &str = "Connecting you to a live agent. Please wait a moment...";

pub const CONNECTED: &str = "You are now connected with a live agent. Please note that live agent support is available Monday to Friday, 9 AM to 5 PM.";

/// Shown immediately when an escalated user sends a message.
pub const AGENT_TYPING: &str = "Agent is typing...";

/// Fixed reply to every message sent while escalated.
pub const AGENT_ACKNOWLEDGMENT: &str =
    "Thank you for your message. An IT support specialist will assist you shortly.";

/// Message appended when the live-agent connection fails.
#[must_use]
pub fn connect_error(reason: &str) -> String {
    format!("Error connecting to live agent: {reason}")
}

/// Confirmation appended for a callback request.
#[must_use]
pub fn callback_scheduled(phone_number: &str) -> String {
    format!(
        "A callback has been scheduled to {phone_number}. An IT support specialist will call you shortly during business hours (Monday to Friday, 9 AM to 5 PM)."
    )
}

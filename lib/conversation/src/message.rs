//! Message types for conversations.

use chrono::{DateTime, Local, Utc};
use helpdesk_core::MessageId;
use serde::{Deserialize, Serialize};

/// Who a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Typed by the user.
    User,
    /// Produced by the support desk (bot or agent).
    System,
}

/// A single transcript entry.
///
/// Messages are only created by [`ConversationState`](crate::ConversationState)
/// and never change afterwards, so fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    sender: String,
    body: String,
    timestamp: DateTime<Utc>,
    origin: Origin,
}

impl Message {
    pub(crate) fn new(
        origin: Origin,
        sender: impl Into<String>,
        body: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            sender: sender.into(),
            body: body.into(),
            timestamp,
            origin,
        }
    }

    /// Unique message identifier.
    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Display name of the sender.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Message text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// When the message was appended.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether the user or the desk sent it.
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns true for messages typed by the user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }

    /// Local wall-clock time in the chat bubble format, e.g. `9:05 AM`.
    #[must_use]
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%-I:%M %p")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_flags() {
        let msg = Message::new(Origin::User, "alice", "Hello!", Utc::now());
        assert!(msg.is_user());
        assert_eq!(msg.sender(), "alice");
        assert_eq!(msg.body(), "Hello!");
    }

    #[test]
    fn system_message_is_not_user() {
        let msg = Message::new(Origin::System, "IT Support", "Hi", Utc::now());
        assert_eq!(msg.origin(), Origin::System);
        assert!(!msg.is_user());
    }

    #[test]
    fn display_time_uses_twelve_hour_clock() {
        let msg = Message::new(Origin::System, "IT Support", "Hi", Utc::now());
        let time = msg.display_time();
        assert!(time.ends_with("AM") || time.ends_with("PM"), "got {time}");
    }

    #[test]
    fn origin_serializes_lowercase() {
        let msg = Message::new(Origin::User, "bob", "vpn down", Utc::now());
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["origin"], "user");
        assert_eq!(json["body"], "vpn down");
    }
}

//! Conversation state: the transcript and the escalation flag.
//!
//! The transcript only grows, and each entry is stamped strictly after the
//! one before it. `escalated` only ever goes from false to true.

use crate::error::{InputError, InputField};
use crate::message::{Message, Origin};
use crate::script::SUPPORT_NAME;
use chrono::{DateTime, Duration, Utc};

/// Per-session conversation data.
#[derive(Debug, Clone)]
pub struct ConversationState {
    user_name: String,
    support_name: String,
    escalated: bool,
    transcript: Vec<Message>,
}

impl ConversationState {
    /// Creates an empty, non-escalated conversation for `user_name`.
    #[must_use]
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            support_name: SUPPORT_NAME.to_string(),
            escalated: false,
            transcript: Vec::new(),
        }
    }

    /// Overrides the sender name used for desk messages.
    #[must_use]
    pub fn with_support_name(mut self, support_name: impl Into<String>) -> Self {
        self.support_name = support_name.into();
        self
    }

    /// Appends a message typed by the user.
    ///
    /// The stored body is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Empty`] if `text` is blank; the transcript is
    /// left untouched.
    pub fn append_user_message(&mut self, text: &str) -> Result<Message, InputError> {
        let body = user_message_body(text)?;
        let sender = self.user_name.clone();
        Ok(self.push(Origin::User, sender, body))
    }

    /// Appends a message from the support desk.
    pub fn append_system_message(&mut self, text: impl Into<String>) -> Message {
        let sender = self.support_name.clone();
        self.push(Origin::System, sender, text)
    }

    /// Marks the conversation as handed to a live agent.
    ///
    /// Returns true only for the call that flipped the flag.
    pub fn escalate(&mut self) -> bool {
        let changed = !self.escalated;
        self.escalated = true;
        changed
    }

    /// Returns true once the conversation has been escalated.
    #[must_use]
    pub fn is_escalated(&self) -> bool {
        self.escalated
    }

    /// All messages in insertion order.
    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Number of messages in the transcript.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    /// Returns true if nothing has been said yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    /// The most recent message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.transcript.last()
    }

    /// Display name of the user.
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    fn push(&mut self, origin: Origin, sender: String, body: impl Into<String>) -> Message {
        let message = Message::new(origin, sender, body, self.next_timestamp());
        self.transcript.push(message.clone());
        message
    }

    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.transcript.last() {
            Some(last) if now <= last.timestamp() => last.timestamp() + Duration::microseconds(1),
            _ => now,
        }
    }
}

/// Trims a user message, rejecting blank text.
pub(crate) fn user_message_body(text: &str) -> Result<&str, InputError> {
    let body = text.trim();
    if body.is_empty() {
        return Err(InputError::Empty {
            field: InputField::Message,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_state_is_empty_and_not_escalated() {
        let state = ConversationState::new("alice");
        assert!(state.is_empty());
        assert!(!state.is_escalated());
        assert_eq!(state.user_name(), "alice");
    }

    #[test]
    fn user_message_is_attributed_to_user() {
        let mut state = ConversationState::new("alice");
        let msg = state.append_user_message("  my vpn is down  ").unwrap();

        assert_eq!(msg.sender(), "alice");
        assert_eq!(msg.body(), "my vpn is down");
        assert_eq!(msg.origin(), Origin::User);
        assert_eq!(state.last_message(), Some(&msg));
    }

    #[test]
    fn blank_user_messages_are_rejected() {
        let mut state = ConversationState::new("alice");
        for text in ["", "   ", "\n\t"] {
            let err = state.append_user_message(text).unwrap_err();
            assert_eq!(
                err,
                InputError::Empty {
                    field: InputField::Message
                }
            );
        }
        assert_eq!(state.len(), 0);
    }

    #[test]
    fn system_message_uses_support_name() {
        let mut state = ConversationState::new("alice");
        let msg = state.append_system_message("hello");
        assert_eq!(msg.sender(), "IT Support");
        assert_eq!(msg.origin(), Origin::System);

        let mut custom = ConversationState::new("alice").with_support_name("Service Desk");
        assert_eq!(custom.append_system_message("hi").sender(), "Service Desk");
    }

    #[test]
    fn escalate_is_idempotent() {
        let mut state = ConversationState::new("alice");
        assert!(state.escalate());
        assert!(!state.escalate());
        assert!(state.is_escalated());
        assert!(state.is_empty());
    }

    #[test]
    fn timestamps_strictly_increase() {
        let mut state = ConversationState::new("alice");
        for i in 0..50 {
            state.append_system_message(format!("line {i}"));
        }
        let stamps: Vec<_> = state.transcript().iter().map(Message::timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    proptest! {
        #[test]
        fn non_blank_message_grows_transcript_by_one(
            prefix in "[ \t]{0,3}",
            word in "[a-zA-Z0-9?!.]{1,20}",
            suffix in "[ \t]{0,3}",
        ) {
            let mut state = ConversationState::new("alice");
            state.append_system_message("welcome");
            let before = state.len();

            let msg = state.append_user_message(&format!("{prefix}{word}{suffix}")).unwrap();

            prop_assert_eq!(state.len(), before + 1);
            prop_assert!(msg.is_user());
            prop_assert_eq!(msg.body(), word.as_str());
        }

        #[test]
        fn whitespace_only_message_leaves_transcript_unchanged(text in "[ \t\r\n]{0,10}") {
            let mut state = ConversationState::new("alice");
            prop_assert!(state.append_user_message(&text).is_err());
            prop_assert!(state.is_empty());
        }
    }
}

//! Keyword responder for the automated desk.
//!
//! Rules are tried top-down and the first match wins, so order matters:
//! "password reset over vpn" must hit the password rule, not the VPN one.
//! Once the conversation is escalated the rules are skipped entirely and
//! every message gets the live agent's scripted acknowledgment.

use crate::script;
use crate::state::ConversationState;
use std::time::Duration;
use tracing::debug;

/// A single keyword rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    name: String,
    keywords: Vec<String>,
    reply: String,
}

impl KeywordRule {
    /// Creates a rule that fires when any keyword occurs in the message,
    /// ignoring case.
    #[must_use]
    pub fn new<I, K>(name: impl Into<String>, keywords: I, reply: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            reply: reply.into(),
        }
    }

    /// Rule name, used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text sent when the rule matches.
    #[must_use]
    pub fn reply(&self) -> &str {
        &self.reply
    }

    /// Returns true if any keyword is a substring of `lowered`.
    ///
    /// `lowered` must already be lowercase.
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// An outbound desk message, optionally held back for a while.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message text.
    pub text: String,
    /// How long to wait before sending; `None` sends immediately.
    pub delay: Option<Duration>,
}

impl Reply {
    /// A reply sent right away.
    #[must_use]
    pub fn immediate(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay: None,
        }
    }

    /// A reply sent after `delay`.
    #[must_use]
    pub fn deferred(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            text: text.into(),
            delay: Some(delay),
        }
    }
}

/// Chooses the desk's replies to a user message.
#[derive(Debug, Clone)]
pub struct Responder {
    rules: Vec<KeywordRule>,
    fallback: String,
    agent_reply_delay: Duration,
}

impl Responder {
    /// The AnyState helpdesk rule table.
    #[must_use]
    pub fn helpdesk(agent_reply_delay: Duration) -> Self {
        Self::new(
            vec![
                KeywordRule::new("password_reset", ["password reset"], script::PASSWORD_RESET),
                KeywordRule::new(
                    "software_request",
                    ["software", "install"],
                    script::SOFTWARE_REQUEST,
                ),
                KeywordRule::new("vpn_access", ["vpn", "remote"], script::VPN_ACCESS),
            ],
            script::FALLBACK,
            agent_reply_delay,
        )
    }

    /// Creates a responder from an ordered rule list.
    #[must_use]
    pub fn new(
        rules: Vec<KeywordRule>,
        fallback: impl Into<String>,
        agent_reply_delay: Duration,
    ) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
            agent_reply_delay,
        }
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Returns the first rule matching `text`, if any.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<&KeywordRule> {
        let lowered = text.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    /// Produces the desk's replies to `text` given the current state.
    #[must_use]
    pub fn respond(&self, text: &str, state: &ConversationState) -> Vec<Reply> {
        if state.is_escalated() {
            return vec![
                Reply::immediate(script::AGENT_TYPING),
                Reply::deferred(script::AGENT_ACKNOWLEDGMENT, self.agent_reply_delay),
            ];
        }

        match self.classify(text) {
            Some(rule) => {
                debug!(rule = rule.name(), "matched keyword rule");
                vec![Reply::immediate(rule.reply())]
            }
            None => {
                debug!("no keyword rule matched, offering escalation");
                vec![Reply::immediate(self.fallback.as_str())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder() -> Responder {
        Responder::helpdesk(Duration::from_secs(2))
    }

    fn texts(replies: &[Reply]) -> Vec<&str> {
        replies.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn password_reset_guidance() {
        let state = ConversationState::new("alice");
        let replies = responder().respond("I need a password reset", &state);
        assert_eq!(replies, vec![Reply::immediate(script::PASSWORD_RESET)]);
    }

    #[test]
    fn software_guidance() {
        let state = ConversationState::new("alice");
        let replies = responder().respond("install new software please", &state);
        assert_eq!(texts(&replies), vec![script::SOFTWARE_REQUEST]);
    }

    #[test]
    fn vpn_guidance_matches_remote() {
        let state = ConversationState::new("alice");
        let replies = responder().respond("Working REMOTE today, can't connect", &state);
        assert_eq!(texts(&replies), vec![script::VPN_ACCESS]);
    }

    #[test]
    fn password_reset_wins_over_vpn() {
        let state = ConversationState::new("alice");
        let replies = responder().respond("password reset needed for VPN", &state);
        assert_eq!(texts(&replies), vec![script::PASSWORD_RESET]);
    }

    #[test]
    fn software_wins_over_vpn() {
        let state = ConversationState::new("alice");
        let replies = responder().respond("how do I install the vpn client", &state);
        assert_eq!(texts(&replies), vec![script::SOFTWARE_REQUEST]);
    }

    #[test]
    fn matching_ignores_case() {
        let rule = responder().classify("PASSWORD RESET").map(KeywordRule::name).map(str::to_string);
        assert_eq!(rule.as_deref(), Some("password_reset"));
    }

    #[test]
    fn password_without_reset_falls_back() {
        let state = ConversationState::new("alice");
        let replies = responder().respond("I forgot my password", &state);
        assert_eq!(texts(&replies), vec![script::FALLBACK]);
    }

    #[test]
    fn escalated_state_bypasses_keywords() {
        let mut state = ConversationState::new("alice");
        state.escalate();

        for text in ["I need a password reset", "vpn", "hello"] {
            let replies = responder().respond(text, &state);
            assert_eq!(
                replies,
                vec![
                    Reply::immediate(script::AGENT_TYPING),
                    Reply::deferred(script::AGENT_ACKNOWLEDGMENT, Duration::from_secs(2)),
                ]
            );
        }
    }

    #[test]
    fn custom_rule_table_respects_order() {
        let responder = Responder::new(
            vec![
                KeywordRule::new("printer", ["printer"], "Printer help"),
                KeywordRule::new("catch_all", ["e"], "Generic help"),
            ],
            "No idea",
            Duration::ZERO,
        );
        let state = ConversationState::new("alice");

        assert_eq!(texts(&responder.respond("printer jammed", &state)), vec!["Printer help"]);
        assert_eq!(texts(&responder.respond("help me", &state)), vec!["Generic help"]);
        assert_eq!(texts(&responder.respond("xyz", &state)), vec!["No idea"]);
        assert_eq!(responder.rules().len(), 2);
    }
}

//! Chat session configuration.

use crate::script;
use serde::Deserialize;
use std::time::Duration;

/// Settings for a [`ChatSession`](crate::ChatSession).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatConfig {
    /// Sender name on desk messages.
    #[serde(default = "default_support_name")]
    pub support_name: String,

    /// Simulated wait before a live agent picks up, in milliseconds.
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,

    /// Simulated wait before the agent acknowledges a message, in milliseconds.
    #[serde(default = "default_agent_reply_delay_ms")]
    pub agent_reply_delay_ms: u64,
}

fn default_support_name() -> String {
    script::SUPPORT_NAME.to_string()
}

fn default_connect_delay_ms() -> u64 {
    1500
}

fn default_agent_reply_delay_ms() -> u64 {
    2000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            support_name: default_support_name(),
            connect_delay_ms: default_connect_delay_ms(),
            agent_reply_delay_ms: default_agent_reply_delay_ms(),
        }
    }
}

impl ChatConfig {
    /// Delay before the live-agent connection completes.
    #[must_use]
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    /// Delay before the agent's acknowledgment arrives.
    #[must_use]
    pub fn agent_reply_delay(&self) -> Duration {
        Duration::from_millis(self.agent_reply_delay_ms)
    }
}

//! Live-agent connector seam.
//!
//! The session never talks to a contact-center backend directly. It asks a
//! [`LiveAgentConnector`] for an agent session; the shipped
//! [`SimulatedConnector`] always succeeds without leaving the process.

use crate::error::AgentError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helpdesk_core::AgentSessionId;
use serde::{Deserialize, Serialize};

/// A connected live-agent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSession {
    /// Handle issued by the connector.
    pub id: AgentSessionId,
    /// When the agent picked up.
    pub connected_at: DateTime<Utc>,
}

impl AgentSession {
    /// Creates a session handle stamped now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: AgentSessionId::new(),
            connected_at: Utc::now(),
        }
    }
}

impl Default for AgentSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Something that can hand a conversation to a live agent.
#[async_trait]
pub trait LiveAgentConnector: Send + Sync {
    /// Connects to an agent.
    async fn connect(&self) -> Result<AgentSession, AgentError>;
}

/// Local stand-in for a contact-center backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedConnector;

#[async_trait]
impl LiveAgentConnector for SimulatedConnector {
    async fn connect(&self) -> Result<AgentSession, AgentError> {
        Ok(AgentSession::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_connector_always_connects() {
        let first = SimulatedConnector.connect().await.unwrap();
        let second = SimulatedConnector.connect().await.unwrap();
        assert_ne!(first.id, second.id);
    }
}

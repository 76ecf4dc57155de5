//! Live-agent escalation state machine.
//!
//! `Bot -> Connecting -> LiveAgent`, with `Connecting -> Bot` when the
//! connect attempt fails. `LiveAgent` is terminal for the session.
//!
//! [`transition`] is pure: it returns the next state plus the effects the
//! session runtime must carry out, and performs no I/O itself.

use crate::error::EscalationError;
use crate::script;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Where the conversation is in the escalation flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationState {
    /// Automated keyword replies.
    #[default]
    Bot,
    /// Waiting for a live agent to pick up.
    Connecting,
    /// Handed to a live agent.
    LiveAgent,
}

impl EscalationState {
    /// Returns true while a new live-agent request would be accepted.
    #[must_use]
    pub fn can_request_agent(&self) -> bool {
        matches!(self, Self::Bot)
    }
}

impl fmt::Display for EscalationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bot => write!(f, "bot"),
            Self::Connecting => write!(f, "connecting"),
            Self::LiveAgent => write!(f, "live_agent"),
        }
    }
}

/// Inputs to the escalation state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationEvent {
    /// The user asked for a live agent.
    AgentRequested,
    /// The connector reached an agent.
    Connected,
    /// The connector gave up.
    ConnectFailed { reason: String },
}

impl fmt::Display for EscalationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AgentRequested => write!(f, "agent_requested"),
            Self::Connected => write!(f, "connected"),
            Self::ConnectFailed { .. } => write!(f, "connect_failed"),
        }
    }
}

/// Work the session runtime performs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationEffect {
    /// Append a desk message to the transcript.
    Notify { text: String },
    /// Attempt the agent connection after `delay`.
    ScheduleConnect { delay: Duration },
    /// Flip the conversation's escalated flag.
    MarkEscalated,
}

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub new_state: EscalationState,
    pub effects: Vec<EscalationEffect>,
}

impl Transition {
    fn new(state: EscalationState) -> Self {
        Self {
            new_state: state,
            effects: Vec::new(),
        }
    }

    fn with_effect(mut self, effect: EscalationEffect) -> Self {
        self.effects.push(effect);
        self
    }

    fn notify(self, text: impl Into<String>) -> Self {
        self.with_effect(EscalationEffect::Notify { text: text.into() })
    }
}

/// Computes the next escalation state.
///
/// # Errors
///
/// Re-requesting an agent while `Connecting` or `LiveAgent` is rejected with
/// [`EscalationError::AlreadyConnecting`] or
/// [`EscalationError::AlreadyConnected`]. Connection outcomes outside
/// `Connecting` are [`EscalationError::InvalidTransition`].
pub fn transition(
    state: EscalationState,
    event: EscalationEvent,
    connect_delay: Duration,
) -> Result<Transition, EscalationError> {
    match (state, event) {
        (EscalationState::Bot, EscalationEvent::AgentRequested) => {
            Ok(Transition::new(EscalationState::Connecting)
                .notify(script::CONNECTING)
                .with_effect(EscalationEffect::ScheduleConnect {
                    delay: connect_delay,
                }))
        }

        (EscalationState::Connecting, EscalationEvent::AgentRequested) => {
            Err(EscalationError::AlreadyConnecting)
        }
        (EscalationState::LiveAgent, EscalationEvent::AgentRequested) => {
            Err(EscalationError::AlreadyConnected)
        }

        (EscalationState::Connecting, EscalationEvent::Connected) => {
            Ok(Transition::new(EscalationState::LiveAgent)
                .with_effect(EscalationEffect::MarkEscalated)
                .notify(script::CONNECTED))
        }

        (EscalationState::Connecting, EscalationEvent::ConnectFailed { reason }) => {
            Ok(Transition::new(EscalationState::Bot).notify(script::connect_error(&reason)))
        }

        (from, event) => Err(EscalationError::InvalidTransition {
            from: from.to_string(),
            event: event.to_string(),
        }),
    }
}

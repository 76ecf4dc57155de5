//! Error types for the conversation crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `InputError`: blank user input (message text or callback number)
//! - `EscalationError`: rejected live-agent escalation events
//! - `AgentError`: failures reported by a live-agent connector
//! - `SessionError`: what a [`ChatSession`](crate::ChatSession) reports

use helpdesk_core::SessionId;
use helpdesk_scheduler::ScheduleError;
use std::fmt;

/// The user-supplied field an [`InputError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    /// Chat message text.
    Message,
    /// Callback phone number.
    PhoneNumber,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message => write!(f, "message"),
            Self::PhoneNumber => write!(f, "phone number"),
        }
    }
}

/// Errors from validating user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The input was empty or whitespace only.
    Empty { field: InputField },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
        }
    }
}

impl std::error::Error for InputError {}

/// Errors from the escalation state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationError {
    /// A live agent was requested while a connection is in progress.
    AlreadyConnecting,
    /// A live agent was requested while one is already connected.
    AlreadyConnected,
    /// The event does not apply to the current state.
    InvalidTransition { from: String, event: String },
}

impl fmt::Display for EscalationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyConnecting => write!(f, "already connecting to a live agent"),
            Self::AlreadyConnected => write!(f, "already connected to a live agent"),
            Self::InvalidTransition { from, event } => {
                write!(f, "invalid escalation transition: {event} while {from}")
            }
        }
    }
}

impl std::error::Error for EscalationError {}

/// Errors from a live-agent connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// No agent is available to take the conversation.
    Unavailable { reason: String },
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "no live agent available: {reason}"),
        }
    }
}

impl std::error::Error for AgentError {}

/// Errors reported by a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session was closed and accepts no more input.
    Closed { id: SessionId },
    /// The user input was rejected.
    Input(InputError),
    /// The escalation request could not be processed.
    Escalation(EscalationError),
    /// Delayed work could not be scheduled.
    Scheduling(ScheduleError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed { id } => write!(f, "session {id} is closed"),
            Self::Input(e) => write!(f, "invalid input: {e}"),
            Self::Escalation(e) => write!(f, "escalation failed: {e}"),
            Self::Scheduling(e) => write!(f, "could not schedule delayed work: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<InputError> for SessionError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<EscalationError> for SessionError {
    fn from(e: EscalationError) -> Self {
        Self::Escalation(e)
    }
}

impl From<ScheduleError> for SessionError {
    fn from(e: ScheduleError) -> Self {
        Self::Scheduling(e)
    }
}

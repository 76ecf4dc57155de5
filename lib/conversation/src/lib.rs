//! Conversation core for the helpdesk chat.
//!
//! This crate provides:
//!
//! - **Conversation State**: the append-only transcript and escalation flag
//! - **Responder**: ordered keyword rules with a live-agent fallback
//! - **Escalation**: the `Bot -> Connecting -> LiveAgent` state machine
//! - **Callback**: phone callback requests
//! - **Chat Session**: the runtime that wires these together with delayed replies

pub mod agent;
pub mod callback;
pub mod config;
pub mod error;
pub mod escalation;
pub mod message;
pub mod responder;
pub mod script;
pub mod session;
pub mod state;

pub use agent::{AgentSession, LiveAgentConnector, SimulatedConnector};
pub use callback::{CallbackRequest, request_callback};
pub use config::ChatConfig;
pub use error::{AgentError, EscalationError, InputError, InputField, SessionError};
pub use escalation::{EscalationEffect, EscalationEvent, EscalationState, Transition};
pub use message::{Message, Origin};
pub use responder::{KeywordRule, Reply, Responder};
pub use session::{ChatSession, EscalationOutcome, MessageFeed};
pub use state::ConversationState;

//! Core types shared by the helpdesk crates.
//!
//! Holds the strongly typed identifiers and the rootcause-based `Result`
//! alias every other crate builds its error handling on.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{AgentSessionId, MessageId, ParseIdError, SessionId, TaskId};

//! Terminal front end for the helpdesk chat.
//!
//! This crate is the presentation layer: it reads lines from the terminal,
//! drives a [`ChatSession`](helpdesk_conversation::ChatSession) and renders
//! every message the session publishes.

pub mod config;
pub mod identity;
pub mod input;
pub mod render;
pub mod repl;

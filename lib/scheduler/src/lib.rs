//! Delayed work for chat sessions.
//!
//! This crate provides:
//!
//! - **Delay Scheduler**: one-shot tasks that fire after a delay
//! - **Scheduled Task**: a handle that cancels a single pending task
//! - **Shutdown**: cancellation of everything pending, joined before return

pub mod delay;
pub mod error;

pub use delay::{DelayScheduler, ScheduledTask, ShutdownReport, TaskOutcome};
pub use error::ScheduleError;

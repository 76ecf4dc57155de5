//! Error types for the scheduler crate.

use std::fmt;

/// Errors from scheduling delayed work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The scheduler was shut down and accepts no more work.
    ShutDown,
    /// Scheduling was attempted outside a tokio runtime.
    NoRuntime,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShutDown => write!(f, "scheduler has been shut down"),
            Self::NoRuntime => write!(f, "no async runtime available to run delayed task"),
        }
    }
}

impl std::error::Error for ScheduleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_error_display() {
        assert!(ScheduleError::ShutDown.to_string().contains("shut down"));
        assert!(ScheduleError::NoRuntime.to_string().contains("runtime"));
    }
}

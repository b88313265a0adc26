//! Structured error types for the offdroid project
//!
//! This module provides domain-specific error types using thiserror,
//! making error handling more explicit and maintainable.

use thiserror::Error;

/// Errors related to notification delivery (Gotify)
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("failed to read key file at {path}: {source}")]
    KeyFileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while running a local command
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("failed to execute {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read output of {program}: {source}")]
    OutputFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("output pipe of {program} was not captured")]
    MissingPipe { program: String },
}

/// Errors related to package update runs
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("no supported package manager found (apt, zypper, dnf, pacman, or brew)")]
    NoManagerDetected,

    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("command `{command}` failed: {status}")]
    CommandFailed { command: String, status: String },
}

impl UpdateError {
    /// Process exit code the CLI reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            UpdateError::NoManagerDetected => 0,
            UpdateError::PermissionDenied { .. } => crate::constants::EXIT_PERMISSION_DENIED,
            UpdateError::CommandFailed { .. } => crate::constants::EXIT_COMMAND_FAILED,
        }
    }
}

// Type alias for common Result type
pub type Result<T, E = UpdateError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(UpdateError::NoManagerDetected.exit_code(), 0);
        assert_eq!(
            UpdateError::PermissionDenied { message: "no".into() }.exit_code(),
            2
        );
        assert_eq!(
            UpdateError::CommandFailed {
                command: "apt-get upgrade -y".into(),
                status: "exit code 100".into(),
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_command_failed_message() {
        let err = UpdateError::CommandFailed {
            command: "sudo pacman -Su --noconfirm".into(),
            status: "exit code 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "command `sudo pacman -Su --noconfirm` failed: exit code 1"
        );
    }
}

//! Error types for configuration loading, resolution and execution

use std::io;
use thiserror::Error;

/// Everything that can go wrong between finding `xc.yaml` and the end of
/// the launched process.
#[derive(Debug, Error)]
pub enum XcError {
    #[error("No xc.yaml found in the current directory. Create one with a 'commands' section to get started.")]
    ConfigNotFound,

    #[error("Invalid xc.yaml: {0}")]
    InvalidConfig(String),

    #[error("Unknown command '{name}'. Available commands: {}.", .available.join(", "))]
    UnknownCommand {
        name: String,
        /// Sorted names of every configured command
        available: Vec<String>,
    },

    #[error("{}", unknown_variant_message(.command, .variant, .available))]
    UnknownVariant {
        command: String,
        variant: String,
        /// Sorted variant names of `command`; empty when none are defined
        available: Vec<String>,
    },

    #[error("xcodebuild exited with code {0}.")]
    BuildFailed(i32),

    #[error("Hook '{label}' failed with exit code {code}.")]
    HookFailed { label: String, code: i32 },

    #[error("Failed to parse YAML: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn unknown_variant_message(command: &str, variant: &str, available: &[String]) -> String {
    if available.is_empty() {
        format!(
            "Unknown variant '{}' for command '{}'. No variants are defined.",
            variant, command
        )
    } else {
        format!(
            "Unknown variant '{}' for command '{}'. Available variants: {}.",
            variant,
            command,
            available.join(", ")
        )
    }
}

impl XcError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            XcError::ConfigNotFound => 1,
            XcError::InvalidConfig(_) => 1,
            XcError::Parse(_) => 1,
            XcError::UnknownCommand { .. } => 2,
            XcError::UnknownVariant { .. } => 2,
            XcError::BuildFailed(code) => nonzero(*code),
            XcError::HookFailed { code, .. } => nonzero(*code),
            XcError::Io(_) => 1,
        }
    }
}

// Signal-terminated children report -1; never exit 0 on failure.
fn nonzero(code: i32) -> i32 {
    if code > 0 {
        code
    } else {
        1
    }
}

impl From<serde_yaml::Error> for XcError {
    fn from(err: serde_yaml::Error) -> Self {
        XcError::Parse(err.to_string())
    }
}

/// Result type for xc operations
pub type XcResult<T> = Result<T, XcError>;

//! Error types for smoothscroll

use thiserror::Error;

/// Errors surfaced to callers of scroll operations
///
/// Only malformed options ever fail a call. Detached targets and absent
/// options are silent no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrollError {
    /// A structured-options argument that is not an object (the host's `TypeError`)
    #[error("Failed to execute '{method}' on '{interface}': parameter 1 ('options') is not an object.")]
    InvalidArgument {
        method: &'static str,
        interface: &'static str,
    },
}

impl ScrollError {
    pub fn invalid_argument(method: &'static str, interface: &'static str) -> Self {
        Self::InvalidArgument { method, interface }
    }
}

/// Errors from loading engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration text is not valid TOML for [`crate::EngineConfig`]
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for scroll operations
pub type Result<T> = std::result::Result<T, ScrollError>;

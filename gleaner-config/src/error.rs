//! Configuration error types.

use gleaner_core::ServiceKind;
use thiserror::Error;

/// Errors raised while loading, saving or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Required credential not present in the environment.
    #[error("No {service} token: set the {env} environment variable")]
    MissingToken {
        /// Service that needs the token.
        service: ServiceKind,
        /// Environment variable that was checked.
        env: String,
    },

    /// A setting has an unusable value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns true if the user can fix this by exporting a variable.
    pub fn is_missing_token(&self) -> bool {
        matches!(self, Self::MissingToken { .. })
    }
}

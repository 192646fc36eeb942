//! Error taxonomy of the resource handlers
//!
//! Every variant ends an invocation with a FAILED response whose reason is
//! the variant's display text. Lookup errors never show up here: the
//! identity scheme turns them into "does not exist".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Bad input shape, detected before any connection attempt
    #[error("invalid resource properties: {0}")]
    Validation(String),

    /// Connection descriptor recognized but malformed
    #[error("{0}")]
    Config(String),

    /// Could not establish a connection
    #[error("Failed to connect, {0}")]
    Connection(String),

    /// Credential reference could not be resolved
    #[error("Could not obtain password using name {name}, {reason}")]
    SecretNotFound { name: String, reason: String },

    /// A mutating statement failed
    #[error("{0}")]
    Mutation(#[from] tdskit::Error),

    /// The operation is deliberately disallowed
    #[error("{0}")]
    Policy(String),

    /// A mutation succeeded but its object cannot be looked up
    #[error("{0} not found after the change")]
    Unresolved(String),
}

impl ProviderError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn policy(reason: impl Into<String>) -> Self {
        Self::Policy(reason.into())
    }

    /// Human-readable reason for the response.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

//! Error types for Companies House lookups.
//!
//! Root lookups surface these verbatim to the caller; lookups deeper in the
//! ownership tree are downgraded to a status flag on the affected node,
//! carrying only the [`ErrorKind`].

use thiserror::Error;

/// Broad classification of a registry failure.
///
/// Preserved on ownership-tree nodes whose lookup failed mid-traversal, so a
/// renderer can distinguish "check the company number" from "check your API
/// key" without holding the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidIdentifier,
    Auth,
    NotFound,
    Transport,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid-identifier",
            Self::Auth => "auth",
            Self::NotFound => "not-found",
            Self::Transport => "transport",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the Companies House client.
///
/// No variant is retried anywhere in this crate; retry policy belongs to
/// callers.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Input failed company-number validation. Detected before any I/O.
    #[error(
        "invalid company number '{number}': expected 8 alphanumeric characters, \
         e.g. 01234567 or SC123456"
    )]
    InvalidIdentifier { number: String },

    /// The configured API key is missing, empty, or was rejected (401/403).
    #[error("Companies House rejected the credential: {detail}")]
    Auth { detail: String },

    /// The registry has no company under this number (404).
    #[error("company {number} not found")]
    NotFound { number: String },

    /// Network failure, timeout, decode failure, or unexpected status.
    #[error("transport failure calling {endpoint}: {detail}")]
    Transport {
        endpoint: String,
        /// HTTP status, when the failure was an unexpected response rather
        /// than a connection-level error.
        status: Option<u16>,
        detail: String,
    },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }
}

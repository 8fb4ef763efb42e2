//! Error types for route registration and configuration.
//!
//! Request-time conditions (no matching route, method not allowed, failed
//! CORS preflight) are never errors: they resolve to a handler. Errors only
//! surface while building a [`Router`](crate::Router) or loading its
//! [`Config`](crate::Config).
//!
//! # Design
//!
//! This module uses an opaque `Error` struct paired with an `ErrorKind` enum,
//! following the `std::io::Error` pattern. Internal error sources can change
//! without breaking consumers that match on the kind.
//!
//! # Example
//!
//! ```rust
//! use route_trie::{Error, ErrorKind};
//!
//! let error = Error::invalid_pattern("users/:id", "pattern must start with '/'");
//!
//! match error.kind() {
//!     ErrorKind::InvalidPattern => println!("bad route: {}", error),
//!     _ => println!("other error: {}", error),
//! }
//! assert_eq!(error.error_code(), "INVALID_PATTERN");
//! ```

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
///
/// This enum is marked `#[non_exhaustive]`, so new variants may be added
/// without breaking existing code. Always include a wildcard arm when
/// matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A method token that is not one of the nine standard HTTP methods.
    #[error("invalid method")]
    InvalidMethod,

    /// A route pattern that cannot be inserted into the tree.
    #[error("invalid route pattern")]
    InvalidPattern,

    /// Configuration error (invalid TOML, bad CORS values, repeated overrides).
    #[error("configuration error")]
    Configuration,

    /// I/O error (reading configuration files, binding listeners).
    #[error("I/O error")]
    Io,
}

/// An error that can occur while building or configuring a router.
///
/// Use [`Error::kind()`] to determine the category of error and the
/// `Display` implementation to get a human-readable message.
///
/// ```rust
/// use route_trie::{Error, ErrorKind};
///
/// let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
/// let err = Error::new(ErrorKind::Io, io_err);
/// assert_eq!(err.kind(), ErrorKind::Io);
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns a stable identifier for this error, suitable for logs.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidMethod => "INVALID_METHOD",
            ErrorKind::InvalidPattern => "INVALID_PATTERN",
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates an error for a method token outside the standard set.
    pub fn invalid_method(method: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::InvalidMethod,
            format!("Invalid method `{method}`: expected one of CONNECT, DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT, TRACE"),
        )
    }

    /// Creates an error for a route pattern that cannot be registered.
    pub fn invalid_pattern(pattern: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::InvalidPattern,
            format!("Invalid route pattern `{pattern}`: {reason}"),
        )
    }

    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an I/O error from a `std::io::Error`.
    pub fn from_io(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

// ============================================================================
// Tests
// ============================================================================

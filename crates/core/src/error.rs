//! Authorization error model.

use thiserror::Error;

/// Result type used across the engine.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Authorization-level error.
///
/// `Unauthorized` is an expected decision outcome, not a bug. The other
/// variants indicate assembly or deployment problems and should not occur in
/// a correctly wired system. None of these are transient; callers must not
/// retry them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The authorization decision was "denied".
    #[error("unauthorized")]
    Unauthorized,

    /// No factory or mapper is registered for the requested type.
    #[error("resource not supported: {0}")]
    ResourceNotSupported(String),

    /// A malformed condition tree or entity snapshot was supplied.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AuthzError {
    pub fn resource_not_supported(msg: impl Into<String>) -> Self {
        Self::ResourceNotSupported(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

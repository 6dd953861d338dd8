//! Error types module
//!
//! All gateway failures are unified under the `GatewayError` enum. The variants
//! follow a fixed taxonomy: validation and resolution failures are produced
//! before any store interaction, capability/not-found/conflict failures are
//! deterministic outcomes of an operation, and backend failures are transient
//! store-side errors the caller (or the durable host's retry policy) may retry.
//!
//! The gateway performs no local recovery; every error is propagated to the
//! caller tagged with enough context to tell the kinds apart.

use thiserror::Error;

/// A single failed path within a multi-path delete.
///
/// Delete attempts every requested path; failures are reported per path rather
/// than collapsed into one opaque error.
#[derive(Debug, Error)]
#[error("{path}: {source}")]
pub struct DeleteFailure {
    /// The path as it appeared in the request.
    pub path: String,
    #[source]
    pub source: Box<GatewayError>,
}

/// Gateway operation errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed or incomplete request. Never reaches a store, never retried.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The store handle could not be produced: malformed URL, unsupported
    /// scheme, or misconfigured backend. Safe to retry after fixing the
    /// configuration or the request URL.
    #[error("failed to resolve object store: {0}")]
    Resolution(String),

    /// Sign was requested against a backend that cannot produce signed URLs.
    /// Deterministic; retrying never helps.
    #[error("sign is not supported by {backend} object stores")]
    UnsupportedCapability { backend: String },

    /// The referenced object does not exist.
    #[error("object not found: {path}")]
    NotFound { path: String },

    /// The destination exists and the request forbade overwriting it.
    #[error("destination already exists: {path}")]
    AlreadyExists { path: String },

    /// Some paths of a multi-path delete failed. Paths not listed in
    /// `failures` were deleted.
    #[error("delete failed for {} of {attempted} paths", .failures.len())]
    PartialDelete {
        attempted: usize,
        failures: Vec<DeleteFailure>,
    },

    /// The operation's contract is defined but its body is intentionally not
    /// implemented.
    #[error("{operation} is not implemented")]
    Unimplemented { operation: &'static str },

    /// Unexpected gateway-side failure (e.g. result serialization).
    #[error("internal error: {0}")]
    Internal(String),

    /// Transient store-side failure, propagated verbatim. Whether to retry the
    /// whole invocation is the durable host's decision, not ours.
    #[error("object store error: {0}")]
    Backend(String),
}

impl GatewayError {
    /// Machine-readable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "VALIDATION_ERROR",
            GatewayError::Resolution(_) => "RESOLUTION_ERROR",
            GatewayError::UnsupportedCapability { .. } => "UNSUPPORTED_CAPABILITY",
            GatewayError::NotFound { .. } => "NOT_FOUND",
            GatewayError::AlreadyExists { .. } => "ALREADY_EXISTS",
            GatewayError::PartialDelete { .. } => "PARTIAL_DELETE",
            GatewayError::Unimplemented { .. } => "NOT_IMPLEMENTED",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
            GatewayError::Backend(_) => "BACKEND_ERROR",
        }
    }

    /// Whether retrying the invocation could succeed. Only resolution and
    /// backend failures are transient; everything else is deterministic.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GatewayError::Resolution(_) | GatewayError::Backend(_)
        )
    }
}

//! Error types for the access gate.

/// Errors surfaced by the access gate.
///
/// Most degraded conditions (malformed header, unknown data-source kind,
/// unknown item id, denied item) are expressed as ordinary values and never
/// reach this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessGateError {
    /// The operation is intentionally not implemented and must not be
    /// treated as either allow or deny.
    #[error("operation not supported: {operation}")]
    Unsupported { operation: &'static str },

    /// A policy or envelope would violate the role / allow-list rules.
    #[error("invalid policy: {reason}")]
    InvalidPolicy { reason: String },
}

impl AccessGateError {
    #[must_use]
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    #[must_use]
    pub fn invalid_policy(reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            reason: reason.into(),
        }
    }
}

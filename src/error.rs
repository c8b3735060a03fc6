//! Error types for the motion-list engine.
//!
//! All failures are local and synchronous: they surface at the call that
//! violated a contract, and a failed construction leaves the owning
//! [`MotionList`](crate::MotionList) unchanged. The engine performs no
//! retries and never swallows an error on the caller's behalf.

use thiserror::Error;

/// Errors raised by spaces, exclusions, layers, registries, and the
/// motion-list orchestrator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotionError {
    /// Malformed or out-of-domain parameters for a space, axis, exclusion,
    /// or layer. Raised at construction time, never deferred.
    #[error("Invalid {item}: {reason}")]
    Validation {
        /// The item family being constructed (e.g. `"axis"`, `"divider exclusion"`).
        item: &'static str,
        /// What the parameters violated.
        reason: String,
    },

    /// Factory lookup failed: no constructor is registered under this tag.
    #[error("Unknown {registry} type '{kind}'")]
    UnknownKind {
        /// The registry queried (`"exclusion"` or `"layer"`).
        registry: &'static str,
        /// The tag that failed to resolve.
        kind: String,
    },

    /// A constructor was registered under a tag that is already taken.
    /// This is a startup-time configuration error, not a runtime condition.
    #[error("Duplicate {registry} type '{kind}': tag is already registered")]
    DuplicateKind {
        registry: &'static str,
        kind: String,
    },

    /// A point or parameter array's dimensionality disagrees with the
    /// space's axis count.
    #[error("Dimension mismatch: expected {expected} coordinate(s), got {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl MotionError {
    pub(crate) fn validation(item: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            item,
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MotionError>;

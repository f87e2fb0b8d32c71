//! Error taxonomy shared by every service.

use std::fmt;

/// Coarse classification an outer transport maps onto response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input, rejected before any write.
    Validation,
    /// Role or ownership mismatch, rejected before any read.
    Authorization,
    NotFound,
    /// The request is well-formed but clashes with current state.
    Conflict,
    /// Storage or collaborator failure.
    Internal,
}

impl ErrorKind {
    /// Whether this is the caller's fault (4xx) rather than ours (5xx).
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        })
    }
}

//! Authorization errors.

use thiserror::Error;

use crate::auth::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("{caller} may not access resources belonging to {target}")]
    NotOwner { caller: String, target: String },

    #[error("role {role} is not permitted to perform this operation")]
    RoleNotPermitted { role: Role },
}

/// Returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRoleError(pub String);

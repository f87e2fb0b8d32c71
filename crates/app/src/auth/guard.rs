//! Role gating.
//!
//! Every check here is pure: callers run it before reading protected state,
//! so a rejected caller never reaches storage.

use crate::auth::{AuthorizationError, Caller, Role};

/// Admins and salesmen may act on any customer; a customer only on themselves.
///
/// # Errors
///
/// Returns [`AuthorizationError::NotOwner`] when a customer targets someone
/// else's resources.
pub fn authorize_customer_access(
    caller: &Caller,
    target_email: &str,
) -> Result<(), AuthorizationError> {
    if caller.role.is_staff() || caller.email == target_email {
        return Ok(());
    }

    Err(AuthorizationError::NotOwner {
        caller: caller.email.clone(),
        target: target_email.to_string(),
    })
}

/// Only admins and salesmen pass.
///
/// # Errors
///
/// Returns [`AuthorizationError::RoleNotPermitted`] for customers.
pub fn require_staff(caller: &Caller) -> Result<(), AuthorizationError> {
    if caller.role.is_staff() {
        Ok(())
    } else {
        Err(AuthorizationError::RoleNotPermitted { role: caller.role })
    }
}

/// Only admins pass.
///
/// # Errors
///
/// Returns [`AuthorizationError::RoleNotPermitted`] for any other role.
pub fn require_admin(caller: &Caller) -> Result<(), AuthorizationError> {
    if caller.role == Role::Admin {
        Ok(())
    } else {
        Err(AuthorizationError::RoleNotPermitted { role: caller.role })
    }
}

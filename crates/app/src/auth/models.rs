//! Caller models.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::auth::UnknownRoleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Salesman,
    Customer,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Salesman => "salesman",
            Self::Customer => "customer",
        }
    }

    /// Staff roles may act on any customer's cart.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Salesman)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "salesman" => Ok(Self::Salesman),
            "customer" => Ok(Self::Customer),
            other => Err(UnknownRoleError(other.to_string())),
        }
    }
}

/// An already-authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub email: String,
    pub role: Role,
}

impl Caller {
    #[must_use]
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    #[must_use]
    pub fn admin(email: impl Into<String>) -> Self {
        Self::new(email, Role::Admin)
    }

    #[must_use]
    pub fn salesman(email: impl Into<String>) -> Self {
        Self::new(email, Role::Salesman)
    }

    #[must_use]
    pub fn customer(email: impl Into<String>) -> Self {
        Self::new(email, Role::Customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_known_names() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("salesman".parse::<Role>(), Ok(Role::Salesman));
        assert_eq!("customer".parse::<Role>(), Ok(Role::Customer));
    }

    #[test]
    fn role_rejects_unknown_names() {
        assert_eq!(
            "Admin".parse::<Role>(),
            Err(UnknownRoleError("Admin".to_string()))
        );
    }
}

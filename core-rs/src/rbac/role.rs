//! Role hierarchy
//!
//! Roles are matched by exact, case-sensitive name. Anything outside the
//! closed set has level 0 and fails every check above level 0.

use std::fmt;
use std::str::FromStr;

use crate::errors::ConsoleError;

/// Console role, ordered by privilege level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Viewer,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Viewer];

    /// Hierarchy level (higher number = more permissions)
    pub fn level(self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Manager => 2,
            Role::Viewer => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Viewer => "Viewer",
        }
    }

    /// Parse a role name, returning None for anything unrecognized
    pub fn parse_lenient(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse_lenient(s)
            .ok_or_else(|| ConsoleError::Validation(format!("Unknown role: {}", s)))
    }
}

/// Level for a role name; unknown names are 0
pub fn role_level(role: &str) -> u8 {
    Role::parse_lenient(role).map(Role::level).unwrap_or(0)
}

/// Check if `user_role` meets the minimum `required_role`
///
/// # Example
/// ```
/// use sesc_core::rbac::can_access;
///
/// assert!(can_access("Admin", "Manager"));
/// assert!(!can_access("Viewer", "Manager"));
/// ```
pub fn can_access(user_role: &str, required_role: &str) -> bool {
    role_level(user_role) >= role_level(required_role)
}

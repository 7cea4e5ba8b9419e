//! Named capability checks
//!
//! Each capability delegates to [`can_access`]; none of them carries state.
//! An absent role is checked as the empty string, i.e. zero privilege.

use serde::Serialize;

use super::role::{can_access, Role};

fn role_str(role: Option<&str>) -> &str {
    role.unwrap_or("")
}

/// Send campaigns (Manager and above)
pub fn can_send_campaign(role: Option<&str>) -> bool {
    can_access(role_str(role), Role::Manager.as_str())
}

/// Manage contact lists (Manager and above)
pub fn can_manage_contacts(role: Option<&str>) -> bool {
    can_access(role_str(role), Role::Manager.as_str())
}

/// Manage users (Admin only)
pub fn can_manage_users(role: Option<&str>) -> bool {
    role == Some(Role::Admin.as_str())
}

/// View campaign stats (Viewer and above)
pub fn can_view_stats(role: Option<&str>) -> bool {
    can_access(role_str(role), Role::Viewer.as_str())
}

/// All capabilities for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub can_send_campaign: bool,
    pub can_manage_contacts: bool,
    pub can_manage_users: bool,
    pub can_view_stats: bool,
}

pub fn role_permissions(role: Option<&str>) -> RolePermissions {
    RolePermissions {
        can_send_campaign: can_send_campaign(role),
        can_manage_contacts: can_manage_contacts(role),
        can_manage_users: can_manage_users(role),
        can_view_stats: can_view_stats(role),
    }
}

/// Permission checker bound to one user's role
#[derive(Debug, Clone)]
pub struct PermissionChecker {
    role: Option<String>,
}

impl PermissionChecker {
    pub fn for_role(role: Option<&str>) -> Self {
        PermissionChecker {
            role: role.map(str::to_string),
        }
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// True if the role passes at least one of `allowed`
    ///
    /// An empty list means no restriction.
    pub fn allows_any(&self, allowed: &[String]) -> bool {
        allowed.is_empty()
            || allowed
                .iter()
                .any(|required| can_access(role_str(self.role()), required))
    }

    pub fn permissions(&self) -> RolePermissions {
        role_permissions(self.role())
    }
}

//! RBAC (Role-Based Access Control) module
//!
//! Role hierarchy for the campaign console and the capability checks
//! derived from it. Everything here is pure: no state, no errors.

pub mod role;
pub mod permission_checker;

pub use role::{can_access, role_level, Role};
pub use permission_checker::{
    can_manage_contacts, can_manage_users, can_send_campaign, can_view_stats, role_permissions,
    PermissionChecker, RolePermissions,
};

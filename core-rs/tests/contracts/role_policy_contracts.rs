// Role Policy Contract Tests
//
// The hierarchy is monotone: access is granted exactly when the user's level
// is at least the required level. Unknown roles are level 0.

use sesc_core::rbac::{can_access, role_level, role_permissions, Role};

/// WHY: Every pair of known roles must follow level comparison
#[test]
fn access_is_monotone_in_level() {
    for user in Role::ALL {
        for required in Role::ALL {
            assert_eq!(
                can_access(user.as_str(), required.as_str()),
                user.level() >= required.level(),
                "{} vs {}",
                user,
                required
            );
        }
    }
}

#[test]
fn documented_examples() {
    assert!(can_access("Admin", "Manager"));
    assert!(!can_access("Viewer", "Manager"));
}

/// WHY: Unrecognized role strings are zero-privilege, never an error
#[test]
fn unknown_roles_are_level_zero() {
    for name in ["", "admin", "Owner", "Manager ", "VIEWER"] {
        assert_eq!(role_level(name), 0, "{:?}", name);
        for required in Role::ALL {
            assert!(!can_access(name, required.as_str()));
        }
    }
}

/// WHY: Capability helpers only delegate; a higher role never loses one
#[test]
fn capabilities_grow_with_level() {
    let viewer = role_permissions(Some("Viewer"));
    let manager = role_permissions(Some("Manager"));
    let admin = role_permissions(Some("Admin"));

    for (lower, higher) in [(viewer, manager), (manager, admin)] {
        assert!(!lower.can_send_campaign || higher.can_send_campaign);
        assert!(!lower.can_manage_contacts || higher.can_manage_contacts);
        assert!(!lower.can_manage_users || higher.can_manage_users);
        assert!(!lower.can_view_stats || higher.can_view_stats);
    }
}

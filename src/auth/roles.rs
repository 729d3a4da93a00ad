use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Closed set of caller roles, ordered from least to most privileged.
/// Unknown role strings never map into this enum, they are rejected at
/// the edge instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(role: &str) -> Result<Role, Self::Err> {
        match role {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            unknown => Err(format!("unknown role: {}", unknown)),
        }
    }
}

/// Every action the platform gates on. Grants are looked up in
/// [`struct@ROLE_PERMISSIONS`], never matched on ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageAdmins,
    ViewAllAdmins,
    ActivateAdmin,
    DeactivateAdmin,
    ViewAdminStats,
    ManagePlatformSettings,
    CreateGround,
    UpdateOwnGround,
    DeleteOwnGround,
    ViewOwnGrounds,
    ManageOwnBookings,
    ApproveBooking,
    DenyBooking,
    ViewOwnEarnings,
    ManageGroundSlots,
    ViewAvailableGrounds,
    CreateBooking,
    ViewOwnBookings,
    CancelOwnBooking,
    UpdateProfile,
    ViewBookingHistory,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageAdmins => "manage_admins",
            Permission::ViewAllAdmins => "view_all_admins",
            Permission::ActivateAdmin => "activate_admin",
            Permission::DeactivateAdmin => "deactivate_admin",
            Permission::ViewAdminStats => "view_admin_stats",
            Permission::ManagePlatformSettings => "manage_platform_settings",
            Permission::CreateGround => "create_ground",
            Permission::UpdateOwnGround => "update_own_ground",
            Permission::DeleteOwnGround => "delete_own_ground",
            Permission::ViewOwnGrounds => "view_own_grounds",
            Permission::ManageOwnBookings => "manage_own_bookings",
            Permission::ApproveBooking => "approve_booking",
            Permission::DenyBooking => "deny_booking",
            Permission::ViewOwnEarnings => "view_own_earnings",
            Permission::ManageGroundSlots => "manage_ground_slots",
            Permission::ViewAvailableGrounds => "view_available_grounds",
            Permission::CreateBooking => "create_booking",
            Permission::ViewOwnBookings => "view_own_bookings",
            Permission::CancelOwnBooking => "cancel_own_booking",
            Permission::UpdateProfile => "update_profile",
            Permission::ViewBookingHistory => "view_booking_history",
        }
    }

    /// Permissions that target one owner's resources, enforced by
    /// comparing the requester against the owner of the targeted
    /// resource. Slot and blackout management sits here too, an admin
    /// only schedules their own grounds.
    fn ownership_scoped(&self) -> bool {
        matches!(
            self,
            Permission::UpdateOwnGround
                | Permission::DeleteOwnGround
                | Permission::ViewOwnGrounds
                | Permission::ManageOwnBookings
                | Permission::ManageGroundSlots
                | Permission::ViewOwnEarnings
                | Permission::ViewOwnBookings
                | Permission::CancelOwnBooking
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

lazy_static! {
    /// The full grant table. Admins keep the regular booking permissions
    /// on top of their ground-management ones, super admins manage the
    /// platform itself and book like anyone else.
    pub static ref ROLE_PERMISSIONS: HashMap<Role, HashSet<Permission>> = {
        let mut table = HashMap::new();

        table.insert(
            Role::User,
            [
                Permission::ViewAvailableGrounds,
                Permission::CreateBooking,
                Permission::ViewOwnBookings,
                Permission::CancelOwnBooking,
                Permission::UpdateProfile,
                Permission::ViewBookingHistory,
            ]
            .iter()
            .copied()
            .collect(),
        );

        table.insert(
            Role::Admin,
            [
                Permission::CreateGround,
                Permission::UpdateOwnGround,
                Permission::DeleteOwnGround,
                Permission::ViewOwnGrounds,
                Permission::ManageOwnBookings,
                Permission::ApproveBooking,
                Permission::DenyBooking,
                Permission::ViewOwnEarnings,
                Permission::ManageGroundSlots,
                Permission::ViewAvailableGrounds,
                Permission::CreateBooking,
                Permission::ViewOwnBookings,
                Permission::CancelOwnBooking,
                Permission::UpdateProfile,
                Permission::ViewBookingHistory,
            ]
            .iter()
            .copied()
            .collect(),
        );

        table.insert(
            Role::SuperAdmin,
            [
                Permission::ManageAdmins,
                Permission::ViewAllAdmins,
                Permission::ActivateAdmin,
                Permission::DeactivateAdmin,
                Permission::ViewAdminStats,
                Permission::ManagePlatformSettings,
                Permission::ViewAvailableGrounds,
                Permission::CreateBooking,
                Permission::ViewOwnBookings,
                Permission::CancelOwnBooking,
                Permission::UpdateProfile,
                Permission::ViewBookingHistory,
            ]
            .iter()
            .copied()
            .collect(),
        );

        table
    };
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    ROLE_PERMISSIONS
        .get(&role)
        .map(|grants| grants.contains(&permission))
        .unwrap_or(false)
}

/// Role check plus the ownership refinement. The owner comparison only
/// applies when the permission is ownership scoped and both ids are
/// known, a missing id on either side degrades to the plain role check.
pub fn can_access(
    role: Role,
    permission: Permission,
    requester_id: Option<i64>,
    resource_owner_id: Option<i64>,
) -> bool {
    if !has_permission(role, permission) {
        return false;
    }

    if permission.ownership_scoped() {
        if let (Some(requester), Some(owner)) = (requester_id, resource_owner_id) {
            return requester == owner;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_strings() {
        for role in &[Role::User, Role::Admin, Role::SuperAdmin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(*role));
        }
        assert!("groundskeeper".parse::<Role>().is_err());
    }

    #[test]
    fn users_can_book_but_not_manage_grounds() {
        assert!(has_permission(Role::User, Permission::CreateBooking));
        assert!(has_permission(Role::User, Permission::CancelOwnBooking));
        assert!(!has_permission(Role::User, Permission::CreateGround));
        assert!(!has_permission(Role::User, Permission::ManageGroundSlots));
        assert!(!has_permission(Role::User, Permission::ManagePlatformSettings));
    }

    #[test]
    fn admins_manage_grounds_and_still_book() {
        assert!(has_permission(Role::Admin, Permission::CreateGround));
        assert!(has_permission(Role::Admin, Permission::ManageGroundSlots));
        assert!(has_permission(Role::Admin, Permission::CreateBooking));
        assert!(!has_permission(Role::Admin, Permission::ManageAdmins));
    }

    #[test]
    fn super_admins_run_the_platform_not_the_grounds() {
        assert!(has_permission(Role::SuperAdmin, Permission::ManagePlatformSettings));
        assert!(has_permission(Role::SuperAdmin, Permission::ManageAdmins));
        assert!(!has_permission(Role::SuperAdmin, Permission::CreateGround));
        assert!(!has_permission(Role::SuperAdmin, Permission::ManageGroundSlots));
    }

    #[test]
    fn ownership_scoped_permissions_compare_ids() {
        assert!(can_access(Role::Admin, Permission::UpdateOwnGround, Some(7), Some(7)));
        assert!(!can_access(Role::Admin, Permission::UpdateOwnGround, Some(7), Some(8)));
    }

    #[test]
    fn slot_management_is_bound_to_the_grounds_owner() {
        assert!(can_access(Role::Admin, Permission::ManageGroundSlots, Some(7), Some(7)));
        assert!(!can_access(Role::Admin, Permission::ManageGroundSlots, Some(7), Some(8)));
    }

    #[test]
    fn missing_ids_fall_back_to_the_role_check() {
        assert!(can_access(Role::Admin, Permission::UpdateOwnGround, Some(7), None));
        assert!(can_access(Role::Admin, Permission::UpdateOwnGround, None, Some(8)));
        assert!(!can_access(Role::User, Permission::UpdateOwnGround, None, None));
    }

    #[test]
    fn unscoped_permissions_ignore_the_owner() {
        assert!(can_access(Role::User, Permission::CreateBooking, Some(1), Some(999)));
    }
}

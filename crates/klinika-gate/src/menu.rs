//! Role-derived dashboard menu.
//!
//! The menu is a static table filtered per role at render time. Visibility
//! here is a UI concern only; the gate's entitlement rules decide whether a
//! navigation actually proceeds, so hiding an entry never substitutes for
//! blocking its route.

use serde::Serialize;

use klinika_types::Role;

// ============================================================================
// Menu Table
// ============================================================================

/// One top-level menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub path: &'static str,
    /// Roles that see this entry.
    pub roles: &'static [Role],
    pub children: &'static [MenuChild],
}

/// One nested menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuChild {
    pub label: &'static str,
    pub path: &'static str,
    /// Roles that see this child; `None` inherits the parent's visibility.
    pub roles: Option<&'static [Role]>,
}

const ALL_ROLES: &[Role] = &[
    Role::Doctor,
    Role::Nurse,
    Role::Pharmacist,
    Role::Receptionist,
    Role::ClinicOwner,
    Role::Superadmin,
];

const CLINICAL: &[Role] = &[
    Role::Doctor,
    Role::Nurse,
    Role::Receptionist,
    Role::ClinicOwner,
];

const PHARMACY: &[Role] = &[Role::Pharmacist, Role::ClinicOwner];

const FRONT_DESK: &[Role] = &[Role::Receptionist, Role::ClinicOwner];

const OWNER: &[Role] = &[Role::ClinicOwner];

const PLATFORM: &[Role] = &[Role::Superadmin];

/// The dashboard menu, in display order.
pub static DASHBOARD_MENU: &[MenuEntry] = &[
    MenuEntry {
        label: "Dashboard",
        path: "/dashboard",
        roles: ALL_ROLES,
        children: &[],
    },
    MenuEntry {
        label: "Patients",
        path: "/patients",
        roles: CLINICAL,
        children: &[],
    },
    MenuEntry {
        label: "Appointments",
        path: "/appointments",
        roles: CLINICAL,
        children: &[],
    },
    MenuEntry {
        label: "Pharmacy",
        path: "/pharmacy",
        roles: PHARMACY,
        children: &[],
    },
    MenuEntry {
        label: "Billing",
        path: "/billing",
        roles: FRONT_DESK,
        children: &[
            MenuChild {
                label: "Invoices",
                path: "/billing/invoices",
                roles: None,
            },
            MenuChild {
                label: "Tax Settings",
                path: "/billing/tax",
                roles: Some(OWNER),
            },
        ],
    },
    MenuEntry {
        label: "Inventory",
        path: "/inventory",
        roles: PHARMACY,
        children: &[],
    },
    MenuEntry {
        label: "Master Data",
        path: "/master",
        roles: OWNER,
        children: &[
            MenuChild {
                label: "Users",
                path: "/master/users",
                roles: None,
            },
            MenuChild {
                label: "Accounts",
                path: "/master/accounts",
                roles: None,
            },
            MenuChild {
                label: "Branches",
                path: "/master/branches",
                roles: None,
            },
        ],
    },
    MenuEntry {
        label: "Subscription",
        path: "/subscription",
        roles: OWNER,
        children: &[
            MenuChild {
                label: "Change Plan",
                path: "/subscription/change",
                roles: None,
            },
            MenuChild {
                label: "User Plan",
                path: "/subscription/user-plan",
                roles: None,
            },
        ],
    },
    MenuEntry {
        label: "Administration",
        path: "/admin",
        roles: PLATFORM,
        children: &[
            MenuChild {
                label: "Facilities",
                path: "/admin/facilities",
                roles: None,
            },
            MenuChild {
                label: "Plans",
                path: "/admin/plans",
                roles: None,
            },
        ],
    },
];

// ============================================================================
// Filtered View
// ============================================================================

/// A menu entry visible to one role, with its visible children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub children: Vec<VisibleChild>,
}

/// A nested entry visible to one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleChild {
    pub label: &'static str,
    pub path: &'static str,
}

/// Filters the menu for one role, preserving display order.
pub fn visible_menu(role: Role) -> Vec<VisibleEntry> {
    DASHBOARD_MENU
        .iter()
        .filter(|entry| entry.roles.contains(&role))
        .map(|entry| VisibleEntry {
            label: entry.label,
            path: entry.path,
            children: entry
                .children
                .iter()
                .filter(|child| child.roles.is_none_or(|roles| roles.contains(&role)))
                .map(|child| VisibleChild {
                    label: child.label,
                    path: child.path,
                })
                .collect(),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn paths_for(role: Role) -> Vec<&'static str> {
        visible_menu(role).iter().map(|entry| entry.path).collect()
    }

    #[test_case(Role::Doctor, "/patients", true; "doctor sees patients")]
    #[test_case(Role::Pharmacist, "/patients", false; "pharmacist lacks patients")]
    #[test_case(Role::Pharmacist, "/pharmacy", true; "pharmacist sees pharmacy")]
    #[test_case(Role::Nurse, "/pharmacy", false; "nurse lacks pharmacy")]
    #[test_case(Role::Receptionist, "/billing", true; "receptionist sees billing")]
    #[test_case(Role::Doctor, "/billing", false; "doctor lacks billing")]
    #[test_case(Role::ClinicOwner, "/master", true; "owner sees master data")]
    #[test_case(Role::Nurse, "/master", false; "nurse lacks master data")]
    #[test_case(Role::ClinicOwner, "/subscription", true; "owner sees subscription")]
    #[test_case(Role::Superadmin, "/admin", true; "superadmin sees administration")]
    #[test_case(Role::ClinicOwner, "/admin", false; "owner lacks administration")]
    fn menu_visibility(role: Role, path: &str, visible: bool) {
        assert_eq!(paths_for(role).contains(&path), visible);
    }

    #[test]
    fn every_role_sees_the_dashboard() {
        for role in [
            Role::Doctor,
            Role::Nurse,
            Role::Pharmacist,
            Role::Receptionist,
            Role::ClinicOwner,
            Role::Superadmin,
        ] {
            assert!(paths_for(role).contains(&"/dashboard"), "{role} lost the dashboard");
        }
    }

    #[test]
    fn owner_master_data_lists_all_children_in_order() {
        let menu = visible_menu(Role::ClinicOwner);
        let master = menu
            .iter()
            .find(|entry| entry.path == "/master")
            .unwrap();
        let children: Vec<&str> = master.children.iter().map(|child| child.path).collect();
        assert_eq!(children, ["/master/users", "/master/accounts", "/master/branches"]);
    }

    #[test]
    fn child_role_lists_narrow_the_parents_visibility() {
        let menu = visible_menu(Role::Receptionist);
        let billing = menu
            .iter()
            .find(|entry| entry.path == "/billing")
            .unwrap();
        let children: Vec<&str> = billing.children.iter().map(|child| child.path).collect();
        assert_eq!(children, ["/billing/invoices"]);

        let menu = visible_menu(Role::ClinicOwner);
        let billing = menu
            .iter()
            .find(|entry| entry.path == "/billing")
            .unwrap();
        assert!(billing.children.iter().any(|child| child.path == "/billing/tax"));
    }

    #[test]
    fn superadmin_menu_is_platform_scoped() {
        assert_eq!(paths_for(Role::Superadmin), ["/dashboard", "/admin"]);
    }

    #[test]
    fn display_order_matches_the_table() {
        assert_eq!(
            paths_for(Role::ClinicOwner),
            [
                "/dashboard",
                "/patients",
                "/appointments",
                "/pharmacy",
                "/billing",
                "/inventory",
                "/master",
                "/subscription",
            ]
        );
    }

    #[test]
    fn remediation_routes_stay_reachable_from_the_owner_menu() {
        let menu = visible_menu(Role::ClinicOwner);
        let child_paths: Vec<&str> = menu
            .iter()
            .flat_map(|entry| entry.children.iter().map(|child| child.path))
            .collect();

        // The expiry and overage flows send owners to these screens; the
        // menu must keep offering them.
        assert!(child_paths.contains(&"/master/accounts"));
        assert!(child_paths.contains(&"/master/users"));
        assert!(child_paths.contains(&"/subscription/change"));
    }
}

//! Route allowlists and the entitlement policy.
//!
//! Allowlists are the remediation exception mechanism: while a facility is
//! expired or over its staff cap, the owner may still reach a small set of
//! routes to fix the underlying problem.

use serde::{Deserialize, Serialize};

use klinika_types::SubscriptionRecord;

/// Routes an expired facility's owner may still reach.
pub const EXPIRY_REMEDIATION_PREFIXES: [&str; 3] = [
    "/master/accounts",
    "/subscription/change",
    "/subscription/user-plan",
];

/// Routes an over-cap facility's owner may still reach.
pub const STAFF_LIMIT_REMEDIATION_PREFIXES: [&str; 3] =
    ["/master/users", "/master/accounts", "/subscription/change"];

// ============================================================================
// Path Allowlist
// ============================================================================

/// Prefix-based route allowlist.
///
/// Matching is raw `starts_with` against each prefix, not segment-aware:
/// `"/master/accounts"` also admits `"/master/accountsExtra"`. Dashboard
/// routes have relied on this since the allowlists were introduced, so the
/// overmatch is load-bearing compatibility behavior. No wildcards, no case
/// folding, no trailing-slash normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathAllowlist {
    prefixes: Vec<String>,
}

impl PathAllowlist {
    /// Creates an allowlist from route prefixes.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// The allowlist for expired-facility remediation.
    pub fn expiry_remediation() -> Self {
        Self::new(EXPIRY_REMEDIATION_PREFIXES)
    }

    /// The allowlist for staff-overage remediation.
    pub fn staff_limit_remediation() -> Self {
        Self::new(STAFF_LIMIT_REMEDIATION_PREFIXES)
    }

    /// Whether `path` starts with any listed prefix.
    pub fn allows(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    /// The configured prefixes, in order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

// ============================================================================
// Entitlement Policy
// ============================================================================

/// Deployment-tunable inputs to the evaluator.
///
/// Carries the route constants and the default staff cap; the block and
/// redirect message texts are fixed alongside the rules in
/// [`crate::evaluator`]. [`EntitlementPolicy::standard`] is the shipped
/// dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementPolicy {
    /// Where unauthenticated sessions are sent.
    pub login_path: String,
    /// The plan/renewal screen; redirect target for expired owners and the
    /// "View Plans" interstitial action.
    pub renewal_path: String,
    /// The staff list screen; the "Manage Users" interstitial action.
    pub staff_management_path: String,
    /// Routes an expired facility's owner keeps.
    pub expiry_remediation: PathAllowlist,
    /// Routes an over-cap facility's owner keeps.
    pub staff_limit_remediation: PathAllowlist,
    /// Staff cap applied when a plan document has no usable `maxStaff`.
    pub default_staff_cap: u32,
}

impl EntitlementPolicy {
    /// The shipped dashboard policy.
    pub fn standard() -> Self {
        Self {
            login_path: "/login".to_string(),
            renewal_path: "/master/accounts".to_string(),
            staff_management_path: "/master/users".to_string(),
            expiry_remediation: PathAllowlist::expiry_remediation(),
            staff_limit_remediation: PathAllowlist::staff_limit_remediation(),
            default_staff_cap: 1,
        }
    }

    /// Sets the login route.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Sets the renewal route.
    #[must_use]
    pub fn with_renewal_path(mut self, path: impl Into<String>) -> Self {
        self.renewal_path = path.into();
        self
    }

    /// Sets the staff management route.
    #[must_use]
    pub fn with_staff_management_path(mut self, path: impl Into<String>) -> Self {
        self.staff_management_path = path.into();
        self
    }

    /// Replaces the expiry remediation allowlist.
    #[must_use]
    pub fn with_expiry_remediation(mut self, allowlist: PathAllowlist) -> Self {
        self.expiry_remediation = allowlist;
        self
    }

    /// Replaces the staff-limit remediation allowlist.
    #[must_use]
    pub fn with_staff_limit_remediation(mut self, allowlist: PathAllowlist) -> Self {
        self.staff_limit_remediation = allowlist;
        self
    }

    /// Sets the fallback staff cap.
    #[must_use]
    pub fn with_default_staff_cap(mut self, cap: u32) -> Self {
        self.default_staff_cap = cap;
        self
    }

    /// The staff cap a record actually grants.
    ///
    /// Plan documents from the billing system may store `maxStaff` as null
    /// or 0; both coerce to the default cap, matching how the dashboard has
    /// always read the field.
    pub fn staff_cap_for(&self, record: &SubscriptionRecord) -> u32 {
        record
            .max_staff
            .filter(|&cap| cap != 0)
            .unwrap_or(self.default_staff_cap)
    }
}

impl Default for EntitlementPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Entitlement rule evaluation.
//!
//! Evaluates one navigation against the current session, profile,
//! subscription and staff-count snapshots. Rules apply in a fixed precedence
//! order and the first matching rule wins; expiry is checked before the
//! staff cap, so an expired facility never reaches the overage rules.

use chrono::{DateTime, Utc};

use klinika_types::{Session, Snapshot, SubscriptionRecord, UserProfile};

use crate::decision::{Decision, RemedyAction};
use crate::path_policy::EntitlementPolicy;

// ============================================================================
// User-Facing Messages
// ============================================================================

/// Shown when the profile settled to "no document" or to an unusable role.
pub const PROFILE_MISSING_MESSAGE: &str = "Profile Missing";

/// Redirect payload for the owner of an expired facility.
pub const EXPIRED_REDIRECT_REASON: &str =
    "Your subscription has expired. Please renew to continue.";

/// Shown to non-owner staff of an expired facility.
pub const EXPIRED_STAFF_MESSAGE: &str = "Access Suspended — contact your administrator.";

/// Shown to non-owner staff while the facility is over its staff cap.
pub const OVERAGE_STAFF_MESSAGE: &str =
    "Service Temporarily Paused — contact your clinic administrator.";

/// Label on the interstitial action that opens the staff list.
const MANAGE_USERS_LABEL: &str = "Manage Users";

/// Label on the interstitial action that opens the plan screen.
const VIEW_PLANS_LABEL: &str = "View Plans";

// ============================================================================
// Public API
// ============================================================================

/// Evaluates one navigation.
///
/// Deterministic, side-effect-free and total: every combination of
/// well-typed inputs produces a [`Decision`], never a panic. Time enters
/// only through `now`, supplied by the caller.
///
/// Precedence, first match wins:
///
/// 1. Unauthenticated sessions redirect to login.
/// 2. An unresolved profile keeps the navigation pending.
/// 3. A missing profile document, or one with no usable role, is a hard
///    block with logout as the only way out.
/// 4. Superadmins are allowed unconditionally.
/// 5. No facility or no subscription record means no constraints apply.
/// 6. An expired facility: the owner keeps the expiry remediation routes
///    and is otherwise redirected to renewal; staff are blocked outright.
/// 7. A facility over its staff cap: the owner keeps the staff remediation
///    routes and otherwise sees the deactivate-or-upgrade interstitial;
///    staff are blocked outright.
/// 8. Otherwise the navigation is allowed.
pub fn evaluate(
    policy: &EntitlementPolicy,
    session: &Session,
    profile: &Snapshot<UserProfile>,
    subscription: Option<&SubscriptionRecord>,
    active_staff_count: u32,
    path: &str,
    now: DateTime<Utc>,
) -> Decision {
    // Rule 1: unauthenticated sessions go to login.
    if !session.authenticated {
        return Decision::redirect(policy.login_path.clone());
    }

    // Rule 2: the profile feed has not answered yet. Nothing below may run
    // until it does, or a redirect could flash before the data arrives.
    let resolved = match profile {
        Snapshot::Unresolved => return Decision::Pending,
        Snapshot::Resolved(resolved) => resolved.as_ref(),
    };

    // Rule 3: the account exists but is unusable. Terminal for the session.
    let Some(profile) = resolved else {
        return Decision::block_hard(PROFILE_MISSING_MESSAGE);
    };
    let Some(role) = profile.role else {
        return Decision::block_hard(PROFILE_MISSING_MESSAGE);
    };

    // Rule 4: platform operators bypass every subscription rule.
    if role.is_superadmin() {
        return Decision::Allow;
    }

    // Rule 5: no facility or no record means no constraints (fail-open).
    let (Some(_), Some(record)) = (profile.facility_id.as_ref(), subscription) else {
        return Decision::Allow;
    };

    // Rule 6: expiry, checked before the staff cap.
    if record.is_expired_at(now) {
        return if role.is_clinic_owner() {
            if policy.expiry_remediation.allows(path) {
                Decision::Allow
            } else {
                Decision::redirect_with_reason(policy.renewal_path.clone(), EXPIRED_REDIRECT_REASON)
            }
        } else {
            Decision::block_hard(EXPIRED_STAFF_MESSAGE)
        };
    }

    // Rule 7: staff cap.
    let staff_cap = policy.staff_cap_for(record);
    if active_staff_count > staff_cap {
        return if role.is_clinic_owner() {
            if policy.staff_limit_remediation.allows(path) {
                Decision::Allow
            } else {
                Decision::block_interstitial(
                    overage_message(active_staff_count, staff_cap),
                    vec![
                        RemedyAction::navigate(
                            policy.staff_management_path.clone(),
                            MANAGE_USERS_LABEL,
                        ),
                        RemedyAction::navigate(policy.renewal_path.clone(), VIEW_PLANS_LABEL),
                    ],
                )
            }
        } else {
            Decision::block_hard(OVERAGE_STAFF_MESSAGE)
        };
    }

    // Rule 8: nothing objected.
    Decision::Allow
}

/// Formats the owner-facing overage message.
///
/// The deactivation count saturates at zero: a roster that shrinks between
/// snapshots must never render a negative number.
pub fn overage_message(active_staff_count: u32, staff_cap: u32) -> String {
    let to_deactivate = active_staff_count.saturating_sub(staff_cap);
    format!(
        "You have {active_staff_count} active staff but your plan only supports {staff_cap}. \
         Deactivate {to_deactivate} accounts or upgrade."
    )
}

// ============================================================================
// Tests
// ============================================================================

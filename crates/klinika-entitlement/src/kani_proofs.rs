//! Kani bounded model checking proofs for entitlement correctness.
//!
//! These proofs verify the rule-precedence properties that the dashboard
//! depends on:
//! - Proof #1: Unauthenticated sessions can never reach a view
//! - Proof #2: Expiry strictly dominates the staff-cap rules
//! - Proof #3: Superadmins are never constrained by a subscription
//! - Proof #4: Absent entitlement inputs fail open to Allow
//! - Proof #5: A count at or under the cap never trips the overage rules

use chrono::{TimeZone, Utc};
use klinika_types::{
    FacilityId, Role, Session, Snapshot, SubscriptionRecord, SubscriptionStatus, UserId,
    UserProfile,
};

use crate::decision::Decision;
use crate::evaluator::evaluate;
use crate::path_policy::EntitlementPolicy;

fn proof_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

fn proof_profile(role: Role) -> Snapshot<UserProfile> {
    Snapshot::resolved(
        UserProfile::new(UserId::new("u"), "u")
            .with_role(role)
            .with_facility(FacilityId::new("f")),
    )
}

fn role_from(selector: u8) -> Role {
    match selector % 6 {
        0 => Role::Doctor,
        1 => Role::Nurse,
        2 => Role::Pharmacist,
        3 => Role::Receptionist,
        4 => Role::ClinicOwner,
        _ => Role::Superadmin,
    }
}

//=============================================================================
// Proof #1: Unauthenticated Sessions Never Reach a View
//=============================================================================

/// Verifies that an unauthenticated session always redirects to login.
///
/// **Property**: For every role, staff count and subscription state, an
/// unauthenticated session produces exactly the login redirect.
///
/// **Proof Strategy**:
/// - Pick an arbitrary role and staff count
/// - Evaluate with a signed-out session against an expired record
/// - Verify the decision is the login redirect and nothing else
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_unauthenticated_never_allows() {
    let role = role_from(kani::any());
    let count: u32 = kani::any();
    kani::assume(count < 16);

    let record = SubscriptionRecord::new(FacilityId::new("f"), SubscriptionStatus::Expired, "p");
    let decision = evaluate(
        &EntitlementPolicy::standard(),
        &Session::signed_out(),
        &proof_profile(role),
        Some(&record),
        count,
        "/patients",
        proof_now(),
    );

    assert_eq!(decision, Decision::redirect("/login"));
}

//=============================================================================
// Proof #2: Expiry Dominates the Staff-Cap Rules
//=============================================================================

/// Verifies that an expired record never produces an overage decision.
///
/// **Property**: When the record is expired, the decision is never the
/// overage interstitial, for any staff count and any role.
///
/// **Proof Strategy**:
/// - Pick an arbitrary role and an arbitrary count far over any cap
/// - Evaluate against an expired record with a tiny cap
/// - Verify the interstitial variant is unreachable
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_expiry_dominates_overage() {
    let role = role_from(kani::any());
    let count: u32 = kani::any();
    kani::assume(count < 64);

    let record = SubscriptionRecord::new(FacilityId::new("f"), SubscriptionStatus::Expired, "p")
        .with_max_staff(1);
    let decision = evaluate(
        &EntitlementPolicy::standard(),
        &Session::signed_in(UserId::new("u")),
        &proof_profile(role),
        Some(&record),
        count,
        "/patients",
        proof_now(),
    );

    assert!(!matches!(decision, Decision::BlockInterstitial { .. }));
}

//=============================================================================
// Proof #3: Superadmins Are Never Constrained
//=============================================================================

/// Verifies the superadmin bypass.
///
/// **Property**: A superadmin is allowed for any staff count and any
/// subscription status.
///
/// **Proof Strategy**:
/// - Pick an arbitrary count and an arbitrary status selector
/// - Evaluate a superadmin profile against that record
/// - Verify the decision is Allow
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_superadmin_bypass() {
    let count: u32 = kani::any();
    kani::assume(count < 64);
    let status = if kani::any() {
        SubscriptionStatus::Expired
    } else {
        SubscriptionStatus::Active
    };

    let record =
        SubscriptionRecord::new(FacilityId::new("f"), status, "p").with_max_staff(1);
    let decision = evaluate(
        &EntitlementPolicy::standard(),
        &Session::signed_in(UserId::new("u")),
        &proof_profile(Role::Superadmin),
        Some(&record),
        count,
        "/billing",
        proof_now(),
    );

    assert_eq!(decision, Decision::Allow);
}

//=============================================================================
// Proof #4: Absent Inputs Fail Open
//=============================================================================

/// Verifies the fail-open rule for missing entitlement inputs.
///
/// **Property**: With no subscription record, every authenticated profile
/// with a usable role is allowed.
///
/// **Proof Strategy**:
/// - Pick an arbitrary role and count
/// - Evaluate with `subscription = None`
/// - Verify the decision is Allow
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_fail_open_without_record() {
    let role = role_from(kani::any());
    let count: u32 = kani::any();
    kani::assume(count < 64);

    let decision = evaluate(
        &EntitlementPolicy::standard(),
        &Session::signed_in(UserId::new("u")),
        &proof_profile(role),
        None,
        count,
        "/patients",
        proof_now(),
    );

    assert_eq!(decision, Decision::Allow);
}

//=============================================================================
// Proof #5: Counts At or Under the Cap Never Trip Overage
//=============================================================================

/// Verifies the overage boundary.
///
/// **Property**: For an active record, a staff count less than or equal to
/// the cap always yields Allow for staff roles.
///
/// **Proof Strategy**:
/// - Pick an arbitrary cap and a count bounded by it
/// - Evaluate a nurse profile against an active record with that cap
/// - Verify the decision is Allow
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_at_cap_is_not_overage() {
    let cap: u32 = kani::any();
    kani::assume(cap >= 1 && cap < 32);
    let count: u32 = kani::any();
    kani::assume(count <= cap);

    let record = SubscriptionRecord::new(FacilityId::new("f"), SubscriptionStatus::Active, "p")
        .with_max_staff(cap);
    let decision = evaluate(
        &EntitlementPolicy::standard(),
        &Session::signed_in(UserId::new("u")),
        &proof_profile(Role::Nurse),
        Some(&record),
        count,
        "/patients",
        proof_now(),
    );

    assert_eq!(decision, Decision::Allow);
}

//! End-to-end access flows through the assembled core.
//!
//! Each test walks one realistic session: sign-in, feeds resolving in
//! arrival order, navigation, and the decisions the dashboard renders.

use chrono::{DateTime, TimeZone, Utc};
use klinika::{
    AccessGate, Decision, EXPIRED_REDIRECT_REASON, EXPIRED_STAFF_MESSAGE, FacilityId, Klinika,
    OVERAGE_STAFF_MESSAGE, RemedyAction, Role, Session, SubscriptionRecord, SubscriptionStatus,
    UserId, UserProfile, overage_message,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap()
}

fn clinic() -> FacilityId {
    FacilityId::new("clinic-7")
}

fn owner() -> UserProfile {
    UserProfile::new(UserId::new("owner-7"), "Dr. Raka")
        .with_role(Role::ClinicOwner)
        .with_facility(clinic())
}

fn staff(uid: &str, role: Role) -> UserProfile {
    UserProfile::new(UserId::new(uid), "Staff Member")
        .with_role(role)
        .with_facility(clinic())
}

fn plan(status: SubscriptionStatus, max_staff: u32) -> SubscriptionRecord {
    SubscriptionRecord::new(clinic(), status, "Clinic Plus").with_max_staff(max_staff)
}

/// Signs in and resolves both feeds, the way the dashboard wiring does.
fn session_for(profile: UserProfile, record: Option<SubscriptionRecord>) -> AccessGate {
    let mut gate = Klinika::standard().session_gate();
    gate.set_session(Session::signed_in(profile.uid.clone()));

    let epoch = gate.profile_epoch();
    assert!(gate.apply_profile(epoch, Some(profile)));
    let epoch = gate.subscription_epoch();
    assert!(gate.apply_subscription(epoch, record));
    gate
}

// ============================================================================
// Sign-in Journey
// ============================================================================

#[test]
fn visitor_signs_in_and_reaches_the_dashboard() {
    let mut gate = Klinika::standard().session_gate();

    // Before login the visitor is sent to the login screen.
    gate.navigate("/dashboard");
    assert_eq!(gate.decision_at(fixed_now()), Decision::redirect("/login"));

    // Credentials are accepted; feeds are still resolving.
    gate.set_session(Session::signed_in(UserId::new("doc-1")));
    assert!(gate.decision_at(fixed_now()).is_pending());

    // The profile lands; the subscription record is still outstanding.
    let epoch = gate.profile_epoch();
    assert!(gate.apply_profile(epoch, Some(staff("doc-1", Role::Doctor))));
    assert!(gate.decision_at(fixed_now()).is_pending());

    // The subscription lands; the dashboard renders.
    let epoch = gate.subscription_epoch();
    assert!(gate.apply_subscription(epoch, Some(plan(SubscriptionStatus::Active, 10))));
    assert!(gate.decision_at(fixed_now()).is_allow());

    // A doctor's menu carries clinical screens, not owner screens.
    let paths: Vec<&str> = gate.visible_menu().iter().map(|entry| entry.path).collect();
    assert!(paths.contains(&"/patients"));
    assert!(!paths.contains(&"/master"));
}

// ============================================================================
// Expired Facility
// ============================================================================

#[test]
fn owner_of_an_expired_clinic_is_funneled_to_renewal() {
    let mut gate = session_for(owner(), Some(plan(SubscriptionStatus::Expired, 10)));

    gate.navigate("/patients");
    assert_eq!(
        gate.decision_at(fixed_now()),
        Decision::redirect_with_reason("/master/accounts", EXPIRED_REDIRECT_REASON)
    );

    // The renewal screens themselves stay reachable.
    for path in ["/master/accounts", "/subscription/change", "/subscription/user-plan"] {
        gate.navigate(path);
        assert!(gate.decision_at(fixed_now()).is_allow(), "{path} must stay open");
    }
}

#[test]
fn staff_of_an_expired_clinic_are_suspended() {
    let mut gate = session_for(
        staff("n-1", Role::Nurse),
        Some(plan(SubscriptionStatus::Expired, 10)),
    );
    gate.navigate("/patients");

    let decision = gate.decision_at(fixed_now());
    assert_eq!(decision, Decision::block_hard(EXPIRED_STAFF_MESSAGE));

    // Staff get no remediation detour, not even on the owner's routes.
    gate.navigate("/master/accounts");
    assert!(gate.decision_at(fixed_now()).is_blocking());
}

// ============================================================================
// Staff Cap Overage
// ============================================================================

#[test]
fn owner_over_the_staff_cap_sees_the_remediation_interstitial() {
    let mut gate = session_for(owner(), Some(plan(SubscriptionStatus::Active, 2)));
    let epoch = gate.roster_epoch();
    assert!(gate.apply_roster(
        epoch,
        vec![
            owner(),
            staff("d-1", Role::Doctor),
            staff("n-1", Role::Nurse),
            staff("r-1", Role::Receptionist),
        ],
    ));

    gate.navigate("/appointments");
    let decision = gate.decision_at(fixed_now());
    let Decision::BlockInterstitial { message, actions } = &decision else {
        panic!("expected the overage interstitial, got {decision:?}");
    };
    assert_eq!(message, &overage_message(3, 2));

    let targets: Vec<&str> = actions
        .iter()
        .map(|action| match action {
            RemedyAction::NavigateTo { path, .. } => path.as_str(),
            RemedyAction::Logout => "logout",
        })
        .collect();
    assert_eq!(targets, ["/master/users", "/master/accounts"]);

    // Following the first action leads to a screen that stays open.
    gate.navigate("/master/users");
    assert!(gate.decision_at(fixed_now()).is_allow());
}

#[test]
fn staff_of_an_over_cap_clinic_are_paused() {
    let mut gate = session_for(
        staff("r-1", Role::Receptionist),
        Some(plan(SubscriptionStatus::Active, 1)),
    );
    let epoch = gate.roster_epoch();
    assert!(gate.apply_roster(
        epoch,
        vec![owner(), staff("r-1", Role::Receptionist), staff("d-1", Role::Doctor)],
    ));

    gate.navigate("/billing");
    assert_eq!(
        gate.decision_at(fixed_now()),
        Decision::block_hard(OVERAGE_STAFF_MESSAGE)
    );
}

#[test]
fn an_expired_clinic_never_reaches_the_overage_rules() {
    let mut gate = session_for(owner(), Some(plan(SubscriptionStatus::Expired, 1)));
    let epoch = gate.roster_epoch();
    assert!(gate.apply_roster(
        epoch,
        vec![owner(), staff("d-1", Role::Doctor), staff("n-1", Role::Nurse)],
    ));

    // Expiry wins: a redirect, not the overage interstitial.
    gate.navigate("/dashboard");
    assert_eq!(
        gate.decision_at(fixed_now()),
        Decision::redirect_with_reason("/master/accounts", EXPIRED_REDIRECT_REASON)
    );
}

// ============================================================================
// Broken Accounts and Sign-out
// ============================================================================

#[test]
fn account_without_a_profile_can_only_log_out() {
    let mut gate = Klinika::standard().session_gate();
    gate.set_session(Session::signed_in(UserId::new("ghost-1")));

    let epoch = gate.profile_epoch();
    assert!(gate.apply_profile(epoch, None));

    let decision = gate.decision_at(fixed_now());
    let Decision::BlockHard { actions, .. } = &decision else {
        panic!("expected a hard block, got {decision:?}");
    };
    assert_eq!(actions, &[RemedyAction::Logout]);

    // Logging out lands back on the login redirect.
    gate.set_session(Session::signed_out());
    assert_eq!(gate.decision_at(fixed_now()), Decision::redirect("/login"));
}

#[test]
fn late_feed_deliveries_from_a_previous_session_are_ignored() {
    let mut gate = Klinika::standard().session_gate();
    gate.set_session(Session::signed_in(UserId::new("u-1")));
    let stale_profile_epoch = gate.profile_epoch();

    // The user logs out and a different user signs in before the first
    // profile query returns.
    gate.set_session(Session::signed_in(UserId::new("u-2")));
    assert!(!gate.apply_profile(stale_profile_epoch, Some(owner())));
    assert!(gate.decision_at(fixed_now()).is_pending());

    // The second user's own delivery is accepted.
    let epoch = gate.profile_epoch();
    assert!(gate.apply_profile(epoch, Some(staff("u-2", Role::Doctor))));
    let epoch = gate.subscription_epoch();
    assert!(gate.apply_subscription(epoch, Some(plan(SubscriptionStatus::Active, 5))));
    assert!(gate.decision_at(fixed_now()).is_allow());
}

// ============================================================================
// Configuration-Driven Assembly
// ============================================================================

#[test]
fn project_config_rewires_the_login_route() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        temp_dir.path().join("klinika.toml"),
        r#"
[entitlement]
login_path = "/auth/sign-in"

[gate]
audit_enabled = false
"#,
    )
    .expect("Failed to write config");

    let app = Klinika::from_dir(temp_dir.path()).expect("Failed to assemble");
    let mut gate = app.session_gate();
    gate.navigate("/dashboard");

    assert_eq!(
        gate.decision_at(fixed_now()),
        Decision::redirect("/auth/sign-in")
    );
}

#[test]
fn superadmin_support_session_bypasses_subscription_feeds() {
    let mut gate = Klinika::standard().session_gate();
    gate.set_session(Session::signed_in(UserId::new("root-1")));

    let epoch = gate.profile_epoch();
    let profile = UserProfile::new(UserId::new("root-1"), "Support")
        .with_role(Role::Superadmin)
        .with_facility(clinic());
    assert!(gate.apply_profile(epoch, Some(profile)));

    // No subscription ever resolves; the superadmin is not held pending.
    gate.navigate("/admin");
    assert!(gate.decision_at(fixed_now()).is_allow());

    let paths: Vec<&str> = gate.visible_menu().iter().map(|entry| entry.path).collect();
    assert_eq!(paths, ["/dashboard", "/admin"]);
}

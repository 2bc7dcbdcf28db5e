//! Access gate state machine.
//!
//! One [`AccessGate`] exists per dashboard session. It owns the latest
//! snapshot of every feed, drops deliveries from cancelled subscriptions,
//! and recomputes the navigation decision from current state on every call;
//! decisions are never cached.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use klinika_entitlement::{Decision, EntitlementPolicy, active_staff_count, evaluate};
use klinika_types::{
    FacilityId, Session, Snapshot, SnapshotEpoch, SubscriptionRecord, UserId, UserProfile,
};

use crate::menu::{self, VisibleEntry};

// ============================================================================
// AccessGate
// ============================================================================

/// Live navigation state for one dashboard session.
///
/// Feeds deliver through the `apply_*` methods, each stamped with the epoch
/// the wiring captured when it subscribed. A delivery whose epoch no longer
/// matches belongs to a cancelled subscription and is dropped. Three events
/// advance epochs:
///
/// - [`set_session`](AccessGate::set_session) advances all three and resets
///   every snapshot.
/// - A profile delivery that changes the resolved facility (including to or
///   from none) advances the subscription and roster epochs and resets both
///   feeds. A record for the previous facility must never survive the
///   switch.
/// - Accepted deliveries advance nothing; a live feed re-pushes under the
///   same epoch.
///
/// [`decision_at`](AccessGate::decision_at) adds one rule of its own on top
/// of the evaluator: a facility member whose subscription feed has not
/// answered yet stays [`Decision::Pending`]. An unresolved record must not
/// read as a missing one, which would fail open.
#[derive(Debug, Clone)]
pub struct AccessGate {
    policy: EntitlementPolicy,
    session: Session,
    profile: Snapshot<UserProfile>,
    subscription: Snapshot<SubscriptionRecord>,
    roster: Vec<UserProfile>,
    path: String,
    profile_epoch: SnapshotEpoch,
    subscription_epoch: SnapshotEpoch,
    roster_epoch: SnapshotEpoch,
    audit_enabled: bool,
}

impl AccessGate {
    /// Creates a gate with no session, unresolved feeds and audit logging
    /// enabled.
    pub fn new(policy: EntitlementPolicy) -> Self {
        Self {
            policy,
            session: Session::signed_out(),
            profile: Snapshot::unresolved(),
            subscription: Snapshot::unresolved(),
            roster: Vec::new(),
            path: "/".to_string(),
            profile_epoch: SnapshotEpoch::INITIAL,
            subscription_epoch: SnapshotEpoch::INITIAL,
            roster_epoch: SnapshotEpoch::INITIAL,
            audit_enabled: true,
        }
    }

    /// Disables audit logging (for tests and embedding).
    #[must_use]
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// The policy this gate evaluates against.
    pub fn policy(&self) -> &EntitlementPolicy {
        &self.policy
    }

    /// The current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The path of the last navigation.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The current profile snapshot.
    pub fn profile(&self) -> &Snapshot<UserProfile> {
        &self.profile
    }

    /// The current subscription snapshot.
    pub fn subscription(&self) -> &Snapshot<SubscriptionRecord> {
        &self.subscription
    }

    /// The last accepted staff roster.
    pub fn roster(&self) -> &[UserProfile] {
        &self.roster
    }

    /// Epoch the profile feed must stamp its deliveries with.
    pub fn profile_epoch(&self) -> SnapshotEpoch {
        self.profile_epoch
    }

    /// Epoch the subscription feed must stamp its deliveries with.
    pub fn subscription_epoch(&self) -> SnapshotEpoch {
        self.subscription_epoch
    }

    /// Epoch the roster feed must stamp its deliveries with.
    pub fn roster_epoch(&self) -> SnapshotEpoch {
        self.roster_epoch
    }

    // ========================================================================
    // Feed Deliveries
    // ========================================================================

    /// Replaces the session and resets every feed.
    ///
    /// All three epochs advance; deliveries in flight for the previous
    /// session can no longer land.
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
        self.profile = Snapshot::unresolved();
        self.profile_epoch = self.profile_epoch.next();
        self.reset_facility_feeds();

        if self.audit_enabled {
            info!(
                user = self.session_user(),
                profile_epoch = %self.profile_epoch,
                "Session replaced; feeds reset"
            );
        }
    }

    /// Applies a profile delivery. Returns `false` if the delivery was
    /// stamped with a stale epoch and dropped.
    ///
    /// `None` means the profile store holds no document for this user.
    /// When the accepted delivery changes the resolved facility, the
    /// subscription and roster feeds are reset and their epochs advance;
    /// wiring that subscribes to those feeds must capture their epochs
    /// after this call returns.
    pub fn apply_profile(&mut self, epoch: SnapshotEpoch, profile: Option<UserProfile>) -> bool {
        if epoch != self.profile_epoch {
            self.log_stale("profile", epoch, self.profile_epoch);
            return false;
        }

        let previous_facility = self.resolved_facility().cloned();
        self.profile = Snapshot::Resolved(profile);
        let current_facility = self.resolved_facility().cloned();

        if previous_facility != current_facility {
            self.reset_facility_feeds();
            if self.audit_enabled {
                info!(
                    user = self.session_user(),
                    facility = ?current_facility.as_ref().map(FacilityId::as_str),
                    subscription_epoch = %self.subscription_epoch,
                    "Facility changed; subscription and roster feeds reset"
                );
            }
        }
        true
    }

    /// Applies a subscription delivery. Returns `false` if the delivery was
    /// stamped with a stale epoch and dropped.
    ///
    /// `None` means the subscription store holds no record for the
    /// facility, which the evaluator treats as unconstrained.
    pub fn apply_subscription(
        &mut self,
        epoch: SnapshotEpoch,
        record: Option<SubscriptionRecord>,
    ) -> bool {
        if epoch != self.subscription_epoch {
            self.log_stale("subscription", epoch, self.subscription_epoch);
            return false;
        }
        self.subscription = Snapshot::Resolved(record);
        true
    }

    /// Applies a staff roster delivery. Returns `false` if the delivery was
    /// stamped with a stale epoch and dropped.
    ///
    /// The roster is the facility's full member list; the active staff
    /// count is derived from it at decision time, not stored.
    pub fn apply_roster(&mut self, epoch: SnapshotEpoch, roster: Vec<UserProfile>) -> bool {
        if epoch != self.roster_epoch {
            self.log_stale("roster", epoch, self.roster_epoch);
            return false;
        }
        self.roster = roster;
        true
    }

    // ========================================================================
    // Navigation and Decisions
    // ========================================================================

    /// Records a navigation. The decision for the new path is computed on
    /// the next [`decision`](AccessGate::decision) call.
    pub fn navigate(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Evaluates the current navigation against the wall clock.
    pub fn decision(&self) -> Decision {
        self.decision_at(Utc::now())
    }

    /// Evaluates the current navigation at `now`.
    ///
    /// Recomputed from current state on every call. Expiry flips and roster
    /// changes take effect on the next evaluation with no cache to
    /// invalidate.
    pub fn decision_at(&self, now: DateTime<Utc>) -> Decision {
        let decision = self.evaluate_at(now);
        if self.audit_enabled {
            self.audit(&decision);
        }
        decision
    }

    /// The menu entries visible to the current profile's role.
    ///
    /// Empty until a profile with a usable role resolves.
    pub fn visible_menu(&self) -> Vec<VisibleEntry> {
        self.profile
            .value()
            .and_then(|profile| profile.role)
            .map_or_else(Vec::new, menu::visible_menu)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn evaluate_at(&self, now: DateTime<Utc>) -> Decision {
        if self.session.authenticated && self.waiting_for_subscription() {
            return Decision::Pending;
        }
        evaluate(
            &self.policy,
            &self.session,
            &self.profile,
            self.subscription.value(),
            self.active_staff(),
            &self.path,
            now,
        )
    }

    /// True while the subscription feed is outstanding for an account that
    /// needs it: a resolved profile with a facility and a role the
    /// subscription rules apply to.
    fn waiting_for_subscription(&self) -> bool {
        let Some(profile) = self.profile.value() else {
            return false;
        };
        profile.facility_id.is_some()
            && profile.role.is_some_and(|role| !role.is_superadmin())
            && self.subscription.is_unresolved()
    }

    /// Staff count derived from the stored roster against the current
    /// facility. Zero while no facility is resolved.
    fn active_staff(&self) -> u32 {
        self.profile
            .value()
            .and_then(|profile| profile.facility_id.as_ref())
            .map_or(0, |facility| active_staff_count(&self.roster, facility))
    }

    fn resolved_facility(&self) -> Option<&FacilityId> {
        self.profile
            .value()
            .and_then(|profile| profile.facility_id.as_ref())
    }

    fn reset_facility_feeds(&mut self) {
        self.subscription = Snapshot::unresolved();
        self.subscription_epoch = self.subscription_epoch.next();
        self.roster.clear();
        self.roster_epoch = self.roster_epoch.next();
    }

    fn session_user(&self) -> &str {
        self.session.user_id.as_ref().map_or("-", UserId::as_str)
    }

    fn log_stale(&self, feed: &'static str, received: SnapshotEpoch, current: SnapshotEpoch) {
        if self.audit_enabled {
            debug!(
                feed,
                received = %received,
                current = %current,
                "Stale feed delivery dropped"
            );
        }
    }

    fn audit(&self, decision: &Decision) {
        let role = self.profile.value().and_then(|profile| profile.role);
        match decision {
            Decision::Allow | Decision::Pending => debug!(
                user = self.session_user(),
                role = ?role,
                path = %self.path,
                decision = decision.kind(),
                "Navigation evaluated"
            ),
            Decision::RedirectTo { path: target, .. } => info!(
                user = self.session_user(),
                role = ?role,
                path = %self.path,
                target = %target,
                "Navigation redirected"
            ),
            Decision::BlockHard { message, .. } | Decision::BlockInterstitial { message, .. } => {
                warn!(
                    user = self.session_user(),
                    role = ?role,
                    path = %self.path,
                    decision = decision.kind(),
                    message = %message,
                    "Navigation blocked"
                );
            }
        }
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(EntitlementPolicy::standard())
    }
}

// ============================================================================
// Tests
// ============================================================================

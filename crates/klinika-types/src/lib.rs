//! # klinika-types: Core types for `Klinika`
//!
//! This crate contains shared types used across the `Klinika` access core:
//! - Entity IDs ([`UserId`], [`FacilityId`])
//! - Staff roles ([`Role`])
//! - Sessions ([`Session`])
//! - Profiles ([`UserProfile`])
//! - Subscriptions ([`SubscriptionStatus`], [`SubscriptionRecord`])
//! - Feed snapshot state ([`Snapshot`])
//! - Feed identity ([`SnapshotEpoch`])

use std::fmt::{Debug, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entity IDs - Clone (String-backed document ids, rarely cloned)
// ============================================================================

/// Unique identifier for a user account.
///
/// Opaque document id issued by the identity provider; never parsed or
/// interpreted by the access core.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Unique identifier for a facility (the billing and data-isolation unit).
///
/// One subscription record exists per facility. A user without a facility
/// id has no entitlement constraints.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacilityId(String);

impl FacilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FacilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for FacilityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for FacilityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<FacilityId> for String {
    fn from(id: FacilityId) -> Self {
        id.0
    }
}

// ============================================================================
// Roles - Copy (small fieldless enum)
// ============================================================================

/// Staff role attached to a user profile.
///
/// Roles drive two things: which menu entries a user sees, and which branch
/// of the entitlement rules applies when the facility is expired or over its
/// staff cap. Profile documents carry the role as a lowercase string; parse
/// with [`Role::from_wire`], which maps unknown strings to `None` rather
/// than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Treating physician. Sees clinical screens only.
    Doctor,
    /// Nursing staff. Sees clinical screens only.
    Nurse,
    /// Pharmacy staff. Sees pharmacy and inventory screens.
    Pharmacist,
    /// Front desk. Sees scheduling and billing screens.
    Receptionist,
    /// The facility owner. Holds the billing relationship: the only role
    /// that keeps access to the remediation screens while the facility is
    /// expired or over its staff cap.
    ClinicOwner,
    /// Platform operator. Bypasses every subscription rule.
    Superadmin,
}

impl Role {
    /// Parses the role string carried by profile documents.
    ///
    /// Returns `None` for anything outside the known set. A malformed role
    /// is treated the same as an absent one: the account is misconfigured
    /// and lands in the profile-missing terminal state.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "doctor" => Some(Role::Doctor),
            "nurse" => Some(Role::Nurse),
            "pharmacist" => Some(Role::Pharmacist),
            "receptionist" => Some(Role::Receptionist),
            "clinic_owner" => Some(Role::ClinicOwner),
            "superadmin" => Some(Role::Superadmin),
            _ => None,
        }
    }

    /// Returns the wire string stored in profile documents.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Pharmacist => "pharmacist",
            Role::Receptionist => "receptionist",
            Role::ClinicOwner => "clinic_owner",
            Role::Superadmin => "superadmin",
        }
    }

    /// True for the platform operator role.
    pub fn is_superadmin(&self) -> bool {
        matches!(self, Role::Superadmin)
    }

    /// True for the facility owner role.
    pub fn is_clinic_owner(&self) -> bool {
        matches!(self, Role::ClinicOwner)
    }

    /// Whether a roster member with this role counts toward the plan's
    /// staff cap. Only the owner is excluded from the count.
    pub fn counts_toward_staff_cap(&self) -> bool {
        !self.is_clinic_owner()
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

// ============================================================================
// Sessions - Clone (owned by the identity provider)
// ============================================================================

/// Authentication state resolved by the identity provider.
///
/// Created at login, destroyed at logout. The access core never inspects
/// credentials; it only consumes the resolved `(user_id, authenticated)`
/// pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Option<UserId>,
    pub authenticated: bool,
}

impl Session {
    /// A session for an authenticated user.
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            authenticated: true,
        }
    }

    /// The anonymous session, before login or after logout.
    pub fn signed_out() -> Self {
        Self {
            user_id: None,
            authenticated: false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::signed_out()
    }
}

// ============================================================================
// Profiles - Clone (pushed as live snapshots by the profile store)
// ============================================================================

/// User profile document pushed by the profile store.
///
/// `role` is `None` when the stored role string was absent or unrecognized;
/// such an account exists but is misconfigured, which is a terminal state
/// distinct from "profile not yet loaded".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    pub name: String,
    pub role: Option<Role>,
    pub facility_id: Option<FacilityId>,
}

impl UserProfile {
    /// Creates a profile with no role and no facility.
    pub fn new(uid: UserId, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            role: None,
            facility_id: None,
        }
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Sets the role from a wire string, leniently.
    ///
    /// Unknown strings leave the role unset, which routes the account to
    /// the profile-missing terminal state instead of crashing evaluation.
    #[must_use]
    pub fn with_wire_role(mut self, raw: &str) -> Self {
        self.role = Role::from_wire(raw);
        self
    }

    /// Sets the facility membership.
    #[must_use]
    pub fn with_facility(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = Some(facility_id);
        self
    }
}

// ============================================================================
// Subscriptions - Clone (one live record per facility)
// ============================================================================

/// Lifecycle status stored on a subscription record.
///
/// Only [`Expired`](SubscriptionStatus::Expired) participates in gate
/// decisions; `Suspended` is carried for billing screens but no access rule
/// consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Suspended,
}

impl SubscriptionStatus {
    /// Parses the status string carried by subscription documents.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(SubscriptionStatus::Active),
            "expired" => Some(SubscriptionStatus::Expired),
            "suspended" => Some(SubscriptionStatus::Suspended),
            _ => None,
        }
    }

    /// Returns the wire string stored in subscription documents.
    pub fn as_wire(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Suspended => "suspended",
        }
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// Subscription record pushed by the subscription store.
///
/// One record per facility. `max_staff` is `None` when the plan document
/// omits the field; the evaluator coerces both `None` and `0` to the
/// default cap. `max_locations` is enforced by the branch editor screens,
/// not by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub facility_id: FacilityId,
    pub status: SubscriptionStatus,
    pub expiry_date: Option<DateTime<Utc>>,
    pub max_staff: Option<u32>,
    pub max_locations: u32,
    pub plan_name: String,
}

impl SubscriptionRecord {
    /// Creates a record with no expiry date and no explicit staff cap.
    pub fn new(
        facility_id: FacilityId,
        status: SubscriptionStatus,
        plan_name: impl Into<String>,
    ) -> Self {
        Self {
            facility_id,
            status,
            expiry_date: None,
            max_staff: None,
            max_locations: 1,
            plan_name: plan_name.into(),
        }
    }

    /// Sets the expiry instant.
    #[must_use]
    pub fn with_expiry(mut self, at: DateTime<Utc>) -> Self {
        self.expiry_date = Some(at);
        self
    }

    /// Sets the plan's staff cap.
    #[must_use]
    pub fn with_max_staff(mut self, max_staff: u32) -> Self {
        self.max_staff = Some(max_staff);
        self
    }

    /// Sets the plan's location cap.
    #[must_use]
    pub fn with_max_locations(mut self, max_locations: u32) -> Self {
        self.max_locations = max_locations;
        self
    }

    /// Whether the record is expired at `now`.
    ///
    /// Expired when the stored status says so, or when an expiry date is
    /// present and strictly in the past. A record expiring exactly at `now`
    /// is still live.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Expired
            || self.expiry_date.is_some_and(|at| now > at)
    }
}

// ============================================================================
// Feed Snapshots - Clone (immutable values at the moment of evaluation)
// ============================================================================

/// State of one value delivered by an asynchronous feed.
///
/// Distinguishes "nothing has arrived yet" from "the store answered and has
/// no record". The two drive different decisions: an unresolved profile
/// keeps evaluation pending, a missing one is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Snapshot<T> {
    /// No delivery from the feed yet.
    Unresolved,
    /// The feed settled; `None` means the store holds no record.
    Resolved(Option<T>),
}

impl<T> Snapshot<T> {
    /// A snapshot that has not received a delivery.
    pub const fn unresolved() -> Self {
        Snapshot::Unresolved
    }

    /// A snapshot that settled on a value.
    pub fn resolved(value: T) -> Self {
        Snapshot::Resolved(Some(value))
    }

    /// A snapshot that settled on "no record".
    pub const fn missing() -> Self {
        Snapshot::Resolved(None)
    }

    /// True before the first delivery.
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Snapshot::Unresolved)
    }

    /// True when the feed settled on "no record".
    pub const fn is_missing(&self) -> bool {
        matches!(self, Snapshot::Resolved(None))
    }

    /// The settled value, if one arrived.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Snapshot::Resolved(Some(value)) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Snapshot::Unresolved
    }
}

// ============================================================================
// Feed Epochs - Copy (stale-delivery guard for replaced feeds)
// ============================================================================

/// Monotonically increasing identity of one feed subscription.
///
/// Every time a feed is replaced (new session, or the profile's facility
/// changes) the epoch advances. Deliveries stamped with an old epoch belong
/// to a cancelled subscription and are dropped, so a stale resolution can
/// never overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotEpoch(u64);

impl SnapshotEpoch {
    /// The initial epoch (before any feed replacement).
    pub const INITIAL: SnapshotEpoch = SnapshotEpoch(0);

    /// Creates an epoch from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the epoch as a u64.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the next epoch (incremented by 1).
    pub fn next(&self) -> Self {
        SnapshotEpoch(self.0.saturating_add(1))
    }
}

impl Display for SnapshotEpoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "epoch:{}", self.0)
    }
}

impl Default for SnapshotEpoch {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl From<u64> for SnapshotEpoch {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SnapshotEpoch> for u64 {
    fn from(epoch: SnapshotEpoch) -> Self {
        epoch.0
    }
}

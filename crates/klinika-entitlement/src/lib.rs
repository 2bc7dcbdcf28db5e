//! # klinika-entitlement: Entitlement decisions for `Klinika`
//!
//! Decides whether one navigation through the dashboard is allowed, given the
//! session, the user's profile, the facility's subscription record and the
//! current staff count. The decision function is pure; the stateful shell that
//! feeds it lives in `klinika-gate`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Navigation Request                          │
//! │  (Session + Profile + Subscription + Count)  │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Evaluator                                   │
//! │  ├─ Fixed-precedence rules, first match wins │
//! │  ├─ Expiry checked before the staff cap      │
//! │  └─ Owner keeps the remediation allowlists   │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - Allow / RedirectTo / Pending              │
//! │  - BlockHard (logout only)                   │
//! │  - BlockInterstitial (owner remediation)     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//!
//! ```
//! use chrono::Utc;
//! use klinika_entitlement::{evaluate, Decision, EntitlementPolicy};
//! use klinika_types::{
//!     FacilityId, Role, Session, Snapshot, SubscriptionRecord, SubscriptionStatus, UserId,
//!     UserProfile,
//! };
//!
//! let policy = EntitlementPolicy::standard();
//! let session = Session::signed_in(UserId::new("u-1"));
//! let profile = Snapshot::resolved(
//!     UserProfile::new(UserId::new("u-1"), "Ana")
//!         .with_role(Role::ClinicOwner)
//!         .with_facility(FacilityId::new("fac-1")),
//! );
//! let record = SubscriptionRecord::new(
//!     FacilityId::new("fac-1"),
//!     SubscriptionStatus::Active,
//!     "Clinic Plus",
//! )
//! .with_max_staff(5);
//!
//! let decision = evaluate(
//!     &policy,
//!     &session,
//!     &profile,
//!     Some(&record),
//!     3,
//!     "/patients",
//!     Utc::now(),
//! );
//! assert_eq!(decision, Decision::Allow);
//! ```

pub mod decision;
pub mod evaluator;
pub mod path_policy;
pub mod roster;

// Re-export commonly used types
pub use decision::{Decision, RemedyAction};
pub use evaluator::{
    EXPIRED_REDIRECT_REASON, EXPIRED_STAFF_MESSAGE, OVERAGE_STAFF_MESSAGE,
    PROFILE_MISSING_MESSAGE, evaluate, overage_message,
};
pub use path_policy::{EntitlementPolicy, PathAllowlist};
pub use roster::active_staff_count;

// Kani proofs for bounded model checking
#[cfg(kani)]
mod kani_proofs;

//! # klinika-gate: Stateful Access Gate
//!
//! Holds the live navigation state for one dashboard session:
//! - **Feed snapshots** (session, profile, subscription, staff roster)
//! - **Stale-delivery protection** (per-feed [`SnapshotEpoch`] guards)
//! - **Decision computation** (delegates to `klinika-entitlement`)
//! - **Role-derived menu** (static table filtered by the current role)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Identity / Store Feeds                      │
//! │  session · profile · subscription · roster   │
//! └──────────────────┬───────────────────────────┘
//!                    │ epoch-stamped deliveries
//!                    ▼
//! ┌──────────────────────────────────────────────┐
//! │  AccessGate                                  │
//! │  ├─ snapshot state (profile, subscription)   │
//! │  ├─ stale-delivery guard (SnapshotEpoch)     │
//! │  └─ decision_at → entitlement rules          │
//! └──────────────────┬───────────────────────────┘
//!                    │
//!                    ▼
//! ┌──────────────────────────────────────────────┐
//! │  Router / UI                                 │
//! │  render · redirect · block · menu            │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Feed Discipline
//!
//! Every feed carries an epoch. Replacing a feed (a new session, or a
//! profile whose facility changed) advances the epoch, and a delivery
//! stamped with an old epoch is dropped. Wiring code captures the epoch
//! *after* the event that makes the subscription possible and passes it
//! back with every delivery:
//!
//! | Event                     | Epochs advanced                      |
//! |---------------------------|--------------------------------------|
//! | `set_session`             | profile, subscription, roster        |
//! | profile facility changed  | subscription, roster                 |
//! | plain delivery            | none                                 |
//!
//! ## Examples
//!
//! ### Session Lifecycle
//!
//! ```
//! use klinika_entitlement::{Decision, EntitlementPolicy};
//! use klinika_gate::AccessGate;
//! use klinika_types::{
//!     FacilityId, Role, Session, SubscriptionRecord, SubscriptionStatus, UserId, UserProfile,
//! };
//!
//! let mut gate = AccessGate::new(EntitlementPolicy::standard()).without_audit();
//!
//! // Nobody is signed in: the gate points at the login screen.
//! gate.navigate("/dashboard");
//! assert_eq!(gate.decision(), Decision::redirect("/login"));
//!
//! // A session arrives; both feeds are still unresolved.
//! gate.set_session(Session::signed_in(UserId::new("u-1")));
//! assert!(gate.decision().is_pending());
//!
//! // The profile feed answers.
//! let epoch = gate.profile_epoch();
//! let profile = UserProfile::new(UserId::new("u-1"), "Dr. Sari")
//!     .with_role(Role::Doctor)
//!     .with_facility(FacilityId::new("fac-1"));
//! assert!(gate.apply_profile(epoch, Some(profile)));
//!
//! // Still pending: the subscription record is outstanding.
//! assert!(gate.decision().is_pending());
//!
//! // The subscription feed answers with a live plan.
//! let epoch = gate.subscription_epoch();
//! let record = SubscriptionRecord::new(
//!     FacilityId::new("fac-1"),
//!     SubscriptionStatus::Active,
//!     "Clinic Plus",
//! );
//! assert!(gate.apply_subscription(epoch, Some(record)));
//! assert!(gate.decision().is_allow());
//! ```
//!
//! ### Role-Derived Menu
//!
//! ```
//! use klinika_gate::menu::visible_menu;
//! use klinika_types::Role;
//!
//! let menu = visible_menu(Role::Nurse);
//! assert!(menu.iter().any(|entry| entry.path == "/patients"));
//! assert!(menu.iter().all(|entry| entry.path != "/master"));
//! ```

pub mod gate;
pub mod menu;

// Re-export commonly used types
pub use gate::AccessGate;
pub use menu::{MenuChild, MenuEntry, VisibleChild, VisibleEntry, visible_menu};

// Re-exported so gate callers can name epochs without a second import.
pub use klinika_types::SnapshotEpoch;

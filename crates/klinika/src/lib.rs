//! # Klinika
//!
//! Subscription-aware access core for multi-tenant clinic dashboards.
//!
//! Klinika answers one question on every navigation: may this user see
//! this screen right now? The answer folds together authentication, the
//! user's profile, the facility's subscription and the size of its staff
//! roster. This provides:
//!
//! - **Deterministic decisions** - Pure rules, the clock passed in explicitly
//! - **No fail-open flashes** - Unresolved feeds hold at Pending
//! - **Stale-delivery protection** - Epoch-guarded feed snapshots
//! - **Owner-led remediation** - Expired or over-cap facilities keep their
//!   fix-it screens while everything else is gated
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Klinika                             │
//! │  ┌──────────┐   ┌────────────┐   ┌─────────────┐            │
//! │  │  Config  │ → │ AccessGate │ → │ Entitlement │            │
//! │  │ (layered)│   │ (snapshots)│   │ (pure rules)│            │
//! │  └──────────┘   └────────────┘   └─────────────┘            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use klinika::{Klinika, Session, UserId};
//!
//! // Assemble from built-in defaults; no config files are consulted.
//! let app = Klinika::standard();
//!
//! // One gate per dashboard session.
//! let mut gate = app.session_gate();
//! gate.set_session(Session::signed_in(UserId::new("u-1")));
//! gate.navigate("/dashboard");
//!
//! // Feeds resolve asynchronously; decisions recompute on demand.
//! assert!(gate.decision().is_pending());
//! ```
//!
//! # Modules
//!
//! - **SDK Layer**: [`Klinika`] - config, policy and per-session gates
//! - **Decision core**: rules and messages from `klinika-entitlement`
//! - **Session state**: gate and menu from `klinika-gate`

mod klinika;

// SDK Layer - Main API
pub use klinika::{Klinika, policy_from_config};

// Re-export core types from klinika-types
pub use klinika_types::{
    FacilityId, Role, Session, Snapshot, SnapshotEpoch, SubscriptionRecord, SubscriptionStatus,
    UserId, UserProfile,
};

// Re-export the decision core
pub use klinika_entitlement::{
    Decision, EntitlementPolicy, PathAllowlist, RemedyAction, active_staff_count, evaluate,
    overage_message,
};

// Re-export the user-facing message constants
pub use klinika_entitlement::{
    EXPIRED_REDIRECT_REASON, EXPIRED_STAFF_MESSAGE, OVERAGE_STAFF_MESSAGE,
    PROFILE_MISSING_MESSAGE,
};

// Re-export session gate and menu
pub use klinika_gate::{AccessGate, MenuChild, MenuEntry, VisibleChild, VisibleEntry, visible_menu};

// Re-export configuration
pub use klinika_config::{ConfigError, ConfigLoader, KlinikaConfig, Paths};

//! Navigation decisions.
//!
//! A [`Decision`] is the output of one evaluation: recomputed on every
//! snapshot or navigation change, never mutated in place. The router layer
//! consumes it to render the view, issue a redirect, or show one of the two
//! block presentations.

use serde::{Deserialize, Serialize};

// ============================================================================
// Remedy Actions
// ============================================================================

/// An action offered alongside a blocking decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemedyAction {
    /// End the session. The only way out of a hard block.
    Logout,
    /// Navigate to a remediation screen.
    NavigateTo { path: String, label: String },
}

impl RemedyAction {
    /// Creates a navigation action.
    pub fn navigate(path: impl Into<String>, label: impl Into<String>) -> Self {
        RemedyAction::NavigateTo {
            path: path.into(),
            label: label.into(),
        }
    }
}

// ============================================================================
// Decision
// ============================================================================

/// The outcome of evaluating one navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    /// Render the requested view.
    Allow,
    /// Send the caller elsewhere, optionally with a warning payload.
    RedirectTo {
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Stop the session dead. The only action offered is logout.
    BlockHard {
        message: String,
        actions: Vec<RemedyAction>,
    },
    /// Block the view but offer remediation navigation (owner overage).
    BlockInterstitial {
        message: String,
        actions: Vec<RemedyAction>,
    },
    /// Inputs are not fully resolved yet. Callers render a neutral loading
    /// state and treat this as neither allow nor block.
    Pending,
}

impl Decision {
    /// A redirect with no warning payload.
    pub fn redirect(path: impl Into<String>) -> Self {
        Decision::RedirectTo {
            path: path.into(),
            reason: None,
        }
    }

    /// A redirect carrying a user-facing reason.
    pub fn redirect_with_reason(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Decision::RedirectTo {
            path: path.into(),
            reason: Some(reason.into()),
        }
    }

    /// A hard block. Logout is always the only action.
    pub fn block_hard(message: impl Into<String>) -> Self {
        Decision::BlockHard {
            message: message.into(),
            actions: vec![RemedyAction::Logout],
        }
    }

    /// An interstitial block with remediation actions.
    pub fn block_interstitial(message: impl Into<String>, actions: Vec<RemedyAction>) -> Self {
        Decision::BlockInterstitial {
            message: message.into(),
            actions,
        }
    }

    /// True when the requested view may render.
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// True while inputs are still resolving.
    pub fn is_pending(&self) -> bool {
        matches!(self, Decision::Pending)
    }

    /// True for either block presentation.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Decision::BlockHard { .. } | Decision::BlockInterstitial { .. }
        )
    }

    /// Short label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::RedirectTo { .. } => "redirect",
            Decision::BlockHard { .. } => "block_hard",
            Decision::BlockInterstitial { .. } => "block_interstitial",
            Decision::Pending => "pending",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_hard_always_offers_logout_only() {
        let decision = Decision::block_hard("Profile Missing");
        let Decision::BlockHard { actions, .. } = &decision else {
            panic!("expected BlockHard");
        };
        assert_eq!(actions, &[RemedyAction::Logout]);
    }

    #[test]
    fn decision_serializes_with_type_tag() {
        let decision = Decision::redirect_with_reason("/master/accounts", "renew");
        let json = serde_json::to_value(&decision).unwrap();

        assert_eq!(json["type"], "redirect_to");
        assert_eq!(json["path"], "/master/accounts");
        assert_eq!(json["reason"], "renew");
    }

    #[test]
    fn redirect_without_reason_omits_the_field() {
        let json = serde_json::to_value(Decision::redirect("/login")).unwrap();
        assert_eq!(json["type"], "redirect_to");
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn interstitial_actions_serialize_with_paths_and_labels() {
        let decision = Decision::block_interstitial(
            "over cap",
            vec![
                RemedyAction::navigate("/master/users", "Manage Users"),
                RemedyAction::navigate("/master/accounts", "View Plans"),
            ],
        );
        let json = serde_json::to_value(&decision).unwrap();

        assert_eq!(json["actions"][0]["type"], "navigate_to");
        assert_eq!(json["actions"][0]["path"], "/master/users");
        assert_eq!(json["actions"][1]["label"], "View Plans");
    }

    #[test]
    fn kind_labels_cover_every_variant() {
        assert_eq!(Decision::Allow.kind(), "allow");
        assert_eq!(Decision::Pending.kind(), "pending");
        assert_eq!(Decision::redirect("/login").kind(), "redirect");
        assert_eq!(Decision::block_hard("m").kind(), "block_hard");
        assert_eq!(Decision::block_interstitial("m", vec![]).kind(), "block_interstitial");
    }

    #[test]
    fn predicates_partition_the_variants() {
        assert!(Decision::Allow.is_allow());
        assert!(!Decision::Allow.is_blocking());

        assert!(Decision::Pending.is_pending());
        assert!(!Decision::Pending.is_allow());

        assert!(Decision::block_hard("m").is_blocking());
        assert!(Decision::block_interstitial("m", vec![]).is_blocking());
        assert!(!Decision::redirect("/login").is_blocking());
    }
}

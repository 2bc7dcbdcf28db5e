//! Application-level assembly.
//!
//! Resolves layered configuration into an [`EntitlementPolicy`] once, then
//! hands out one [`AccessGate`] per dashboard session. The policy is shared
//! by value; gates never reach back into configuration.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use klinika_config::KlinikaConfig;
use klinika_entitlement::{EntitlementPolicy, PathAllowlist};
use klinika_gate::AccessGate;

// ============================================================================
// Klinika
// ============================================================================

/// The assembled access core.
#[derive(Debug, Clone)]
pub struct Klinika {
    config: KlinikaConfig,
    policy: EntitlementPolicy,
}

impl Klinika {
    /// Assembles from layered configuration: files, then `KLINIKA_*`
    /// environment overrides.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(KlinikaConfig::load()?))
    }

    /// Assembles from layered configuration rooted at `project_dir`.
    pub fn from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_config(KlinikaConfig::load_from_dir(project_dir)?))
    }

    /// Assembles from an explicit, already-validated configuration.
    pub fn from_config(config: KlinikaConfig) -> Self {
        let policy = policy_from_config(&config);
        debug!(
            login_path = %policy.login_path,
            renewal_path = %policy.renewal_path,
            default_staff_cap = policy.default_staff_cap,
            "Access core assembled"
        );
        Self { config, policy }
    }

    /// Assembles from built-in defaults; no files are consulted.
    pub fn standard() -> Self {
        Self::from_config(KlinikaConfig::default())
    }

    /// The configuration this core was assembled from.
    pub fn config(&self) -> &KlinikaConfig {
        &self.config
    }

    /// The resolved entitlement policy.
    pub fn policy(&self) -> &EntitlementPolicy {
        &self.policy
    }

    /// Creates the gate for one dashboard session.
    ///
    /// Gates are independent: feeds, epochs and navigation state are per
    /// session. Audit logging follows the `[gate]` configuration section.
    pub fn session_gate(&self) -> AccessGate {
        let gate = AccessGate::new(self.policy.clone());
        if self.config.gate.audit_enabled {
            gate
        } else {
            gate.without_audit()
        }
    }
}

impl Default for Klinika {
    fn default() -> Self {
        Self::standard()
    }
}

/// Resolves the `[entitlement]` configuration section into a policy.
pub fn policy_from_config(config: &KlinikaConfig) -> EntitlementPolicy {
    let section = &config.entitlement;
    EntitlementPolicy::standard()
        .with_login_path(&section.login_path)
        .with_renewal_path(&section.renewal_path)
        .with_staff_management_path(&section.staff_management_path)
        .with_expiry_remediation(PathAllowlist::new(&section.expiry_remediation))
        .with_staff_limit_remediation(PathAllowlist::new(&section.staff_limit_remediation))
        .with_default_staff_cap(section.default_staff_cap)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// The config crate's built-in defaults and the entitlement crate's
    /// standard policy describe the same routes. A drift between them
    /// changes behavior depending on whether configuration is loaded.
    #[test]
    fn default_config_resolves_to_the_standard_policy() {
        assert_eq!(
            policy_from_config(&KlinikaConfig::default()),
            EntitlementPolicy::standard()
        );
    }

    #[test]
    fn policy_mapping_carries_every_field() {
        let mut config = KlinikaConfig::default();
        config.entitlement.login_path = "/auth/login".to_string();
        config.entitlement.renewal_path = "/billing/renew".to_string();
        config.entitlement.staff_management_path = "/staff".to_string();
        config.entitlement.expiry_remediation = vec!["/billing".to_string()];
        config.entitlement.staff_limit_remediation = vec!["/staff".to_string()];
        config.entitlement.default_staff_cap = 4;

        let policy = policy_from_config(&config);
        assert_eq!(policy.login_path, "/auth/login");
        assert_eq!(policy.renewal_path, "/billing/renew");
        assert_eq!(policy.staff_management_path, "/staff");
        assert_eq!(policy.expiry_remediation.prefixes(), ["/billing"]);
        assert_eq!(policy.staff_limit_remediation.prefixes(), ["/staff"]);
        assert_eq!(policy.default_staff_cap, 4);
    }

    #[test]
    fn session_gates_are_independent() {
        let app = Klinika::standard();
        let mut first = app.session_gate();
        let second = app.session_gate();

        first.navigate("/patients");
        assert_eq!(first.path(), "/patients");
        assert_eq!(second.path(), "/");
    }

    #[test]
    fn session_gate_honors_the_audit_switch() {
        let mut config = KlinikaConfig::default();
        config.gate.audit_enabled = false;

        // No observable log assertion without a subscriber; the gate must
        // still decide normally.
        let app = Klinika::from_config(config);
        let gate = app.session_gate();
        assert!(!gate.decision().is_allow());
    }
}

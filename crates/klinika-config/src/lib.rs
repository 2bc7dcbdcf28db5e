//! Configuration management for Klinika
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (KLINIKA_* prefix, highest precedence)
//! 2. klinika.local.toml (gitignored, local overrides)
//! 3. klinika.toml (git-tracked, project config)
//! 4. ~/.config/klinika/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! Route paths and the default staff cap live here; the user-facing block
//! and redirect texts are fixed in `klinika-entitlement` and are not
//! configurable.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main Klinika configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KlinikaConfig {
    pub entitlement: EntitlementSection,
    pub gate: GateSection,
    pub logging: LoggingSection,
}

/// Route paths and caps consumed by the entitlement rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitlementSection {
    /// Redirect target for unauthenticated sessions.
    pub login_path: String,
    /// Redirect target for owners of an expired facility.
    pub renewal_path: String,
    /// Interstitial action target for trimming the staff roster.
    pub staff_management_path: String,
    /// Route prefixes an owner keeps while the facility is expired.
    pub expiry_remediation: Vec<String>,
    /// Route prefixes an owner keeps while over the staff cap.
    pub staff_limit_remediation: Vec<String>,
    /// Staff cap applied when the plan omits one or stores zero.
    pub default_staff_cap: u32,
}

impl Default for EntitlementSection {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            renewal_path: "/master/accounts".to_string(),
            staff_management_path: "/master/users".to_string(),
            expiry_remediation: vec![
                "/master/accounts".to_string(),
                "/subscription/change".to_string(),
                "/subscription/user-plan".to_string(),
            ],
            staff_limit_remediation: vec![
                "/master/users".to_string(),
                "/master/accounts".to_string(),
                "/subscription/change".to_string(),
            ],
            default_staff_cap: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSection {
    /// Emit an audit event for every decision and feed reset.
    pub audit_enabled: bool,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            audit_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level filter (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl KlinikaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Load configuration from a single TOML file, ignoring the layered
    /// sources.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the entitlement rules rely on.
    ///
    /// Every route must be rooted (start with `/`), both remediation lists
    /// must be non-empty, and the fallback staff cap must admit at least
    /// one member.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entitlement = &self.entitlement;

        if entitlement.default_staff_cap == 0 {
            return Err(ConfigError::ValidationError(
                "entitlement.default_staff_cap must be at least 1".to_string(),
            ));
        }

        for (field, path) in [
            ("entitlement.login_path", &entitlement.login_path),
            ("entitlement.renewal_path", &entitlement.renewal_path),
            (
                "entitlement.staff_management_path",
                &entitlement.staff_management_path,
            ),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must start with '/': {path:?}"
                )));
            }
        }

        for (field, prefixes) in [
            ("entitlement.expiry_remediation", &entitlement.expiry_remediation),
            (
                "entitlement.staff_limit_remediation",
                &entitlement.staff_limit_remediation,
            ),
        ] {
            if prefixes.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must list at least one route prefix"
                )));
            }
            for prefix in prefixes {
                if !prefix.starts_with('/') {
                    return Err(ConfigError::ValidationError(format!(
                        "{field} entries must start with '/': {prefix:?}"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KlinikaConfig::default();
        assert_eq!(config.entitlement.login_path, "/login");
        assert_eq!(config.entitlement.renewal_path, "/master/accounts");
        assert_eq!(config.entitlement.default_staff_cap, 1);
        assert_eq!(config.entitlement.expiry_remediation.len(), 3);
        assert!(config.gate.audit_enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_config_validates() {
        KlinikaConfig::default().validate().expect("defaults must be valid");
    }

    #[test]
    fn test_validate_rejects_zero_staff_cap() {
        let mut config = KlinikaConfig::default();
        config.entitlement.default_staff_cap = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_staff_cap"));
    }

    #[test]
    fn test_validate_rejects_unrooted_route() {
        let mut config = KlinikaConfig::default();
        config.entitlement.login_path = "login".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("login_path"));
    }

    #[test]
    fn test_validate_rejects_empty_remediation_list() {
        let mut config = KlinikaConfig::default();
        config.entitlement.expiry_remediation.clear();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("expiry_remediation"));
    }

    #[test]
    fn test_validate_rejects_unrooted_remediation_prefix() {
        let mut config = KlinikaConfig::default();
        config
            .entitlement
            .staff_limit_remediation
            .push("master/users".to_string());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("staff_limit_remediation"));
    }

    #[test]
    fn test_defaults_render_and_reparse_as_toml() {
        let rendered = toml::to_string(&KlinikaConfig::default()).expect("serialize");
        let reparsed: KlinikaConfig = toml::from_str(&rendered).expect("reparse");
        assert_eq!(
            reparsed.entitlement.staff_limit_remediation,
            KlinikaConfig::default().entitlement.staff_limit_remediation
        );
    }
}

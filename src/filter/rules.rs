//! Exclusion rules for architecture-specific sources
//!
//! Each rule is a case-sensitive substring test with an optional suffix
//! test. Rules never look at file contents or the filesystem.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Why a candidate file was vetoed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcludeReason {
    /// SIMD assembly for a specific architecture (ARM Helium `.S` files)
    ArchSpecificAssembly,
    /// Intrinsics-based vector code (ARM NEON)
    ArchSpecificVectorOptimization,
    /// Architecture-specific drawing backend (Arm-2D)
    ArchSpecificBackend,
}

impl ExcludeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExcludeReason::ArchSpecificAssembly => "arch_specific_assembly",
            ExcludeReason::ArchSpecificVectorOptimization => "arch_specific_vector_optimization",
            ExcludeReason::ArchSpecificBackend => "arch_specific_backend",
        }
    }
}

impl fmt::Display for ExcludeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single exclusion rule
///
/// A path matches when it contains `marker` and, if `suffix` is set, also
/// ends with `suffix`. Both comparisons are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub name: String,
    pub marker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub reason: ExcludeReason,
}

impl FilterRule {
    pub fn new(name: impl Into<String>, marker: impl Into<String>, reason: ExcludeReason) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
            suffix: None,
            reason,
        }
    }

    /// Restrict the rule to paths ending with `suffix`
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Test a normalized path against this rule
    pub fn check(&self, path: &str) -> Option<ExcludeReason> {
        if !path.contains(self.marker.as_str()) {
            return None;
        }
        match &self.suffix {
            Some(suffix) if !path.ends_with(suffix.as_str()) => None,
            _ => Some(self.reason),
        }
    }

    /// Reject rules that would match every path
    ///
    /// An empty marker is a substring of everything, so a configured rule
    /// with one would veto the whole library.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("filter rule with marker '{}' has an empty name", self.marker);
        }
        if self.marker.is_empty() {
            bail!("filter rule '{}' has an empty marker", self.name);
        }
        Ok(())
    }
}

/// Built-in rules for building LVGL on targets without ARM SIMD support
///
/// Initialized once and shared read-only by every filter instance.
pub static DEFAULT_RULES: LazyLock<Arc<[FilterRule]>> = LazyLock::new(|| {
    tracing::debug!("Initializing built-in ARM exclusion rules");
    Arc::from(vec![
        FilterRule::new("helium-assembly", "helium", ExcludeReason::ArchSpecificAssembly)
            .with_suffix(".S"),
        FilterRule::new("neon", "neon", ExcludeReason::ArchSpecificVectorOptimization),
        FilterRule::new("arm2d-backend", "arm2d", ExcludeReason::ArchSpecificBackend),
    ])
});

/// Shared handle to the built-in rule set
pub fn default_rules() -> Arc<[FilterRule]> {
    DEFAULT_RULES.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_loaded() {
        let rules = default_rules();
        assert_eq!(rules.len(), 3);
        assert!(rules.iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn test_suffix_is_required_when_set() {
        let rule = FilterRule::new("helium-assembly", "helium", ExcludeReason::ArchSpecificAssembly)
            .with_suffix(".S");

        assert_eq!(
            rule.check("src/libs/helium/lv_blend_helium.S"),
            Some(ExcludeReason::ArchSpecificAssembly)
        );
        assert_eq!(rule.check("src/libs/helium/lv_blend_helium.c"), None);
        // Suffix comparison is case-sensitive
        assert_eq!(rule.check("src/libs/helium/lv_blend_helium.s"), None);
    }

    #[test]
    fn test_marker_only_rule_ignores_extension() {
        let rule = FilterRule::new("neon", "neon", ExcludeReason::ArchSpecificVectorOptimization);

        assert!(rule.check("src/misc/lv_math_neon.c").is_some());
        assert!(rule.check("src/draw/sw/blend/neon/lv_blend_neon.h").is_some());
        assert!(rule.check("src/draw/sw/blend/neon/lv_blend_neon.S").is_some());
        assert!(rule.check("src/misc/lv_math.c").is_none());
        assert!(rule.check("src/misc/NEON.c").is_none());
    }

    #[test]
    fn test_validate_rejects_empty_marker() {
        let rule = FilterRule::new("catch-all", "", ExcludeReason::ArchSpecificBackend);
        assert!(rule.validate().is_err());

        let unnamed = FilterRule::new("  ", "rvv", ExcludeReason::ArchSpecificVectorOptimization);
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_reason_serialization() {
        let json = serde_json::to_string(&ExcludeReason::ArchSpecificBackend).unwrap();
        assert_eq!(json, "\"arch_specific_backend\"");

        let reason: ExcludeReason = serde_json::from_str("\"arch_specific_assembly\"").unwrap();
        assert_eq!(reason, ExcludeReason::ArchSpecificAssembly);
        assert_eq!(reason.to_string(), "arch_specific_assembly");
    }

    #[test]
    fn test_rule_deserializes_without_suffix() {
        let rule: FilterRule = toml::from_str(
            r#"
            name = "riscv-vector"
            marker = "rvv"
            reason = "arch_specific_vector_optimization"
            "#,
        )
        .unwrap();
        assert_eq!(rule.suffix, None);
        assert_eq!(
            rule.check("src/draw/rvv/lv_blend_rvv.c"),
            Some(ExcludeReason::ArchSpecificVectorOptimization)
        );
    }
}

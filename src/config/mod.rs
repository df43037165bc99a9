//! Configuration management for srcveto
//!
//! Settings are merged with figment from the embedded defaults, user and
//! project files, and `SRCVETO_*` environment variables. The filter itself
//! reads nothing; callers hand it a [`FilterSettings`].

mod core;

pub use self::core::SrcvetoConfig;

use crate::filter::FilterRule;
use anyhow::{Context, Result};
use globset::Glob;
use serde::{Deserialize, Serialize};

/// Root of the merged configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub filter: FilterSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub discovery: DiscoverySettings,
}

/// Which exclusion rules are active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Keep the built-in helium/neon/arm2d rules
    #[serde(default = "default_true")]
    pub use_default_rules: bool,

    /// Rules appended after the built-ins
    #[serde(default)]
    pub rules: Vec<FilterRule>,
}

/// Reference pipeline options used by `srcveto scan`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Glob scope the filter middleware is attached to
    ///
    /// Matched against paths relative to the scan root, so `scan lvgl`
    /// sees `src/misc/lv_math_neon.c`; a scope like `**/lvgl/**` never
    /// matches there. Use `src/**` style scopes instead.
    #[serde(default = "default_scope")]
    pub scope: String,
}

/// Candidate file discovery options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// File extensions treated as compilable sources (case-sensitive)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_true() -> bool {
    true
}

fn default_scope() -> String {
    crate::pipeline::WILDCARD_SCOPE.to_string()
}

fn default_extensions() -> Vec<String> {
    ["c", "cc", "cpp", "h", "hpp", "S", "s"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            use_default_rules: true,
            rules: Vec::new(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            scope: default_scope(),
        }
    }
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            follow_symlinks: false,
        }
    }
}

impl Settings {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for rule in &self.filter.rules {
            rule.validate()?;
        }

        Glob::new(&self.pipeline.scope)
            .with_context(|| format!("Invalid pipeline scope '{}'", self.pipeline.scope))?;

        if self.discovery.extensions.is_empty() {
            anyhow::bail!("At least one discovery extension must be specified");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ExcludeReason;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.pipeline.scope, "*");
    }

    #[test]
    fn test_invalid_scope_rejected() {
        let mut settings = Settings::default();
        settings.pipeline.scope = "src/[".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let mut settings = Settings::default();
        settings.discovery.extensions.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [filter]
            rules = [{ name = "arm2d-extra", marker = "arm_2d", reason = "arch_specific_backend" }]
            "#,
        )
        .unwrap();

        assert!(settings.filter.use_default_rules);
        assert_eq!(settings.filter.rules[0].reason, ExcludeReason::ArchSpecificBackend);
        assert_eq!(settings.discovery.extensions.len(), 7);
    }
}

//! Inclusion filter for candidate source files
//!
//! The filter decides, from the path alone, whether a file discovered in a
//! third-party library should be compiled. It never touches the filesystem,
//! keeps no state between calls and cannot fail: anything that does not
//! positively match a rule is included.
//!
//! ```rust
//! use srcveto::filter::{Decision, ExcludeReason, InclusionFilter};
//!
//! let filter = InclusionFilter::new();
//! assert_eq!(
//!     filter.evaluate("lib/lvgl/src/misc/lv_math_neon.c"),
//!     Decision::Exclude(ExcludeReason::ArchSpecificVectorOptimization)
//! );
//! assert!(filter.should_include("lib/lvgl/src/core/lv_obj.c"));
//! ```

pub mod rules;
pub mod source;

pub use rules::{DEFAULT_RULES, ExcludeReason, FilterRule, default_rules};
pub use source::SourcePath;

use crate::config::FilterSettings;
use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of evaluating one candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    /// Compile the file
    Include,
    /// Drop the file as if it was never discovered
    Exclude(ExcludeReason),
}

impl Decision {
    pub fn is_include(&self) -> bool {
        matches!(self, Decision::Include)
    }

    pub fn reason(&self) -> Option<ExcludeReason> {
        match self {
            Decision::Include => None,
            Decision::Exclude(reason) => Some(*reason),
        }
    }
}

/// Stateless path filter over an immutable rule set
///
/// Cloning shares the rules; the filter is safe to call from any number of
/// threads.
#[derive(Debug, Clone)]
pub struct InclusionFilter {
    rules: Arc<[FilterRule]>,
}

impl Default for InclusionFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl InclusionFilter {
    /// Filter with the built-in ARM rules
    pub fn new() -> Self {
        Self { rules: default_rules() }
    }

    /// Filter with an explicit rule set, validated up front
    pub fn with_rules(rules: Vec<FilterRule>) -> Result<Self> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules: Arc::from(rules) })
    }

    /// Build the filter described by configuration
    ///
    /// Configured rules are appended after the built-ins unless
    /// `use_default_rules` is off.
    pub fn from_settings(settings: &FilterSettings) -> Result<Self> {
        if settings.use_default_rules && settings.rules.is_empty() {
            return Ok(Self::new());
        }

        let mut rules = Vec::with_capacity(DEFAULT_RULES.len() + settings.rules.len());
        if settings.use_default_rules {
            rules.extend(DEFAULT_RULES.iter().cloned());
        } else {
            tracing::info!("Built-in exclusion rules disabled by configuration");
        }
        rules.extend(settings.rules.iter().cloned());

        let filter = Self::with_rules(rules)?;
        tracing::debug!("Filter configured with {} rules", filter.rules.len());
        Ok(filter)
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Decide whether `candidate` takes part in compilation
    ///
    /// Rules are OR-ed; the first matching rule supplies the reason.
    pub fn evaluate<S: SourcePath + ?Sized>(&self, candidate: &S) -> Decision {
        let Some(path) = candidate.source_path() else {
            tracing::trace!("Candidate has no usable path, including");
            return Decision::Include;
        };
        let path = source::normalize(path);

        for rule in self.rules.iter() {
            if let Some(reason) = rule.check(&path) {
                tracing::debug!(rule = %rule.name, %reason, "Excluding {}", path);
                return Decision::Exclude(reason);
            }
        }

        tracing::trace!("Including {}", path);
        Decision::Include
    }

    pub fn should_include<S: SourcePath + ?Sized>(&self, candidate: &S) -> bool {
        self.evaluate(candidate).is_include()
    }

    /// Keep only the candidates that should be compiled
    pub fn filter_paths<'a, P: SourcePath>(&self, paths: &'a [P]) -> Vec<&'a P> {
        paths.iter().filter(|path| self.should_include(*path)).collect()
    }

    /// Split candidates into included and excluded (with reasons)
    pub fn partition<P, I>(&self, candidates: I) -> (Vec<P>, Vec<(P, ExcludeReason)>)
    where
        P: SourcePath,
        I: IntoIterator<Item = P>,
    {
        let mut included = Vec::new();
        let mut excluded = Vec::new();
        for candidate in candidates {
            match self.evaluate(&candidate) {
                Decision::Include => included.push(candidate),
                Decision::Exclude(reason) => excluded.push((candidate, reason)),
            }
        }
        (included, excluded)
    }

    /// Evaluate a batch on the rayon pool; decisions keep input order
    pub fn evaluate_all_parallel<P: SourcePath + Sync>(&self, paths: &[P]) -> Vec<Decision> {
        paths.par_iter().map(|path| self.evaluate(path)).collect()
    }
}

/// Counts over a batch of decisions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub evaluated: usize,
    pub included: usize,
    pub excluded: usize,
    pub by_reason: BTreeMap<&'static str, usize>,
}

impl FilterStats {
    pub fn record(&mut self, decision: Decision) {
        self.evaluated += 1;
        match decision {
            Decision::Include => self.included += 1,
            Decision::Exclude(reason) => {
                self.excluded += 1;
                *self.by_reason.entry(reason.as_str()).or_insert(0) += 1;
            }
        }
    }
}

impl FromIterator<Decision> for FilterStats {
    fn from_iter<I: IntoIterator<Item = Decision>>(iter: I) -> Self {
        let mut stats = FilterStats::default();
        for decision in iter {
            stats.record(decision);
        }
        stats
    }
}

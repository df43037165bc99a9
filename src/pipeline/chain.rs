use super::{BuildPipeline, Middleware};
use crate::filter::SourcePath;
use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use rayon::prelude::*;

/// Middleware attached to a compiled glob scope
struct ScopedMiddleware<N> {
    scope: String,
    matcher: GlobMatcher,
    middleware: Middleware<N>,
}

/// In-memory build pipeline
///
/// Nodes pass through middleware in registration order. Middleware only
/// runs on nodes whose path matches its scope, and a dropped node never
/// reaches the remaining middleware.
pub struct MiddlewareChain<N> {
    stages: Vec<ScopedMiddleware<N>>,
}

impl<N> Default for MiddlewareChain<N> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<N> MiddlewareChain<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|stage| stage.scope.as_str())
    }
}

impl<N: SourcePath> MiddlewareChain<N> {
    /// Run one node through the chain
    pub fn process(&self, node: N) -> Option<N> {
        let mut node = node;
        for stage in &self.stages {
            let in_scope = {
                let path = node.source_path();
                stage.matcher.is_match(path.as_deref().unwrap_or(""))
            };
            if !in_scope {
                continue;
            }
            match (stage.middleware)(node) {
                Some(next) => node = next,
                None => {
                    tracing::trace!("Node dropped by middleware scoped to '{}'", stage.scope);
                    return None;
                }
            }
        }
        Some(node)
    }
}

impl<N: SourcePath + Send> MiddlewareChain<N> {
    /// Run a batch through the chain in parallel; survivors keep input order
    pub fn process_all(&self, nodes: Vec<N>) -> Vec<N> {
        let total = nodes.len();
        let kept: Vec<N> = nodes
            .into_par_iter()
            .filter_map(|node| self.process(node))
            .collect();
        tracing::debug!("Pipeline kept {} of {} nodes", kept.len(), total);
        kept
    }
}

impl<N> BuildPipeline<N> for MiddlewareChain<N> {
    fn add_build_middleware(&mut self, middleware: Middleware<N>, scope: &str) -> Result<()> {
        let matcher = Glob::new(scope)
            .with_context(|| format!("Invalid middleware scope '{scope}'"))?
            .compile_matcher();
        self.stages.push(ScopedMiddleware {
            scope: scope.to_string(),
            matcher,
            middleware,
        });
        Ok(())
    }
}

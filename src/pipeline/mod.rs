//! Build pipeline integration
//!
//! The filter plugs into a host build pipeline as per-file middleware. The
//! host is abstracted as [`BuildPipeline`]: anything that can attach a
//! callback to every build node inside a file-group scope. A middleware
//! returns the node to keep it or `None` to drop it, after which no later
//! middleware sees the node.
//!
//! [`MiddlewareChain`] is an in-memory pipeline used by the CLI and tests.

pub mod chain;

pub use chain::MiddlewareChain;

use crate::filter::{InclusionFilter, SourcePath};
use anyhow::Result;
use std::sync::Arc;

/// Scope that covers every file of a dependency
pub const WILDCARD_SCOPE: &str = "*";

/// Per-node callback: `Some(node)` keeps, `None` drops
pub type Middleware<N> = Arc<dyn Fn(N) -> Option<N> + Send + Sync>;

/// Host pipeline extension point
pub trait BuildPipeline<N> {
    /// Attach `middleware` to every build node whose path matches `scope`
    fn add_build_middleware(&mut self, middleware: Middleware<N>, scope: &str) -> Result<()>;
}

impl InclusionFilter {
    /// Adapter closure for [`BuildPipeline::add_build_middleware`]
    pub fn middleware<N>(&self) -> Middleware<N>
    where
        N: SourcePath + 'static,
    {
        let filter = self.clone();
        Arc::new(move |node: N| if filter.should_include(&node) { Some(node) } else { None })
    }
}

/// Register `filter` with the host pipeline over the wildcard scope
///
/// Called once at build setup. Errors come from the host's registration
/// API and are passed through untouched.
pub fn register<N, P>(pipeline: &mut P, filter: &InclusionFilter) -> Result<()>
where
    N: SourcePath + 'static,
    P: BuildPipeline<N> + ?Sized,
{
    tracing::debug!(
        "Registering source filter ({} rules) with scope '{}'",
        filter.rules().len(),
        WILDCARD_SCOPE
    );
    pipeline.add_build_middleware(filter.middleware(), WILDCARD_SCOPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::path::PathBuf;

    /// Records registrations without running anything
    #[derive(Default)]
    struct RecordingPipeline {
        registered: Vec<(Middleware<PathBuf>, String)>,
    }

    impl BuildPipeline<PathBuf> for RecordingPipeline {
        fn add_build_middleware(
            &mut self,
            middleware: Middleware<PathBuf>,
            scope: &str,
        ) -> Result<()> {
            self.registered.push((middleware, scope.to_string()));
            Ok(())
        }
    }

    struct BrokenPipeline;

    impl BuildPipeline<PathBuf> for BrokenPipeline {
        fn add_build_middleware(
            &mut self,
            _middleware: Middleware<PathBuf>,
            _scope: &str,
        ) -> Result<()> {
            bail!("middleware API unavailable")
        }
    }

    #[test]
    fn test_register_once_with_wildcard() {
        let mut pipeline = RecordingPipeline::default();
        register(&mut pipeline, &InclusionFilter::new()).unwrap();

        assert_eq!(pipeline.registered.len(), 1);
        assert_eq!(pipeline.registered[0].1, "*");

        let middleware = &pipeline.registered[0].0;
        let kept = PathBuf::from("lib/lvgl/src/core/lv_obj.c");
        assert_eq!(middleware(kept.clone()), Some(kept));
        assert_eq!(middleware(PathBuf::from("lib/lvgl/src/misc/lv_math_neon.c")), None);
    }

    #[test]
    fn test_registration_failure_is_propagated() {
        let err = register(&mut BrokenPipeline, &InclusionFilter::new()).unwrap_err();
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn test_middleware_returns_same_handle() {
        #[derive(Debug, PartialEq)]
        struct Node {
            id: u32,
            path: String,
        }

        impl SourcePath for Node {
            fn source_path(&self) -> Option<std::borrow::Cow<'_, str>> {
                Some(self.path.as_str().into())
            }
        }

        let middleware = InclusionFilter::new().middleware::<Node>();
        let node = Node {
            id: 7,
            path: "lib/lvgl/src/libs/helium/lv_blend_helium.c".to_string(),
        };
        assert_eq!(middleware(node).map(|n| n.id), Some(7));

        let dropped = Node {
            id: 8,
            path: "lib/lvgl/src/libs/helium/lv_blend_helium.S".to_string(),
        };
        assert!(middleware(dropped).is_none());
    }
}

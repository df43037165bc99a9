//! # srcveto - build-time source filter for LVGL on non-ARM targets
//!
//! LVGL ships ARM-only code paths (Helium assembly, NEON intrinsics, the
//! Arm-2D drawing backend) inside its regular source tree. Targets such as
//! ESP32 cannot compile them. srcveto vetoes those files before a build
//! pipeline schedules them, deciding from the path alone.
//!
//! ## Quick Start
//!
//! ```rust
//! use srcveto::filter::InclusionFilter;
//! use srcveto::pipeline::{MiddlewareChain, register};
//! use std::path::PathBuf;
//!
//! let mut pipeline = MiddlewareChain::new();
//! register(&mut pipeline, &InclusionFilter::new())?;
//!
//! let kept = pipeline.process_all(vec![
//!     PathBuf::from("lvgl/src/core/lv_obj.c"),
//!     PathBuf::from("lvgl/src/misc/lv_math_neon.c"),
//! ]);
//! assert_eq!(kept, vec![PathBuf::from("lvgl/src/core/lv_obj.c")]);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod filter;
pub mod pipeline;

pub use config::{Settings, SrcvetoConfig};
pub use filter::{Decision, ExcludeReason, InclusionFilter};

/// Result type alias for srcveto operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

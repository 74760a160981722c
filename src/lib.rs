//! xc - a declarative launcher for xcodebuild
//!
//! Reads `xc.yaml`, resolves a named command (and optional variant) into an
//! xcodebuild invocation or a shell script, and runs it with its hooks and
//! output formatter. Resolution itself lives in `xc_core`; this crate adds
//! file discovery, process execution and the listings behind the CLI.

pub mod destinations;
pub mod explain;
pub mod hooks;
pub mod launch;
pub mod list;
pub mod loader;
pub mod logging;
pub mod runner;

pub use explain::ExplainOutput;
pub use launch::{launch, LaunchOptions, LaunchRequest};
pub use loader::ConfigLoader;
pub use xc_core::{LoadedConfig, ResolvedCommand, XcError, XcResult};

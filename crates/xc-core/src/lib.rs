//! xc core - layered resolution of xc.yaml commands
//!
//! Loads nothing and runs nothing: callers hand in an expanded, validated
//! [`LoadedConfig`] and get back a [`ResolvedCommand`] describing either an
//! xcodebuild invocation or a shell script.

pub mod config;
pub mod error;
pub mod expand;
pub mod resolver;
mod validate;

pub use config::{
    CommandConfig, ConfigOrigin, ConfigSource, Destination, GlobalConfig, HookConfig,
    LoadedConfig, ProjectConfig, Settings,
};
pub use error::{XcError, XcResult};
pub use expand::{expand, expand_with, ExpandEnv};
pub use resolver::{resolve, split_command_token, Launch, ResolvedCommand};

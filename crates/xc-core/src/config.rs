//! Project and global configuration (xc.yaml)
//!
//! One settings shape (`CommandConfig`) is reused for commands, their
//! variants and the `defaults` blocks of both the project and the global
//! file. Which fields a layer actually contributes is decided by the
//! resolver, not by the schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::XcResult;

/// A destination value: one descriptor or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Destination {
    Single(String),
    Multiple(Vec<String>),
}

impl Destination {
    /// Normalize to an ordered list of entries
    pub fn values(&self) -> Vec<&str> {
        match self {
            Destination::Single(value) => vec![value.as_str()],
            Destination::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Destination {
    fn from(value: &str) -> Self {
        Destination::Single(value.to_string())
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Single(value) => write!(f, "{}", value),
            Destination::Multiple(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

/// Shell commands run around the main command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
    /// Run before the main command; a failure aborts the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<String>,

    /// Run only after the main command succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,
}

/// Settings for a command, a variant, or a `defaults` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandConfig {
    /// Literal shell script; its presence switches the command to script mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,

    /// Alias name(s) or literal destination descriptor(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_plan: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_bundle_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xcconfig: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_data_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<String>,

    /// Arguments appended after the generated flags. A variant's list
    /// replaces the command's list entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<HookConfig>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<String, CommandConfig>,
}

impl CommandConfig {
    /// Variant names in sorted order
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.keys().cloned().collect()
    }
}

/// Launcher settings (formatter, verbosity)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Output formatter: "xcbeautify", "raw", or any shell command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// Project configuration from xc.yaml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project path (e.g., "MyApp.xcodeproj")
    /// Mutually exclusive with workspace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Workspace path (e.g., "MyApp.xcworkspace")
    /// Mutually exclusive with project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,

    /// Destination aliases: name -> literal descriptor
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub destinations: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<CommandConfig>,

    /// Project-level settings; take precedence over the global ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,

    #[serde(default)]
    pub commands: BTreeMap<String, CommandConfig>,
}

impl ProjectConfig {
    /// Parse a project config from YAML. Does not expand or validate.
    pub fn from_yaml_str(s: &str) -> XcResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Configured command names in sorted order
    pub fn command_names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }
}

/// User-level configuration (~/.config/xc/config.yaml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<CommandConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl GlobalConfig {
    /// Parse a global config from YAML. Does not expand.
    pub fn from_yaml_str(s: &str) -> XcResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}

/// Origin of a configuration source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Project,
    Global,
}

/// A contributing config file with provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    pub path: PathBuf,

    /// SHA-256 of the raw file bytes, lowercase hex
    pub digest: String,
}

/// An immutable configuration snapshot handed to the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Expanded and validated project config
    pub project: ProjectConfig,

    /// Expanded global config, if one exists
    pub global: Option<GlobalConfig>,

    /// Directory that contains xc.yaml
    pub project_root: PathBuf,

    /// Files that contributed to this snapshot, project first
    pub sources: Vec<ConfigSource>,
}

impl LoadedConfig {
    /// Snapshot with no file provenance, rooted at "."
    pub fn new(project: ProjectConfig, global: Option<GlobalConfig>) -> Self {
        Self {
            project,
            global,
            project_root: PathBuf::from("."),
            sources: Vec::new(),
        }
    }

    /// Set the project root
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Global verbose setting, project settings first
    pub fn verbose(&self) -> bool {
        let project = self.project.settings.as_ref().and_then(|s| s.verbose);
        let global = self
            .global
            .as_ref()
            .and_then(|g| g.settings.as_ref())
            .and_then(|s| s.verbose);
        project.or(global).unwrap_or(false)
    }
}

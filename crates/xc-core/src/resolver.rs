//! Command resolution
//!
//! Turns a command name (plus optional variant) into either an xcodebuild
//! argv or a literal shell script. Each build setting is looked up through
//! an ordered list of layers and the first layer that sets it wins:
//!
//! 1. the selected variant
//! 2. the command
//! 3. project `defaults`
//! 4. global `defaults`
//!
//! `archive-path`, `extra-args`, `hooks` and `run` only consult the first
//! two layers. A `--dest` override replaces every destination layer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CommandConfig, HookConfig, LoadedConfig};
use crate::error::{XcError, XcResult};

/// Build tool binary placed at the head of every invocation
pub const BUILD_TOOL: &str = "xcodebuild";

/// Actions that accept `-testPlan` and `-resultBundlePath`
pub const TEST_ACTIONS: &[&str] = &["test", "test-without-building"];

/// Action that accepts `-archivePath`
pub const ARCHIVE_ACTION: &str = "archive";

/// What the executor should launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Launch {
    /// xcodebuild argv, binary name first
    Build(Vec<String>),
    /// Shell command line
    Script(String),
}

/// A fully resolved command, ready for execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCommand {
    pub launch: Launch,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hooks: Option<HookConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
}

impl ResolvedCommand {
    /// Build tool argv; empty in script mode
    pub fn invocation(&self) -> &[String] {
        match &self.launch {
            Launch::Build(args) => args,
            Launch::Script(_) => &[],
        }
    }

    /// Shell script; `None` in build mode
    pub fn script(&self) -> Option<&str> {
        match &self.launch {
            Launch::Build(_) => None,
            Launch::Script(script) => Some(script),
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self.launch, Launch::Script(_))
    }

    /// Printable command line. Arguments containing spaces are quoted.
    pub fn display_line(&self) -> String {
        match &self.launch {
            Launch::Script(script) => script.clone(),
            Launch::Build(args) => args
                .iter()
                .map(|arg| {
                    if arg.contains(' ') {
                        format!("\"{}\"", arg)
                    } else {
                        arg.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The settings layers that apply to one resolution, highest precedence first
struct Layers<'a> {
    variant: Option<&'a CommandConfig>,
    command: &'a CommandConfig,
    project_defaults: Option<&'a CommandConfig>,
    global_defaults: Option<&'a CommandConfig>,
}

impl<'a> Layers<'a> {
    /// variant, command, project defaults, global defaults
    fn all(&self) -> Vec<&'a CommandConfig> {
        [
            self.variant,
            Some(self.command),
            self.project_defaults,
            self.global_defaults,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// variant, command
    fn local(&self) -> Vec<&'a CommandConfig> {
        [self.variant, Some(self.command)]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// First layer that sets a field wins
fn first_present<'a, T: ?Sized>(
    layers: &[&'a CommandConfig],
    field: impl Fn(&'a CommandConfig) -> Option<&'a T>,
) -> Option<&'a T> {
    layers.iter().copied().find_map(field)
}

/// Split a `command[:variant]` token on the first colon
pub fn split_command_token(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((command, variant)) => (command, Some(variant)),
        None => (token, None),
    }
}

/// Whether `action` takes `-testPlan` / `-resultBundlePath`
pub fn is_test_action(action: &str) -> bool {
    TEST_ACTIONS.contains(&action)
}

/// Whether `action` takes `-archivePath`
pub fn is_archive_action(action: &str) -> bool {
    action == ARCHIVE_ACTION
}

/// Resolve a command against a loaded config
///
/// This is a pure function: (request, config) -> ResolvedCommand
pub fn resolve(
    command_name: &str,
    variant: Option<&str>,
    config: &LoadedConfig,
    destination_override: Option<&str>,
    passthrough: &[String],
) -> XcResult<ResolvedCommand> {
    let project = &config.project;

    let command = project
        .commands
        .get(command_name)
        .ok_or_else(|| XcError::UnknownCommand {
            name: command_name.to_string(),
            available: project.command_names(),
        })?;

    let variant_config = match variant {
        Some(name) => Some(command.variants.get(name).ok_or_else(|| {
            XcError::UnknownVariant {
                command: command_name.to_string(),
                variant: name.to_string(),
                available: command.variant_names(),
            }
        })?),
        None => None,
    };

    let layers = Layers {
        variant: variant_config,
        command,
        project_defaults: project.defaults.as_ref(),
        global_defaults: config.global.as_ref().and_then(|g| g.defaults.as_ref()),
    };
    let local = layers.local();

    let hooks = first_present(&local, |c| c.hooks.as_ref()).cloned();
    let formatter = resolve_formatter(config);
    let extra_args: &[String] =
        first_present(&local, |c| c.extra_args.as_deref()).unwrap_or(&[]);

    if let Some(script) = first_present(&local, |c| c.run.as_deref()) {
        debug!(command = command_name, variant, "resolved in script mode");
        let script = std::iter::once(script)
            .chain(extra_args.iter().map(String::as_str))
            .chain(passthrough.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        return Ok(ResolvedCommand {
            launch: Launch::Script(script),
            hooks,
            formatter,
        });
    }

    let all = layers.all();
    let action = command_name;

    let mut args = vec![BUILD_TOOL.to_string(), action.to_string()];

    if let Some(path) = &project.project {
        push_flag(&mut args, "-project", path);
    } else if let Some(path) = &project.workspace {
        push_flag(&mut args, "-workspace", path);
    }

    if let Some(xcconfig) = first_present(&all, |c| c.xcconfig.as_deref()) {
        push_flag(&mut args, "-xcconfig", xcconfig);
    }
    if let Some(scheme) = first_present(&all, |c| c.scheme.as_deref()) {
        push_flag(&mut args, "-scheme", scheme);
    }
    if let Some(configuration) = first_present(&all, |c| c.configuration.as_deref()) {
        push_flag(&mut args, "-configuration", configuration);
    }

    for destination in resolve_destinations(&layers, config, destination_override) {
        push_flag(&mut args, "-destination", &destination);
    }

    if let Some(path) = first_present(&all, |c| c.derived_data_path.as_deref()) {
        push_flag(&mut args, "-derivedDataPath", path);
    }

    if is_test_action(action) {
        if let Some(plan) = first_present(&all, |c| c.test_plan.as_deref()) {
            push_flag(&mut args, "-testPlan", plan);
        }
        if let Some(path) = first_present(&all, |c| c.result_bundle_path.as_deref()) {
            push_flag(&mut args, "-resultBundlePath", path);
        }
    }

    if is_archive_action(action) {
        if let Some(path) = first_present(&local, |c| c.archive_path.as_deref()) {
            push_flag(&mut args, "-archivePath", path);
        }
    }

    args.extend(extra_args.iter().cloned());
    args.extend(passthrough.iter().cloned());

    debug!(command = command_name, variant, argc = args.len(), "resolved build invocation");

    Ok(ResolvedCommand {
        launch: Launch::Build(args),
        hooks,
        formatter,
    })
}

fn push_flag(args: &mut Vec<String>, flag: &str, value: &str) {
    args.push(flag.to_string());
    args.push(value.to_string());
}

/// Resolve destination entries and expand aliases, preserving order
fn resolve_destinations(
    layers: &Layers<'_>,
    config: &LoadedConfig,
    destination_override: Option<&str>,
) -> Vec<String> {
    let raw: Vec<&str> = match destination_override {
        Some(value) => vec![value],
        None => first_present(&layers.all(), |c| c.destination.as_ref())
            .map(|d| d.values())
            .unwrap_or_default(),
    };

    let aliases = &config.project.destinations;
    raw.into_iter()
        .map(|entry| match aliases.get(entry) {
            Some(literal) => literal.clone(),
            None => entry.to_string(),
        })
        .collect()
}

/// Formatter: project settings first, then global settings
fn resolve_formatter(config: &LoadedConfig) -> Option<String> {
    let project = config
        .project
        .settings
        .as_ref()
        .and_then(|s| s.formatter.as_ref());
    let global = config
        .global
        .as_ref()
        .and_then(|g| g.settings.as_ref())
        .and_then(|s| s.formatter.as_ref());
    project.or(global).cloned()
}

//! Environment variable expansion for configuration values
//!
//! Only the braced forms are recognized:
//! - `${NAME}` expands to the variable, or to nothing
//! - `${NAME:-default}` expands to the variable, or to `default`
//!
//! A bare `$NAME` is left as written, as is an unterminated `${`.
//! Set-but-empty variables count as unset.

use std::collections::BTreeMap;

use crate::config::{CommandConfig, Destination, GlobalConfig, HookConfig, ProjectConfig, Settings};

/// Expand `${...}` references against the process environment
pub fn expand(text: &str) -> String {
    expand_with(text, &env_lookup)
}

/// Expand `${...}` references using `lookup` to resolve names
pub fn expand_with<F>(text: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(text.len());
    let mut remaining = text;

    while let Some(dollar) = remaining.find('$') {
        result.push_str(&remaining[..dollar]);
        let after_dollar = &remaining[dollar + 1..];

        let Some(body) = after_dollar.strip_prefix('{') else {
            result.push('$');
            remaining = after_dollar;
            continue;
        };

        let Some(close) = body.find('}') else {
            result.push_str("${");
            remaining = body;
            continue;
        };

        let (name, default) = parse_var_expression(&body[..close]);
        let value = if name.is_empty() {
            None
        } else {
            lookup(name).filter(|v| !v.is_empty())
        };

        match (value, default) {
            (Some(value), _) => result.push_str(&value),
            (None, Some(default)) => result.push_str(default),
            (None, None) => {}
        }

        remaining = &body[close + 1..];
    }

    result.push_str(remaining);
    result
}

/// Split `NAME:-default` into its name and optional default
pub fn parse_var_expression(expr: &str) -> (&str, Option<&str>) {
    match expr.split_once(":-") {
        Some((name, default)) => (name, Some(default)),
        None => (expr, None),
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Applies expansion to every string value of a config tree
pub trait ExpandEnv: Sized {
    fn expand_env_with<F>(self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>;

    fn expand_env(self) -> Self {
        self.expand_env_with(&env_lookup)
    }
}

fn opt<F>(value: Option<String>, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    value.map(|v| expand_with(&v, lookup))
}

impl ExpandEnv for Destination {
    fn expand_env_with<F>(self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            Destination::Single(value) => Destination::Single(expand_with(&value, lookup)),
            Destination::Multiple(values) => Destination::Multiple(
                values.iter().map(|v| expand_with(v, lookup)).collect(),
            ),
        }
    }
}

impl ExpandEnv for HookConfig {
    fn expand_env_with<F>(self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        HookConfig {
            pre: opt(self.pre, lookup),
            post: opt(self.post, lookup),
        }
    }
}

impl ExpandEnv for Settings {
    fn expand_env_with<F>(self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Settings {
            formatter: opt(self.formatter, lookup),
            verbose: self.verbose,
        }
    }
}

impl ExpandEnv for CommandConfig {
    fn expand_env_with<F>(self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        CommandConfig {
            run: opt(self.run, lookup),
            scheme: opt(self.scheme, lookup),
            configuration: opt(self.configuration, lookup),
            destination: self.destination.map(|d| d.expand_env_with(lookup)),
            test_plan: opt(self.test_plan, lookup),
            result_bundle_path: opt(self.result_bundle_path, lookup),
            xcconfig: opt(self.xcconfig, lookup),
            derived_data_path: opt(self.derived_data_path, lookup),
            archive_path: opt(self.archive_path, lookup),
            extra_args: self
                .extra_args
                .map(|args| args.iter().map(|a| expand_with(a, lookup)).collect()),
            hooks: self.hooks.map(|h| h.expand_env_with(lookup)),
            variants: expand_map(self.variants, lookup),
        }
    }
}

fn expand_map<F>(
    map: BTreeMap<String, CommandConfig>,
    lookup: &F,
) -> BTreeMap<String, CommandConfig>
where
    F: Fn(&str) -> Option<String>,
{
    map.into_iter()
        .map(|(name, config)| (name, config.expand_env_with(lookup)))
        .collect()
}

impl ExpandEnv for ProjectConfig {
    fn expand_env_with<F>(self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        ProjectConfig {
            project: opt(self.project, lookup),
            workspace: opt(self.workspace, lookup),
            destinations: self
                .destinations
                .into_iter()
                .map(|(name, value)| (name, expand_with(&value, lookup)))
                .collect(),
            defaults: self.defaults.map(|d| d.expand_env_with(lookup)),
            settings: self.settings.map(|s| s.expand_env_with(lookup)),
            commands: expand_map(self.commands, lookup),
        }
    }
}

impl ExpandEnv for GlobalConfig {
    fn expand_env_with<F>(self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        GlobalConfig {
            defaults: self.defaults.map(|d| d.expand_env_with(lookup)),
            settings: self.settings.map(|s| s.expand_env_with(lookup)),
        }
    }
}

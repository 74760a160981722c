//! Launch orchestration
//!
//! Resolves a `command[:variant]` token and runs it:
//! pre-hook -> main command -> post-hook. A failing pre-hook stops the run
//! before the main command; the post-hook only runs after success.

use std::io::{self, Write};
use tracing::{debug, info};

use xc_core::{resolve, split_command_token, LoadedConfig, ResolvedCommand, XcResult};

use crate::hooks::{post_label, pre_label, run_hook};
use crate::runner::{self, resolve_formatter};

/// CLI switches that affect how a resolved command is run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Show unformatted xcodebuild output
    pub raw: bool,
    /// Echo the resolved command before running it
    pub verbose: bool,
    /// Print what would run without running it
    pub dry_run: bool,
}

/// A resolution request as given on the command line
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    /// `command` or `command:variant`
    pub token: String,
    pub destination: Option<String>,
    /// Arguments after `--`
    pub passthrough: Vec<String>,
}

impl LaunchRequest {
    /// Resolve against `config`
    pub fn resolve(&self, config: &LoadedConfig) -> XcResult<ResolvedCommand> {
        let (command, variant) = split_command_token(&self.token);
        resolve(
            command,
            variant,
            config,
            self.destination.as_deref(),
            &self.passthrough,
        )
    }

    /// Command name without the variant suffix
    pub fn command_name(&self) -> &str {
        split_command_token(&self.token).0
    }
}

/// Resolve and run a request
pub fn launch(request: &LaunchRequest, config: &LoadedConfig, options: LaunchOptions) -> XcResult<()> {
    let resolved = request.resolve(config)?;
    let command = request.command_name();

    if options.dry_run {
        for line in dry_run_lines(command, &resolved) {
            println!("{}", line);
        }
        return Ok(());
    }

    let root = &config.project_root;
    let hooks = resolved.hooks.clone().unwrap_or_default();

    if let Some(ref pre) = hooks.pre {
        run_hook(pre, &pre_label(command), root)?;
    }

    if options.verbose || config.verbose() {
        println!("$ {}", resolved.display_line());
        io::stdout().flush()?;
    }

    let formatter = if resolved.is_script() {
        None
    } else {
        resolve_formatter(resolved.formatter.as_deref(), options.raw)
    };
    debug!(formatter = ?formatter, "selected formatter");

    runner::exec(&resolved, formatter.as_deref(), root)?;
    info!(command, "command succeeded");

    if let Some(ref post) = hooks.post {
        run_hook(post, &post_label(command), root)?;
    }

    Ok(())
}

/// Lines printed by `--dry-run`, in execution order
pub fn dry_run_lines(command: &str, resolved: &ResolvedCommand) -> Vec<String> {
    let mut lines = Vec::new();
    let hooks = resolved.hooks.as_ref();

    if let Some(pre) = hooks.and_then(|h| h.pre.as_ref()) {
        lines.push(format!("[{}] {}", pre_label(command), pre));
    }
    lines.push(format!("$ {}", resolved.display_line()));
    if let Some(post) = hooks.and_then(|h| h.post.as_ref()) {
        lines.push(format!("[{}] {}", post_label(command), post));
    }

    lines
}

//! `xc explain` output
//!
//! Shows what a command token resolves to, and which config files
//! contributed, without running anything.

use serde::{Deserialize, Serialize};

use xc_core::{ConfigSource, Launch, ResolvedCommand};

/// Explanation of a resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainOutput {
    /// Command name as configured
    pub command: String,

    /// Selected variant, if any
    pub variant: Option<String>,

    /// The resolved command
    pub resolved: ResolvedCommand,

    /// Contributing config files in precedence order
    pub sources: Vec<ConfigSource>,
}

impl ExplainOutput {
    pub fn new(
        command: &str,
        variant: Option<&str>,
        resolved: ResolvedCommand,
        sources: Vec<ConfigSource>,
    ) -> Self {
        Self {
            command: command.to_string(),
            variant: variant.map(str::to_string),
            resolved,
            sources,
        }
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_human(&self) -> String {
        let mut output = match &self.variant {
            Some(variant) => format!("Command: {}:{}\n", self.command, variant),
            None => format!("Command: {}\n", self.command),
        };

        match &self.resolved.launch {
            Launch::Script(script) => {
                output.push_str("Mode: script\n");
                output.push_str(&format!("Script: {}\n", script));
            }
            Launch::Build(_) => {
                output.push_str("Mode: build\n");
                output.push_str(&format!("Invocation: {}\n", self.resolved.display_line()));
            }
        }

        if let Some(ref hooks) = self.resolved.hooks {
            if let Some(ref pre) = hooks.pre {
                output.push_str(&format!("Pre hook: {}\n", pre));
            }
            if let Some(ref post) = hooks.post {
                output.push_str(&format!("Post hook: {}\n", post));
            }
        }

        if let Some(ref formatter) = self.resolved.formatter {
            output.push_str(&format!("Formatter: {}\n", formatter));
        }

        if !self.sources.is_empty() {
            output.push_str("\n--- Config Sources ---\n");
            for source in &self.sources {
                let origin = match source.origin {
                    xc_core::ConfigOrigin::Project => "project",
                    xc_core::ConfigOrigin::Global => "global",
                };
                output.push_str(&format!(
                    "{}: {} (sha256 {})\n",
                    origin,
                    source.path.display(),
                    source.digest
                ));
            }
        }

        output
    }
}

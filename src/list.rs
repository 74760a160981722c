//! `xc list` output

use xc_core::{CommandConfig, ProjectConfig};

/// Render configured commands and their variants, sorted by name
pub fn render_commands(config: &ProjectConfig) -> String {
    if config.commands.is_empty() {
        return "No commands defined in xc.yaml.\n".to_string();
    }

    let mut output = String::new();
    for (name, command) in &config.commands {
        output.push_str(name);
        output.push('\n');

        for (variant_name, variant) in &command.variants {
            let summary = summarize_variant(variant);
            if summary.is_empty() {
                output.push_str(&format!("  :{}\n", variant_name));
            } else {
                output.push_str(&format!("  :{}\t{}\n", variant_name, summary));
            }
        }
    }
    output
}

/// One-line summary of what a variant overrides
pub fn summarize_variant(variant: &CommandConfig) -> String {
    let mut parts = Vec::new();

    if let Some(ref scheme) = variant.scheme {
        parts.push(format!("scheme: {}", scheme));
    }
    if let Some(ref configuration) = variant.configuration {
        parts.push(format!("configuration: {}", configuration));
    }
    if let Some(ref destination) = variant.destination {
        parts.push(format!("destination: {}", destination));
    }
    if let Some(ref args) = variant.extra_args {
        if !args.is_empty() {
            parts.push(format!("extra-args: {}", args.join(" ")));
        }
    }
    if variant.run.is_some() {
        parts.push("run".to_string());
    }

    parts.join(", ")
}

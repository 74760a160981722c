//! Pre/post hook execution

use std::path::Path;
use std::process::Command;
use tracing::info;

use xc_core::{XcError, XcResult};

/// Shell used for hooks and `run` scripts
pub const SHELL: &str = "/bin/sh";

/// Run a hook through the shell in `working_dir`
///
/// A non-zero exit becomes [`XcError::HookFailed`] carrying `label`.
pub fn run_hook(command: &str, label: &str, working_dir: &Path) -> XcResult<()> {
    eprintln!("→ Running {} hook...", label);
    info!(label, command, "running hook");

    let status = Command::new(SHELL)
        .arg("-c")
        .arg(command)
        .current_dir(working_dir)
        .status()?;

    if !status.success() {
        return Err(XcError::HookFailed {
            label: label.to_string(),
            code: status.code().unwrap_or(-1),
        });
    }

    Ok(())
}

/// Label for the hook that runs before `command`
pub fn pre_label(command: &str) -> String {
    format!("pre-{}", command)
}

/// Label for the hook that runs after `command`
pub fn post_label(command: &str) -> String {
    format!("post-{}", command)
}

//! Execution of resolved commands
//!
//! Build invocations run as `xcrun xcodebuild ...`, optionally piped
//! through a formatter. Scripts run through the shell unformatted.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

use xc_core::{Launch, ResolvedCommand, XcError, XcResult};

use crate::hooks::SHELL;

/// Launcher that locates the active xcodebuild
pub const XCRUN: &str = "xcrun";

/// Formatter used when none is configured
pub const DEFAULT_FORMATTER: &str = "xcbeautify";

/// Formatter value that disables formatting
pub const RAW_FORMATTER: &str = "raw";

/// Pick the formatter shell command, if any
///
/// - `raw` flag or a `raw` formatter: no formatter
/// - none or `xcbeautify`: xcbeautify when it is on PATH
/// - anything else: used as a shell command
pub fn resolve_formatter(formatter: Option<&str>, raw: bool) -> Option<String> {
    resolve_formatter_with(formatter, raw, |name| which::which(name).ok())
}

/// [`resolve_formatter`] with an injectable PATH lookup
pub fn resolve_formatter_with<F>(formatter: Option<&str>, raw: bool, find: F) -> Option<String>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if raw {
        return None;
    }

    match formatter.unwrap_or(DEFAULT_FORMATTER) {
        RAW_FORMATTER => None,
        DEFAULT_FORMATTER => {
            let found = find(DEFAULT_FORMATTER);
            if found.is_none() {
                debug!("xcbeautify not found on PATH; showing raw output");
            }
            found.map(|path| path.to_string_lossy().to_string())
        }
        other => Some(other.to_string()),
    }
}

/// Run the main command of a resolved command
pub fn exec(resolved: &ResolvedCommand, formatter: Option<&str>, working_dir: &Path) -> XcResult<()> {
    match &resolved.launch {
        Launch::Script(script) => exec_script(script, working_dir),
        Launch::Build(args) => exec_build(args, formatter, working_dir),
    }
}

/// Run a script through the shell
pub fn exec_script(script: &str, working_dir: &Path) -> XcResult<()> {
    info!(script, "running script");
    let status = Command::new(SHELL)
        .arg("-c")
        .arg(script)
        .current_dir(working_dir)
        .status()?;
    check(status)
}

/// Run xcodebuild via xcrun, piping output through `formatter` when given
pub fn exec_build(args: &[String], formatter: Option<&str>, working_dir: &Path) -> XcResult<()> {
    let mut command = Command::new(XCRUN);
    command.args(args).current_dir(working_dir);

    let Some(formatter) = formatter else {
        info!("running xcodebuild without formatter");
        let status = command.status()?;
        return check(status);
    };

    info!(formatter, "running xcodebuild with formatter");

    let mut build = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut fmt = match Command::new(SHELL)
        .arg("-c")
        .arg(formatter)
        .current_dir(working_dir)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            let _ = build.kill();
            let _ = build.wait();
            return Err(e.into());
        }
    };

    let (Some(stdin), Some(stdout), Some(stderr)) =
        (fmt.stdin.take(), build.stdout.take(), build.stderr.take())
    else {
        let _ = build.kill();
        let _ = build.wait();
        let _ = fmt.kill();
        let _ = fmt.wait();
        return Err(io::Error::new(io::ErrorKind::BrokenPipe, "failed to connect formatter pipe").into());
    };

    let sink = Arc::new(Mutex::new(stdin));
    let forwarders = [
        forward_lines(stdout, Arc::clone(&sink)),
        forward_lines(stderr, Arc::clone(&sink)),
    ];

    let status = build.wait()?;
    for handle in forwarders {
        let _ = handle.join();
    }
    // Last handle on the formatter's stdin; dropping it sends EOF.
    drop(sink);
    fmt.wait()?;

    check(status)
}

/// Copy `reader` into `sink` line by line until EOF.
///
/// Keeps draining after the sink fails so the child never blocks on a full pipe.
fn forward_lines<R>(reader: R, sink: Arc<Mutex<ChildStdin>>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut sink_open = true;
        for line in BufReader::new(reader).split(b'\n') {
            let Ok(mut line) = line else { break };
            if !sink_open {
                continue;
            }
            line.push(b'\n');
            sink_open = match sink.lock() {
                Ok(mut out) => out.write_all(&line).is_ok(),
                Err(_) => false,
            };
        }
    })
}

fn check(status: ExitStatus) -> XcResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(XcError::BuildFailed(status.code().unwrap_or(-1)))
    }
}

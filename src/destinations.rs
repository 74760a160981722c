//! `xc destinations` output
//!
//! Lists named destinations from xc.yaml and the simulators reported by
//! `xcrun simctl list devices available -j`, grouped by runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::runner::XCRUN;

const RUNTIME_PREFIX: &str = "com.apple.CoreSimulator.SimRuntime.";

/// An available simulator and the destination string that targets it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimDevice {
    pub name: String,
    pub destination: String,
}

/// Simulators grouped by display runtime name (e.g. "iOS 18.5")
pub type SimulatorsByRuntime = BTreeMap<String, Vec<SimDevice>>;

#[derive(Debug, Deserialize)]
struct SimctlList {
    #[serde(default)]
    devices: BTreeMap<String, Vec<SimctlDevice>>,
}

#[derive(Debug, Deserialize)]
struct SimctlDevice {
    name: String,
    #[serde(rename = "isAvailable", default)]
    is_available: bool,
}

/// Everything `xc destinations` reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationReport {
    /// Aliases from xc.yaml
    pub named: BTreeMap<String, String>,

    pub simulators: SimulatorsByRuntime,
}

impl DestinationReport {
    /// Serialize to JSON string with pretty formatting
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_human(&self) -> String {
        let mut output = String::new();

        if !self.named.is_empty() {
            output.push_str("Named destinations (from xc.yaml):\n");
            let width = self.named.keys().map(|k| k.chars().count()).max().unwrap_or(0);
            for (name, value) in &self.named {
                output.push_str(&format!("  {:<width$}  →  {}\n", name, value, width = width));
            }
            output.push('\n');
        }

        if !self.simulators.is_empty() {
            output.push_str("Available simulators:\n");
            for (runtime, devices) in &self.simulators {
                output.push_str(&format!("  {}:\n", runtime));
                let width = devices.iter().map(|d| d.name.chars().count()).max().unwrap_or(0);
                for device in devices {
                    output.push_str(&format!(
                        "    {:<width$}  →  {}\n",
                        device.name,
                        device.destination,
                        width = width
                    ));
                }
            }
            output.push('\n');
        }

        output.push_str("Other platforms:\n");
        output.push_str("  macOS            →  platform=macOS\n");
        output.push_str("  macOS (Rosetta)  →  platform=macOS,arch=x86_64\n");
        output.push_str("  iOS device       →  platform=iOS,name=<device name>\n");
        output.push('\n');
        output.push_str("Use in xc.yaml:\n");
        output.push_str("  destinations:\n");
        output.push_str("    sim: \"platform=iOS Simulator,name=iPhone 16\"\n");
        output.push_str("    mac: \"platform=macOS\"\n");

        output
    }
}

/// Query available simulators. Any failure yields an empty map.
pub fn query_simulators() -> SimulatorsByRuntime {
    let output = match Command::new(XCRUN)
        .args(["simctl", "list", "devices", "available", "-j"])
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            debug!(status = ?output.status.code(), "simctl list failed");
            return SimulatorsByRuntime::new();
        }
        Err(e) => {
            debug!(error = %e, "could not run simctl");
            return SimulatorsByRuntime::new();
        }
    };

    let json = String::from_utf8_lossy(&output.stdout);
    parse_simctl_devices(&json).unwrap_or_else(|e| {
        debug!(error = %e, "could not parse simctl output");
        SimulatorsByRuntime::new()
    })
}

/// Parse `simctl list devices -j` output into available devices per runtime
pub fn parse_simctl_devices(json: &str) -> Result<SimulatorsByRuntime, serde_json::Error> {
    let list: SimctlList = serde_json::from_str(json)?;
    let mut result = SimulatorsByRuntime::new();

    for (runtime_id, devices) in list.devices {
        let runtime = format_runtime(&runtime_id);
        let platform = simulator_platform(&runtime);

        let mut available: Vec<SimDevice> = devices
            .into_iter()
            .filter(|d| d.is_available)
            .map(|d| SimDevice {
                destination: format!("platform={},name={}", platform, d.name),
                name: d.name,
            })
            .collect();

        if !available.is_empty() {
            available.sort_by(|a, b| a.name.cmp(&b.name));
            result.entry(runtime).or_default().extend(available);
        }
    }

    Ok(result)
}

/// Convert "com.apple.CoreSimulator.SimRuntime.iOS-18-5" to "iOS 18.5"
pub fn format_runtime(runtime_id: &str) -> String {
    let stripped = runtime_id.strip_prefix(RUNTIME_PREFIX).unwrap_or(runtime_id);
    let parts: Vec<&str> = stripped.split('-').collect();
    if parts.len() < 2 {
        return stripped.to_string();
    }

    let split = parts
        .iter()
        .position(|p| p.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(parts.len());

    let platform = parts[..split].join(" ");
    let version = parts[split..].join(".");

    if version.is_empty() {
        platform
    } else {
        format!("{} {}", platform, version)
    }
}

/// Destination platform for a runtime display name
pub fn simulator_platform(runtime: &str) -> String {
    for os in ["iOS", "tvOS", "watchOS", "visionOS"] {
        if runtime.contains(os) {
            return format!("{} Simulator", os);
        }
    }
    runtime.to_string()
}

//! Structural validation of a loaded project config

use crate::config::ProjectConfig;
use crate::error::{XcError, XcResult};

impl ProjectConfig {
    /// Validate the configuration
    ///
    /// Runs once after expansion, before any command is resolved.
    pub fn validate(&self) -> XcResult<()> {
        // Rule: Cannot have both workspace and project
        if self.project.is_some() && self.workspace.is_some() {
            return Err(XcError::InvalidConfig(
                "Both 'project' and 'workspace' are set. Use one or the other.".to_string(),
            ));
        }

        // Rule: Must have at least one command
        if self.commands.is_empty() {
            return Err(XcError::InvalidConfig(
                "No commands defined. Add a 'commands' section to xc.yaml.".to_string(),
            ));
        }

        Ok(())
    }
}

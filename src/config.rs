use std::path::Path;

use serde::Deserialize;

use crate::ToolboxError;

/// Toolbox configuration.
///
/// - `root_container`: name of the container singletons are parented under
/// - `trace_updates`: emit a `trace!` line for every update hook call
///
/// Every field is optional in TOML; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolboxConfig {
    pub root_container: String,
    pub trace_updates: bool,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            root_container: String::from("Toolbox"),
            trace_updates: false,
        }
    }
}

impl ToolboxConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ToolboxError> {
        toml::from_str(source).map_err(|err| ToolboxError::Config(err.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ToolboxError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| ToolboxError::Config(format!("{}: {err}", path.display())))?;
        Self::from_toml_str(&source)
    }
}

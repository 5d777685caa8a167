use thiserror::Error;

/// Errors reported by the toolbox.
///
/// Duplicate or missing registrations are not errors: they are reported as
/// `false` from the register/unregister calls. This type covers the faults
/// that get caught at a dispatch or creation boundary and logged.
#[derive(Debug, Error)]
pub enum ToolboxError {
    /// An update hook returned an error during a dispatch pass.
    #[error("update of {object} failed: {source}")]
    UpdateFailed {
        object: String,
        #[source]
        source: anyhow::Error,
    },

    /// A singleton could not be constructed by the locator.
    #[error("failed to create singleton {type_name}: {source}")]
    CreateFailed {
        type_name: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The object host could not find or create the root container.
    #[error("object host failure: {0}")]
    HostFailure(#[source] anyhow::Error),

    /// The singleton table holds an entry of a different concrete type.
    #[error("type mismatch in singleton table for type: {type_name}")]
    TypeMismatch { type_name: &'static str },

    /// The configuration could not be read or parsed.
    #[error("invalid toolbox configuration: {0}")]
    Config(String),
}

impl ToolboxError {
    /// Short machine-friendly name of the variant, used in trace events.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolboxError::UpdateFailed { .. } => "update_failed",
            ToolboxError::CreateFailed { .. } => "create_failed",
            ToolboxError::HostFailure(_) => "host_failure",
            ToolboxError::TypeMismatch { .. } => "type_mismatch",
            ToolboxError::Config(_) => "config",
        }
    }
}

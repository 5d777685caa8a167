use std::fmt;
use std::sync::{Arc, Mutex};

use crate::dispatch::Pass;

/// Events emitted by a [`Scope`](crate::Scope) and its [`Toolbox`](crate::Toolbox).
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// They mirror what is written to `tracing`, but in a form that tests and tools
/// can inspect without installing a subscriber.
///
/// # Examples
///
/// ```rust
/// use frame_toolbox::ToolboxEvent;
///
/// let event = ToolboxEvent::Lookup { type_name: "Audio", found: true };
/// assert_eq!(event.to_string(), "lookup { type_name: Audio, found: true }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolboxEvent {
    /// A registration was attempted.
    Register {
        /// Concrete type of the object
        type_name: &'static str,
        /// Whether the object was newly added
        accepted: bool,
    },

    /// An unregistration was attempted.
    Unregister {
        type_name: &'static str,
        accepted: bool,
    },

    /// The locator searched for a live singleton.
    Lookup { type_name: &'static str, found: bool },

    /// The locator tried to construct a singleton.
    Create {
        type_name: &'static str,
        created: bool,
    },

    /// The root container was created.
    RootCreated { name: String },

    /// An update hook failed and the rest of the pass was abandoned.
    DispatchFault { pass: Pass, object: String },

    /// The scope was cleared.
    Clear {},
}

impl fmt::Display for ToolboxEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolboxEvent::Register {
                type_name,
                accepted,
            } => write!(
                f,
                "register {{ type_name: {type_name}, accepted: {accepted} }}"
            ),
            ToolboxEvent::Unregister {
                type_name,
                accepted,
            } => write!(
                f,
                "unregister {{ type_name: {type_name}, accepted: {accepted} }}"
            ),
            ToolboxEvent::Lookup { type_name, found } => {
                write!(f, "lookup {{ type_name: {type_name}, found: {found} }}")
            }
            ToolboxEvent::Create { type_name, created } => {
                write!(f, "create {{ type_name: {type_name}, created: {created} }}")
            }
            ToolboxEvent::RootCreated { name } => write!(f, "root created {{ name: {name} }}"),
            ToolboxEvent::DispatchFault { pass, object } => {
                write!(f, "dispatch fault {{ pass: {pass}, object: {object} }}")
            }
            ToolboxEvent::Clear {} => write!(f, "Clearing the Scope"),
        }
    }
}

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`ToolboxEvent`]. It must be thread-safe because a
/// scope may live in a process-wide static (see [`define_toolbox!`](crate::define_toolbox)).
pub type TraceCallback = dyn Fn(&ToolboxEvent) + Send + Sync + 'static;

/// Holds an optional tracing callback.
#[derive(Default)]
pub(crate) struct Tracer {
    callback: Mutex<Option<Arc<TraceCallback>>>,
}

impl Tracer {
    pub(crate) fn set(&self, callback: impl Fn(&ToolboxEvent) + Send + Sync + 'static) {
        let mut guard = self.callback.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    pub(crate) fn clear(&self) {
        let mut guard = self.callback.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Invokes the callback, if any.
    ///
    /// The lock is released before the callback runs, so a callback may call back
    /// into the scope that emitted the event.
    pub(crate) fn emit(&self, event: &ToolboxEvent) {
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }
}

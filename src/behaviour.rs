//! The contract shared by every object that takes part in frame dispatch.
//!
//! [`Behaviour`] is the single trait behind both lifecycles:
//!
//! - **plain objects** ([`PlainObject`]) are registered as soon as they are built,
//!   through [`Scope::spawn`], and must provide their own teardown;
//! - **engine-bound objects** ([`EngineBound`]) are registered when the host calls
//!   [`EngineBound::awake`], after the engine has finished wiring them up.
//!
//! The only required method is [`Behaviour::core`], an accessor to the object's
//! [`ObjectCore`]. Everything else has a default.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::Scope;

/// Unique identifier of a registered object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Creates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 8 hex characters, used in log lines.
    pub fn short(self) -> String {
        let s = self.0.simple().to_string();
        s.chars().take(8).collect()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an object is recorded when it registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationKind {
    /// Generic instance registry only.
    Instance,
    /// Instance registry plus the per-type singleton table.
    Singleton,
    /// Never registered; registration calls return `false`.
    Detached,
}

/// Which lifecycle triggers registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    /// Registered on construction, torn down by [`PlainObject::dispose`].
    Plain,
    /// Registered from the host's initialization callback.
    EngineBound,
}

/// Bookkeeping every [`Behaviour`] carries.
#[derive(Debug, Clone)]
pub struct ObjectCore {
    id: ObjectId,
    type_name: &'static str,
    kind: RegistrationKind,
    binding: Binding,
    created_at: SystemTime,
}

impl ObjectCore {
    /// Core for a plain object of type `T`, recorded in the instance registry.
    pub fn plain<T: ?Sized>() -> Self {
        Self::build::<T>(RegistrationKind::Instance, Binding::Plain)
    }

    /// Core for an engine-bound object of type `T`.
    ///
    /// Construction only logs a timestamped creation event. Registration waits for
    /// the host to call [`EngineBound::awake`].
    pub fn engine_bound<T: ?Sized>(kind: RegistrationKind) -> Self {
        let core = Self::build::<T>(kind, Binding::EngineBound);
        let created_ms = core
            .created_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        debug!(
            target: "frame_toolbox",
            id = %core.id,
            created_ms,
            "{} created",
            core.type_name
        );
        core
    }

    fn build<T: ?Sized>(kind: RegistrationKind, binding: Binding) -> Self {
        Self {
            id: ObjectId::new(),
            type_name: std::any::type_name::<T>(),
            kind,
            binding,
            created_at: SystemTime::now(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Full type name, as given by `std::any::type_name`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn kind(&self) -> RegistrationKind {
        self.kind
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Type name without its module path (and without generic arguments).
    pub fn short_type_name(&self) -> &'static str {
        let base = self.type_name.split('<').next().unwrap_or(self.type_name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

/// `Spawner#1a2b3c4d`
impl fmt::Display for ObjectCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.short_type_name(), self.id.short())
    }
}

/// Per-frame update, logging and registration hooks.
///
/// Hooks take `&self`: dispatch reaches objects through shared handles, so
/// state that changes per tick lives behind interior mutability.
pub trait Behaviour: Any + Send + Sync {
    /// Access the object's bookkeeping.
    fn core(&self) -> &ObjectCore;

    /// Called once per dispatch pass. Default does nothing.
    ///
    /// An `Err` aborts the remainder of the pass for this frame; it is logged by the
    /// dispatcher and the object stays registered.
    fn game_update(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Name used in log lines.
    fn identity(&self) -> String {
        self.core().to_string()
    }

    /// Emits `"{identity} logs: {message}"` at info level.
    fn log(&self, message: &str) {
        info!(target: "frame_toolbox", "{} logs: {}", self.identity(), message);
    }

    /// Emits `"{identity} error: {message}"` at error level.
    fn error(&self, message: &str) {
        error!(target: "frame_toolbox", "{} error: {}", self.identity(), message);
    }

    /// Adds this object to `scope`. Returns whether it was newly added.
    ///
    /// Override to layer extra bookkeeping; the default routes on
    /// [`ObjectCore::kind`] through [`Scope::register_instance`].
    fn register_instance(self: &Arc<Self>, scope: &Scope) -> bool
    where
        Self: Sized,
    {
        scope.register_instance(self)
    }

    /// Removes this object from `scope`. Returns whether removal occurred.
    fn unregister_instance(self: &Arc<Self>, scope: &Scope) -> bool
    where
        Self: Sized,
    {
        scope.unregister_instance(self)
    }
}

/// An object registered at construction and torn down explicitly.
///
/// Build one with [`Scope::spawn`]. Nothing unregisters the object on drop or on
/// dispose unless `dispose` calls [`Behaviour::unregister_instance`] itself.
pub trait PlainObject: Behaviour + Sized {
    /// Teardown logic.
    fn dispose(self: &Arc<Self>, scope: &Scope);
}

/// An object whose registration is driven by host callbacks.
pub trait EngineBound: Behaviour + Sized {
    /// Host initialization callback, called once after construction.
    fn awake(self: &Arc<Self>, scope: &Scope) {
        if !self.register_instance(scope) {
            debug!(
                target: "frame_toolbox",
                "{} was not registered on awake",
                self.identity()
            );
        }
    }

    /// Host destruction callback. Default does nothing.
    fn on_destroy(self: &Arc<Self>, _scope: &Scope) {}
}

//! # Frame Toolbox
//!
//! Object bookkeeping for engine-hosted games: an ordered registry of live
//! objects, a per-type singleton table, and a locator that finds or creates
//! singletons and drives a two-pass per-frame dispatch.
//!
//! ## Quick Start
//!
//! ```rust
//! use frame_toolbox::{Behaviour, EngineBound, ObjectCore, Scope, Singleton, Toolbox};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//!
//! struct Waves {
//!     core: ObjectCore,
//!     wave: AtomicU32,
//! }
//!
//! impl Behaviour for Waves {
//!     fn core(&self) -> &ObjectCore {
//!         &self.core
//!     }
//!
//!     fn game_update(&self) -> anyhow::Result<()> {
//!         self.wave.fetch_add(1, Ordering::Relaxed);
//!         Ok(())
//!     }
//! }
//!
//! impl EngineBound for Waves {}
//!
//! impl Singleton for Waves {
//!     fn create(core: ObjectCore) -> anyhow::Result<Self> {
//!         Ok(Waves { core, wave: AtomicU32::new(0) })
//!     }
//! }
//!
//! let toolbox = Toolbox::new(Arc::new(Scope::new()));
//! let waves = toolbox.get::<Waves>().unwrap();
//!
//! // The host calls this once per tick.
//! toolbox.on_update();
//! assert!(waves.wave.load(Ordering::Relaxed) > 0);
//! ```
//!
//! ## Pieces
//!
//! - [`Behaviour`] - update, log and registration hooks every object shares
//! - [`PlainObject`] / [`EngineBound`] - the two lifecycles, differing in when
//!   registration happens
//! - [`InstanceRegistry`] - ordered, identity-keyed, weak handles
//! - [`SingletonTable`] / [`Singleton`] - at most one live instance per type
//! - [`Scope`] - both tables plus the trace callback
//! - [`Toolbox`] - `get::<T>()` and `on_update()`
//! - [`define_toolbox!`] - a process-wide toolbox in a module
//! - [`logger::init`] - `tracing` subscriber setup

mod behaviour;
mod config;
mod dispatch;
mod error;
mod event;
mod host;
mod instance_registry;
pub mod logger;
mod macros;
mod scope;
mod singleton;
mod toolbox;

pub use behaviour::{
    Behaviour, Binding, EngineBound, ObjectCore, ObjectId, PlainObject, RegistrationKind,
};
pub use config::ToolboxConfig;
pub use dispatch::{FrameReport, Pass, PassReport};
pub use error::ToolboxError;
pub use event::{ToolboxEvent, TraceCallback};
pub use host::{Container, ObjectHost, SceneHost};
pub use instance_registry::InstanceRegistry;
pub use scope::Scope;
pub use singleton::{Singleton, SingletonTable};
pub use toolbox::Toolbox;

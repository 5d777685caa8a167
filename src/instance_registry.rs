//! Ordered registry of live objects used for frame dispatch.
//!
//! The registry stores `Weak` back-references: it never keeps an object alive.
//! Identity is the allocation, so two equal-looking objects are distinct entries
//! while the same `Arc` can be present at most once.
//!
//! # Examples
//!
//! ```
//! use frame_toolbox::{Behaviour, InstanceRegistry, ObjectCore};
//! use std::sync::Arc;
//!
//! struct Marker {
//!     core: ObjectCore,
//! }
//!
//! impl Behaviour for Marker {
//!     fn core(&self) -> &ObjectCore {
//!         &self.core
//!     }
//! }
//!
//! let registry = InstanceRegistry::new();
//! let marker = Arc::new(Marker { core: ObjectCore::plain::<Marker>() });
//!
//! assert!(registry.register(&marker));
//! assert!(!registry.register(&marker));
//! assert_eq!(registry.len(), 1);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::trace;

use crate::Behaviour;

/// Ordered set of weak object handles.
///
/// Not meant to be mutated from several threads at once: the lock only keeps
/// each call consistent, it does not order concurrent register/dispatch calls.
#[derive(Default)]
pub struct InstanceRegistry {
    entries: Mutex<Vec<Weak<dyn Behaviour>>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Weak<dyn Behaviour>>> {
        // Entries are plain handles; a panic mid-push leaves nothing half-written.
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Adds `obj` if absent. Returns whether it was newly added.
    pub fn register<B: Behaviour>(&self, obj: &Arc<B>) -> bool {
        let handle: Weak<dyn Behaviour> = Arc::<B>::downgrade(obj);
        self.insert(handle)
    }

    /// Same as [`register`](Self::register) for an already type-erased handle.
    pub fn register_dyn(&self, obj: &Arc<dyn Behaviour>) -> bool {
        self.insert(Arc::downgrade(obj))
    }

    fn insert(&self, handle: Weak<dyn Behaviour>) -> bool {
        let mut entries = self.lock();
        if entries.iter().any(|e| e.ptr_eq(&handle)) {
            return false;
        }
        entries.push(handle);
        trace!(target: "frame_toolbox", len = entries.len(), "instance registered");
        true
    }

    /// Removes `obj` if present. Returns whether removal occurred.
    pub fn unregister<B: Behaviour>(&self, obj: &Arc<B>) -> bool {
        let handle: Weak<dyn Behaviour> = Arc::<B>::downgrade(obj);
        self.remove(&handle)
    }

    /// Same as [`unregister`](Self::unregister) for an already type-erased handle.
    pub fn unregister_dyn(&self, obj: &Arc<dyn Behaviour>) -> bool {
        self.remove(&Arc::downgrade(obj))
    }

    fn remove(&self, handle: &Weak<dyn Behaviour>) -> bool {
        let mut entries = self.lock();
        match entries.iter().position(|e| e.ptr_eq(handle)) {
            Some(index) => {
                entries.remove(index);
                trace!(target: "frame_toolbox", len = entries.len(), "instance unregistered");
                true
            }
            None => false,
        }
    }

    /// Whether `obj` is currently an entry.
    pub fn contains<B: Behaviour>(&self, obj: &Arc<B>) -> bool {
        let handle: Weak<dyn Behaviour> = Arc::<B>::downgrade(obj);
        self.lock().iter().any(|e| e.ptr_eq(&handle))
    }

    /// Number of entries, including ones whose object has been dropped.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Entries in registry order, as taken at the time of the call.
    pub(crate) fn handles(&self) -> Vec<Weak<dyn Behaviour>> {
        self.lock().clone()
    }

    /// Live objects in registry order. Dropped objects are left out.
    pub fn snapshot(&self) -> Vec<Arc<dyn Behaviour>> {
        self.lock().iter().filter_map(Weak::upgrade).collect()
    }

    /// Removes entries whose object has been dropped. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| e.strong_count() > 0);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

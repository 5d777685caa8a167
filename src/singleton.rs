//! Per-type singleton table.
//!
//! Maps a concrete type (`TypeId`) to at most one live instance. Entries are kept
//! in insertion order, which is the order of the singleton dispatch pass.

use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::{Behaviour, EngineBound, ObjectCore, ToolboxError};

/// A type the [`Toolbox`](crate::Toolbox) can find or create on demand.
///
/// Build the instance around the `core` you are given: it is tagged
/// [`RegistrationKind::Singleton`](crate::RegistrationKind::Singleton), so the
/// registration triggered by [`EngineBound::awake`] also records it in the
/// per-type table.
pub trait Singleton: EngineBound {
    fn create(core: ObjectCore) -> anyhow::Result<Self>;
}

struct Entry {
    type_id: TypeId,
    type_name: &'static str,
    handle: Weak<dyn Behaviour>,
    any: Weak<dyn Any + Send + Sync>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.handle.strong_count() > 0
    }
}

/// The type-keyed half of a [`Scope`](crate::Scope).
#[derive(Default)]
pub struct SingletonTable {
    entries: Mutex<Vec<Entry>>,
}

impl SingletonTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Whether a live instance of the given type is recorded.
    pub fn contains_type(&self, type_id: TypeId) -> bool {
        self.lock()
            .iter()
            .any(|e| e.type_id == type_id && e.is_live())
    }

    pub fn contains<T: Behaviour>(&self) -> bool {
        self.contains_type(TypeId::of::<T>())
    }

    /// Records `obj` for its type. Fails if a live instance of that type exists.
    ///
    /// A recorded instance that has since been dropped is replaced.
    pub(crate) fn insert<B: Behaviour>(&self, obj: &Arc<B>) -> bool {
        let type_id = TypeId::of::<B>();
        let mut entries = self.lock();
        if entries.iter().any(|e| e.type_id == type_id && e.is_live()) {
            return false;
        }
        entries.retain(|e| e.type_id != type_id);

        let handle: Weak<dyn Behaviour> = Arc::<B>::downgrade(obj);
        let any: Weak<dyn Any + Send + Sync> = Arc::<B>::downgrade(obj);
        entries.push(Entry {
            type_id,
            type_name: std::any::type_name::<B>(),
            handle,
            any,
        });
        true
    }

    /// Removes the entry for `obj`'s type.
    ///
    /// The type check comes first: no entry for the type fails before anything
    /// else is looked at. An entry recorded for a different instance of the same
    /// type is left alone and the call fails.
    pub(crate) fn remove<B: Behaviour>(&self, obj: &Arc<B>) -> bool {
        let type_id = TypeId::of::<B>();
        let mut entries = self.lock();
        let Some(index) = entries.iter().position(|e| e.type_id == type_id) else {
            return false;
        };

        let handle: Weak<dyn Behaviour> = Arc::<B>::downgrade(obj);
        if !entries[index].handle.ptr_eq(&handle) {
            return false;
        }
        entries.remove(index);
        true
    }

    /// Linear scan for the live instance of `T`.
    pub fn get<T: Behaviour>(&self) -> Result<Option<Arc<T>>, ToolboxError> {
        let type_id = TypeId::of::<T>();
        let any = self
            .lock()
            .iter()
            .find(|e| e.type_id == type_id)
            .and_then(|e| e.any.upgrade());

        match any {
            Some(any) => any
                .downcast::<T>()
                .map(Some)
                .map_err(|_| ToolboxError::TypeMismatch {
                    type_name: std::any::type_name::<T>(),
                }),
            None => Ok(None),
        }
    }

    /// Number of recorded types, including ones whose instance was dropped.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Type names in table order.
    pub fn type_names(&self) -> Vec<&'static str> {
        self.lock().iter().map(|e| e.type_name).collect()
    }

    pub(crate) fn handles(&self) -> Vec<Weak<dyn Behaviour>> {
        self.lock().iter().map(|e| e.handle.clone()).collect()
    }

    /// Live singletons in table order.
    pub fn snapshot(&self) -> Vec<Arc<dyn Behaviour>> {
        self.lock().iter().filter_map(|e| e.handle.upgrade()).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

//! The object/parenting facility the locator relies on.
//!
//! A [`Container`] is a named parent that owns its children. The locator parents
//! every singleton it creates under one root container, which is what keeps
//! those singletons alive: the registries only hold weak handles.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard};

/// Finds and creates named containers.
///
/// Implement this on top of an engine's scene graph; [`SceneHost`] is a plain
/// in-memory version.
pub trait ObjectHost: Send + Sync {
    fn find_container(&self, name: &str) -> Option<Arc<Container>>;

    fn create_container(&self, name: &str) -> anyhow::Result<Arc<Container>>;
}

type Child = Arc<dyn Any + Send + Sync>;

/// Named parent object owning a list of children.
pub struct Container {
    name: String,
    children: Mutex<Vec<Child>>,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Child>> {
        self.children.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attach<T: Any + Send + Sync>(&self, child: Arc<T>) {
        self.lock().push(child);
    }

    /// Releases `child`. Returns whether it was attached here.
    pub fn detach<T: Any + Send + Sync>(&self, child: &Arc<T>) -> bool {
        let mut children = self.lock();
        match children
            .iter()
            .position(|c| std::ptr::addr_eq(Arc::as_ptr(c), Arc::as_ptr(child)))
        {
            Some(index) => {
                children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Attached children of type `T`, in attach order.
    pub fn children_of<T: Any + Send + Sync>(&self) -> Vec<Arc<T>> {
        self.lock()
            .iter()
            .filter_map(|c| c.clone().downcast::<T>().ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// In-memory [`ObjectHost`]: containers live as long as the host.
#[derive(Default)]
pub struct SceneHost {
    containers: Mutex<Vec<Arc<Container>>>,
}

impl SceneHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn containers(&self) -> Vec<Arc<Container>> {
        self.containers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl ObjectHost for SceneHost {
    fn find_container(&self, name: &str) -> Option<Arc<Container>> {
        self.containers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    fn create_container(&self, name: &str) -> anyhow::Result<Arc<Container>> {
        let container = Arc::new(Container::new(name));
        self.containers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(container.clone());
        Ok(container)
    }
}

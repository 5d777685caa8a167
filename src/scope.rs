//! Process-scoped registration state.
//!
//! A [`Scope`] bundles the generic [`InstanceRegistry`], the per-type
//! [`SingletonTable`] and the trace callback. Tests build one per case; a game
//! usually keeps a single one behind [`define_toolbox!`](crate::define_toolbox).

use std::sync::Arc;

use tracing::debug;

use crate::event::Tracer;
use crate::{
    Behaviour, InstanceRegistry, PlainObject, RegistrationKind, SingletonTable, ToolboxEvent,
};

#[derive(Default)]
pub struct Scope {
    instances: InstanceRegistry,
    singletons: SingletonTable,
    tracer: Tracer,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }

    pub fn singletons(&self) -> &SingletonTable {
        &self.singletons
    }

    /// Builds a plain object and registers it right away.
    pub fn spawn<B: PlainObject>(&self, value: B) -> Arc<B> {
        let object = Arc::new(value);
        object.register_instance(self);
        object
    }

    /// Registers `obj` according to its [`RegistrationKind`].
    ///
    /// For singletons the per-type table is checked first, so a rejected
    /// duplicate never reaches the instance registry. The table entry is only
    /// written once the instance registry accepted the object.
    pub fn register_instance<B: Behaviour>(&self, obj: &Arc<B>) -> bool {
        let accepted = match obj.core().kind() {
            RegistrationKind::Detached => false,
            RegistrationKind::Instance => self.instances.register(obj),
            RegistrationKind::Singleton => {
                if self.singletons.contains::<B>() {
                    debug!(
                        target: "frame_toolbox",
                        "{} rejected: type already has a live singleton",
                        obj.identity()
                    );
                    false
                } else {
                    self.instances.register(obj) && self.singletons.insert(obj)
                }
            }
        };

        self.emit(&ToolboxEvent::Register {
            type_name: obj.core().type_name(),
            accepted,
        });
        accepted
    }

    /// Unregisters `obj` according to its [`RegistrationKind`].
    ///
    /// For singletons the per-type table is checked before the instance registry.
    pub fn unregister_instance<B: Behaviour>(&self, obj: &Arc<B>) -> bool {
        let accepted = match obj.core().kind() {
            RegistrationKind::Detached => false,
            RegistrationKind::Instance => self.instances.unregister(obj),
            RegistrationKind::Singleton => {
                self.singletons.remove(obj) && self.instances.unregister(obj)
            }
        };

        self.emit(&ToolboxEvent::Unregister {
            type_name: obj.core().type_name(),
            accepted,
        });
        accepted
    }

    /// Set a tracing callback for scope and toolbox operations.
    ///
    /// The callback runs without any scope lock held.
    pub fn set_trace_callback(&self, callback: impl Fn(&ToolboxEvent) + Send + Sync + 'static) {
        self.tracer.set(callback);
    }

    pub fn clear_trace_callback(&self) {
        self.tracer.clear();
    }

    pub(crate) fn emit(&self, event: &ToolboxEvent) {
        self.tracer.emit(event);
    }

    /// Drops every entry from both tables.
    ///
    /// Objects themselves are untouched; only the handles go. The trace
    /// callback is kept.
    #[doc(hidden)]
    pub fn clear(&self) {
        self.emit(&ToolboxEvent::Clear {});
        self.instances.clear();
        self.singletons.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{EngineBound, ObjectCore};

    struct Prop {
        core: ObjectCore,
    }

    impl Behaviour for Prop {
        fn core(&self) -> &ObjectCore {
            &self.core
        }
    }

    impl PlainObject for Prop {
        fn dispose(self: &Arc<Self>, scope: &Scope) {
            self.unregister_instance(scope);
        }
    }

    struct Music {
        core: ObjectCore,
    }

    impl Behaviour for Music {
        fn core(&self) -> &ObjectCore {
            &self.core
        }
    }

    impl EngineBound for Music {}

    fn music() -> Arc<Music> {
        Arc::new(Music {
            core: ObjectCore::engine_bound::<Music>(RegistrationKind::Singleton),
        })
    }

    #[test]
    fn test_spawn_registers_immediately() {
        let scope = Scope::new();
        let prop = scope.spawn(Prop {
            core: ObjectCore::plain::<Prop>(),
        });

        assert!(scope.instances().contains(&prop));
        assert!(!prop.register_instance(&scope));

        prop.dispose(&scope);
        assert!(scope.instances().is_empty());
    }

    #[test]
    fn test_engine_bound_waits_for_awake() {
        let scope = Scope::new();
        let m = music();
        assert!(scope.instances().is_empty());

        m.awake(&scope);
        assert!(scope.instances().contains(&m));
        assert!(scope.singletons().contains::<Music>());
    }

    #[test]
    fn test_second_singleton_is_rejected_without_mutation() {
        let scope = Scope::new();
        let (first, second) = (music(), music());

        assert!(first.register_instance(&scope));
        assert!(!second.register_instance(&scope));

        assert_eq!(scope.instances().len(), 1);
        assert!(!scope.instances().contains(&second));
        let recorded = scope.singletons().get::<Music>().unwrap().unwrap();
        assert!(Arc::ptr_eq(&recorded, &first));
    }

    #[test]
    fn test_singleton_unregister() {
        let scope = Scope::new();
        let (first, second) = (music(), music());

        assert!(!first.unregister_instance(&scope));

        first.register_instance(&scope);
        assert!(!second.unregister_instance(&scope));
        assert_eq!(scope.singletons().len(), 1);

        assert!(first.unregister_instance(&scope));
        assert!(scope.instances().is_empty());
        assert!(scope.singletons().is_empty());

        assert!(second.register_instance(&scope));
    }

    #[test]
    fn test_detached_never_registers() {
        let scope = Scope::new();
        let ghost = Arc::new(Music {
            core: ObjectCore::engine_bound::<Music>(RegistrationKind::Detached),
        });

        assert!(!ghost.register_instance(&scope));
        assert!(!ghost.unregister_instance(&scope));
        assert!(scope.instances().is_empty());
    }

    #[test]
    fn test_events_and_clear() {
        let scope = Scope::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        scope.set_trace_callback(move |e| events_clone.lock().unwrap().push(e.to_string()));

        let m = music();
        m.register_instance(&scope);
        m.register_instance(&scope);
        scope.clear();

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert!(captured[0].contains("accepted: true"));
        assert!(captured[1].contains("accepted: false"));
        assert_eq!(captured[2], "Clearing the Scope");
        assert!(scope.instances().is_empty());
        assert!(scope.singletons().is_empty());
    }
}

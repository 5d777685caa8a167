//! Integration tests for registration semantics.
//!
//! Covers the instance registry's duplicate/missing rules and the per-type
//! singleton table layered on top of it.

use frame_toolbox::{Behaviour, EngineBound, ObjectCore, PlainObject, RegistrationKind, Scope};
use std::sync::Arc;

struct Crate {
    core: ObjectCore,
}

impl Behaviour for Crate {
    fn core(&self) -> &ObjectCore {
        &self.core
    }
}

impl PlainObject for Crate {
    fn dispose(self: &Arc<Self>, scope: &Scope) {
        self.unregister_instance(scope);
    }
}

fn new_crate() -> Crate {
    Crate {
        core: ObjectCore::plain::<Crate>(),
    }
}

struct Announcer {
    core: ObjectCore,
}

impl Behaviour for Announcer {
    fn core(&self) -> &ObjectCore {
        &self.core
    }
}

impl EngineBound for Announcer {}

fn announcer() -> Arc<Announcer> {
    Arc::new(Announcer {
        core: ObjectCore::engine_bound::<Announcer>(RegistrationKind::Singleton),
    })
}

#[test]
fn test_register_same_object_twice() {
    let scope = Scope::new();
    let obj = Arc::new(new_crate());

    assert!(scope.instances().register(&obj));
    assert_eq!(scope.instances().len(), 1);

    assert!(!scope.instances().register(&obj));
    assert_eq!(scope.instances().len(), 1);
}

#[test]
fn test_unregister_absent_then_present() {
    let scope = Scope::new();
    let present = scope.spawn(new_crate());
    let absent = Arc::new(new_crate());

    assert!(!scope.instances().unregister(&absent));
    assert_eq!(scope.instances().len(), 1);

    assert!(scope.instances().unregister(&present));
    assert_eq!(scope.instances().len(), 0);
}

#[test]
fn test_register_unregister_register_round_trip() {
    let scope = Scope::new();
    let obj = scope.spawn(new_crate());

    assert!(obj.unregister_instance(&scope));
    assert!(obj.register_instance(&scope));

    assert_eq!(scope.instances().len(), 1);
    assert!(scope.instances().contains(&obj));
}

#[test]
fn test_spawn_registers_on_construction() {
    let scope = Scope::new();
    let a = scope.spawn(new_crate());
    let b = scope.spawn(new_crate());

    assert_ne!(a.core().id(), b.core().id());
    assert_eq!(scope.instances().len(), 2);

    a.dispose(&scope);
    assert_eq!(scope.instances().len(), 1);
    assert!(scope.instances().contains(&b));
}

#[test]
fn test_dropping_does_not_unregister() {
    let scope = Scope::new();
    let obj = scope.spawn(new_crate());
    drop(obj);

    assert_eq!(scope.instances().len(), 1);
    assert!(scope.instances().snapshot().is_empty());
    assert_eq!(scope.instances().prune(), 1);
}

#[test]
fn test_second_singleton_of_same_type_is_rejected() {
    let scope = Scope::new();
    let first = announcer();
    let second = announcer();

    first.awake(&scope);
    assert!(!second.register_instance(&scope));

    let recorded = scope.singletons().get::<Announcer>().unwrap().unwrap();
    assert!(Arc::ptr_eq(&recorded, &first));
    assert_eq!(scope.singletons().len(), 1);
    assert_eq!(scope.instances().len(), 1);
}

#[test]
fn test_singleton_unregister_requires_entry() {
    let scope = Scope::new();
    let first = announcer();

    assert!(!first.unregister_instance(&scope));

    first.awake(&scope);
    assert!(first.unregister_instance(&scope));
    assert!(!scope.singletons().contains::<Announcer>());
    assert!(scope.instances().is_empty());

    // the type slot is free again
    let second = announcer();
    assert!(second.register_instance(&scope));
}

#[test]
fn test_scopes_are_isolated() {
    let left = Scope::new();
    let right = Scope::new();
    let a = announcer();

    a.awake(&left);
    assert!(left.singletons().contains::<Announcer>());
    assert!(!right.singletons().contains::<Announcer>());

    // the same object may live in two scopes
    assert!(a.register_instance(&right));
}

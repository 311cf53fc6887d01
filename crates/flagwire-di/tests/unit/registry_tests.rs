//! Tests for the slot registry and resolution scopes

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use flagwire_di::ServiceRegistry;

#[test]
fn singleton_is_constructed_at_most_once_across_scopes() {
    let registry = Arc::new(ServiceRegistry::new());
    let constructions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&constructions);

    registry.register_singleton_if_absent::<String, _>(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok("shared".to_string())
    });

    // Registration alone constructs nothing
    assert_eq!(constructions.load(Ordering::SeqCst), 0);

    let first = registry.create_scope().resolve::<String>().unwrap();
    let second = registry.create_scope().resolve::<String>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[test]
fn scoped_slot_builds_once_per_scope() {
    let registry = Arc::new(ServiceRegistry::new());
    let constructions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&constructions);

    registry.register_scoped_if_absent::<u32, _>(move |_| {
        Ok(counter.fetch_add(1, Ordering::SeqCst) as u32)
    });

    let scope = registry.create_scope();
    let a = scope.resolve::<u32>().unwrap();
    let b = scope.resolve::<u32>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(constructions.load(Ordering::SeqCst), 1);

    let other = registry.create_scope().resolve::<u32>().unwrap();
    assert!(!Arc::ptr_eq(&a, &other));
    assert_eq!(constructions.load(Ordering::SeqCst), 2);
}

#[test]
fn add_if_absent_is_first_writer_wins_for_keyed_slots() {
    let registry = Arc::new(ServiceRegistry::new());

    assert!(registry.register_keyed_singleton_if_absent::<String, _>("slot", |_| {
        Ok("first".to_string())
    }));
    assert!(!registry.register_keyed_singleton_if_absent::<String, _>("slot", |_| {
        Ok("second".to_string())
    }));

    let scope = registry.create_scope();
    assert_eq!(*scope.resolve_keyed::<String>("slot").unwrap(), "first");
}

#[test]
fn register_singleton_replaces_an_existing_slot() {
    let registry = Arc::new(ServiceRegistry::new());
    registry.register_singleton::<String, _>(|_| Ok("old".to_string()));
    registry.register_singleton::<String, _>(|_| Ok("new".to_string()));

    let scope = registry.create_scope();
    assert_eq!(*scope.resolve::<String>().unwrap(), "new");
}

#[test]
fn recipes_may_resolve_their_own_dependencies() {
    let registry = Arc::new(ServiceRegistry::new());
    registry.register_singleton_if_absent::<u64, _>(|_| Ok(21u64));
    registry.register_singleton_if_absent::<String, _>(|scope| {
        let seed = scope.resolve::<u64>()?;
        Ok(format!("seed-{seed}"))
    });

    let scope = registry.create_scope();
    assert_eq!(*scope.resolve::<String>().unwrap(), "seed-21");
}

#[test]
fn try_resolve_distinguishes_absent_from_failed() {
    let registry = Arc::new(ServiceRegistry::new());
    let scope = registry.create_scope();
    assert!(scope.try_resolve::<String>().unwrap().is_none());

    registry.register_singleton_if_absent::<String, _>(|_| {
        Err(flagwire_domain::Error::configuration("recipe exploded"))
    });
    let err = scope.try_resolve::<String>().unwrap_err();
    assert!(err.to_string().contains("recipe exploded"));
}

#[test]
fn registration_state_is_queryable() {
    let registry = Arc::new(ServiceRegistry::new());
    assert!(!registry.is_registered::<String>(None));

    registry.register_keyed_scoped_if_absent::<String, _>("named", |_| Ok(String::new()));
    assert!(registry.is_registered::<String>(Some("named")));
    assert!(!registry.is_registered::<String>(None));
}

//! Service registry with named slots
//!
//! The registry is an idempotent-insert map from `(type, optional name)` slots
//! to construction recipes. Registration is pure bookkeeping: nothing is
//! constructed until a slot is first resolved through a [`ServiceScope`].
//!
//! ## Slot protocol
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Registration / Resolution Flow              │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  register_*_if_absent::<T>(name, recipe)                     │
//! │        │  first writer wins per (TypeId, name) slot          │
//! │        ▼                                                     │
//! │  DashMap<ServiceKey, Registration>                           │
//! │        │                                                     │
//! │  scope.resolve::<T>()                                        │
//! │        │  Singleton → OnceCell on the registration,          │
//! │        │             built at most once per registry         │
//! │        │  Scoped    → OnceCell in the scope cache,           │
//! │        │             built at most once per scope            │
//! │        ▼                                                     │
//! │  Arc<T>                                                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recipes receive the resolving scope, so they may re-enter the registry to
//! pull their own dependencies. Recipes are invoked outside any map lock;
//! only a genuine dependency cycle on a single slot can block resolution.

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use once_cell::sync::OnceCell;
use tracing::debug;

use flagwire_domain::{Error, Result};

/// A type-erased constructed instance
type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// A deferred construction recipe for one slot
type Recipe = Arc<dyn Fn(&ServiceScope) -> Result<ServiceInstance> + Send + Sync>;

/// Identity of a registration slot: a type plus an optional name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ServiceKey {
    type_id: TypeId,
    name: Option<String>,
}

impl ServiceKey {
    fn of<T: 'static>(name: Option<&str>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: name.map(str::to_string),
        }
    }
}

/// Lifetime of a registered slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Built at most once for the registry's lifetime
    Singleton,
    /// Built at most once per [`ServiceScope`]
    Scoped,
}

struct Registration {
    lifetime: Lifetime,
    type_name: &'static str,
    recipe: Recipe,
    /// Memoized instance; only used for singleton registrations
    singleton: OnceCell<ServiceInstance>,
}

/// Idempotent-insert container for construction recipes
///
/// All `register_*_if_absent` operations are first-writer-wins per slot; the
/// map's entry API makes the check-and-set atomic, so concurrent registration
/// races resolve to whichever call reaches the map first.
pub struct ServiceRegistry {
    registrations: DashMap<ServiceKey, Arc<Registration>>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            registrations: DashMap::new(),
        }
    }

    /// Create a resolution scope backed by this registry
    pub fn create_scope(self: &Arc<Self>) -> ServiceScope {
        ServiceScope {
            registry: Arc::clone(self),
            scoped: DashMap::new(),
        }
    }

    /// Register a singleton recipe, replacing any existing slot
    pub fn register_singleton<T, F>(&self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceScope) -> Result<T> + Send + Sync + 'static,
    {
        let key = ServiceKey::of::<T>(None);
        self.registrations
            .insert(key, Self::registration::<T, F>(Lifetime::Singleton, factory));
    }

    /// Register a singleton recipe for the unnamed slot; no-op if taken
    pub fn register_singleton_if_absent<T, F>(&self, factory: F) -> bool
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceScope) -> Result<T> + Send + Sync + 'static,
    {
        self.insert_if_absent::<T, F>(None, Lifetime::Singleton, factory)
    }

    /// Register a singleton recipe under a name; no-op if taken
    pub fn register_keyed_singleton_if_absent<T, F>(&self, name: &str, factory: F) -> bool
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceScope) -> Result<T> + Send + Sync + 'static,
    {
        self.insert_if_absent::<T, F>(Some(name), Lifetime::Singleton, factory)
    }

    /// Register a scoped recipe for the unnamed slot; no-op if taken
    pub fn register_scoped_if_absent<T, F>(&self, factory: F) -> bool
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceScope) -> Result<T> + Send + Sync + 'static,
    {
        self.insert_if_absent::<T, F>(None, Lifetime::Scoped, factory)
    }

    /// Register a scoped recipe under a name; no-op if taken
    pub fn register_keyed_scoped_if_absent<T, F>(&self, name: &str, factory: F) -> bool
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceScope) -> Result<T> + Send + Sync + 'static,
    {
        self.insert_if_absent::<T, F>(Some(name), Lifetime::Scoped, factory)
    }

    /// True when a slot exists for the type/name pair
    pub fn is_registered<T: 'static>(&self, name: Option<&str>) -> bool {
        self.registrations.contains_key(&ServiceKey::of::<T>(name))
    }

    fn insert_if_absent<T, F>(&self, name: Option<&str>, lifetime: Lifetime, factory: F) -> bool
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceScope) -> Result<T> + Send + Sync + 'static,
    {
        match self.registrations.entry(ServiceKey::of::<T>(name)) {
            Entry::Occupied(_) => {
                debug!(service = type_name::<T>(), name = ?name, "slot already registered, keeping first");
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Self::registration::<T, F>(lifetime, factory));
                true
            }
        }
    }

    fn registration<T, F>(lifetime: Lifetime, factory: F) -> Arc<Registration>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceScope) -> Result<T> + Send + Sync + 'static,
    {
        Arc::new(Registration {
            lifetime,
            type_name: type_name::<T>(),
            recipe: Arc::new(move |scope| {
                factory(scope).map(|instance| Arc::new(instance) as ServiceInstance)
            }),
            singleton: OnceCell::new(),
        })
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A logical unit of resolution (e.g., one request)
///
/// Scoped recipes produce at most one instance per scope; singleton recipes
/// share the registry-wide instance no matter which scope resolves them.
pub struct ServiceScope {
    registry: Arc<ServiceRegistry>,
    scoped: DashMap<ServiceKey, Arc<OnceCell<ServiceInstance>>>,
}

impl ServiceScope {
    /// The registry backing this scope
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// Resolve the unnamed slot for `T`, failing if absent
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.try_resolve::<T>()?
            .ok_or_else(|| Error::not_found(Self::slot_description::<T>(None)))
    }

    /// Resolve the named slot for `T`, failing if absent
    pub fn resolve_keyed<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        self.try_resolve_keyed::<T>(name)?
            .ok_or_else(|| Error::not_found(Self::slot_description::<T>(Some(name))))
    }

    /// Resolve the unnamed slot for `T` if registered
    ///
    /// Returns `Ok(None)` when no slot exists; recipe failures still surface
    /// as errors.
    pub fn try_resolve<T: Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        self.lookup::<T>(None)
    }

    /// Resolve the named slot for `T` if registered
    pub fn try_resolve_keyed<T: Send + Sync + 'static>(&self, name: &str) -> Result<Option<Arc<T>>> {
        self.lookup::<T>(Some(name))
    }

    fn lookup<T: Send + Sync + 'static>(&self, name: Option<&str>) -> Result<Option<Arc<T>>> {
        let key = ServiceKey::of::<T>(name);
        let Some(registration) = self
            .registry
            .registrations
            .get(&key)
            .map(|entry| Arc::clone(entry.value()))
        else {
            return Ok(None);
        };

        let instance = match registration.lifetime {
            Lifetime::Singleton => registration
                .singleton
                .get_or_try_init(|| (registration.recipe)(self))?
                .clone(),
            Lifetime::Scoped => {
                let cell = Arc::clone(
                    self.scoped
                        .entry(key)
                        .or_insert_with(|| Arc::new(OnceCell::new()))
                        .value(),
                );
                cell.get_or_try_init(|| (registration.recipe)(self))?.clone()
            }
        };

        instance
            .downcast::<T>()
            .map(Some)
            .map_err(|_| {
                Error::configuration(format!(
                    "registered instance for slot {} has unexpected type",
                    registration.type_name
                ))
            })
    }

    fn slot_description<T>(name: Option<&str>) -> String {
        match name {
            Some(name) => format!("{} (name: \"{name}\")", type_name::<T>()),
            None => type_name::<T>().to_string(),
        }
    }
}

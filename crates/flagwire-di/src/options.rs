//! Two-phase validated options
//!
//! Options registration splits configuration into an explicit two-phase
//! process: registration stores the configure callback and a validator
//! predicate; first resolution builds the default value, applies the
//! callback, then runs the validator. A failing validator surfaces as a
//! configuration error naming the options type, at resolution time rather
//! than registration time, so misconfiguration is reported against the slot
//! that actually gets used.

use std::any::type_name;

use flagwire_domain::{Error, Result};

use crate::registry::ServiceRegistry;

impl ServiceRegistry {
    /// Register a validated options value for `T` under an optional name
    ///
    /// The options instance is a singleton: `T::default()` is built on first
    /// access, `configure` is applied, then `validate` runs. Add-if-absent
    /// like every other slot; a second registration for the same slot is a
    /// no-op.
    pub fn register_options<T, C, V>(&self, name: Option<&str>, configure: C, validate: V) -> bool
    where
        T: Default + Send + Sync + 'static,
        C: Fn(&mut T) + Send + Sync + 'static,
        V: Fn(&T) -> Result<()> + Send + Sync + 'static,
    {
        let recipe = move |_: &crate::registry::ServiceScope| {
            let mut options = T::default();
            configure(&mut options);
            validate(&options).map_err(|source| {
                Error::configuration_with_source(
                    format!("invalid options for {}", type_name::<T>()),
                    Box::new(source),
                )
            })?;
            Ok(options)
        };

        match name {
            Some(name) => self.register_keyed_singleton_if_absent::<T, _>(name, recipe),
            None => self.register_singleton_if_absent::<T, _>(recipe),
        }
    }
}

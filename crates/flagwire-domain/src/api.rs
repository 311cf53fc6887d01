//! Feature evaluation API
//!
//! [`FeatureApi`] owns the process-wide binding between provider names and
//! active providers. One instance lives as long as the application and is
//! passed by injection, never through ambient global lookup, so tests can run
//! isolated API instances side by side.
//!
//! Every slot starts bound to [`NoOpProvider`]; binding a real provider
//! initializes it first, then swaps it in, then shuts the replaced provider
//! down. [`FeatureApi::shutdown`] drains all bindings and tolerates being
//! called before any provider was ever set.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::client::FeatureClient;
use crate::context::EvaluationContext;
use crate::error::Result;
use crate::provider::{FeatureProvider, NoOpProvider};

/// Process-wide binding of names to active feature providers
pub struct FeatureApi {
    /// The default (unnamed) provider slot
    default_provider: RwLock<Arc<dyn FeatureProvider>>,
    /// Named provider bindings
    named_providers: DashMap<String, Arc<dyn FeatureProvider>>,
}

impl FeatureApi {
    /// Create an API with every slot bound to the no-op provider
    pub fn new() -> Self {
        Self {
            default_provider: RwLock::new(Arc::new(NoOpProvider)),
            named_providers: DashMap::new(),
        }
    }

    /// Bind a provider as the default, initializing it first
    ///
    /// The replaced provider is shut down after the swap. Initialization
    /// failures leave the previous binding in place.
    pub async fn set_provider(&self, provider: Arc<dyn FeatureProvider>) -> Result<()> {
        provider.initialize(&EvaluationContext::default()).await?;
        info!(provider = %provider.metadata().name, "default feature provider bound");

        let replaced = {
            let mut slot = self
                .default_provider
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            std::mem::replace(&mut *slot, provider)
        };
        replaced.shutdown().await
    }

    /// Bind a provider under a name, initializing it first
    pub async fn set_named_provider(
        &self,
        name: impl Into<String>,
        provider: Arc<dyn FeatureProvider>,
    ) -> Result<()> {
        let name = name.into();
        provider.initialize(&EvaluationContext::default()).await?;
        info!(provider = %provider.metadata().name, name = %name, "named feature provider bound");

        let replaced = self.named_providers.insert(name, provider);
        match replaced {
            Some(old) => old.shutdown().await,
            None => Ok(()),
        }
    }

    /// The provider currently bound for the given name
    ///
    /// Unknown or absent names fall back to the default slot.
    pub fn provider(&self, name: Option<&str>) -> Arc<dyn FeatureProvider> {
        if let Some(name) = name {
            if let Some(bound) = self.named_providers.get(name) {
                return Arc::clone(bound.value());
            }
        }
        Arc::clone(
            &self
                .default_provider
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }

    /// Create a fresh client handle routing through the given name
    pub fn client(self: &Arc<Self>, name: Option<&str>) -> FeatureClient {
        FeatureClient::new(Arc::clone(self), name.map(str::to_string))
    }

    /// Drain all bindings, shutting each distinct provider down once
    ///
    /// Safe to call before any provider was set and safe to call repeatedly;
    /// every slot is left bound to the no-op provider. Every drained provider
    /// is shut down even when an earlier one fails; the first failure is
    /// returned after the drain completes.
    pub async fn shutdown(&self) -> Result<()> {
        debug!("draining feature provider bindings");
        let mut draining: Vec<Arc<dyn FeatureProvider>> = Vec::new();

        let previous_default = {
            let mut slot = self
                .default_provider
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            std::mem::replace(&mut *slot, Arc::new(NoOpProvider))
        };
        draining.push(previous_default);

        let names: Vec<String> = self.named_providers.iter().map(|e| e.key().clone()).collect();
        for name in names {
            if let Some((_, provider)) = self.named_providers.remove(&name) {
                if !draining.iter().any(|p| Arc::ptr_eq(p, &provider)) {
                    draining.push(provider);
                }
            }
        }

        let mut first_error = None;
        for provider in draining {
            if let Err(err) = provider.shutdown().await {
                warn!(provider = %provider.metadata().name, error = %err, "provider shutdown failed during drain");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for FeatureApi {
    fn default() -> Self {
        Self::new()
    }
}

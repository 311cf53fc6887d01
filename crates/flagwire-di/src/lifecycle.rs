//! Feature lifecycle management
//!
//! Coordinates startup and shutdown of the feature API exactly once per
//! process lifetime, independent of how many named providers exist. Both
//! operations are programmer-driven configuration steps, not transient
//! conditions - failures are surfaced immediately and never retried.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use flagwire_domain::{Error, FeatureApi, Result};

use crate::provider::SharedProvider;
use crate::registry::ServiceRegistry;

/// Coordinates binding the default provider into the API and draining it
pub struct FeatureLifecycleManager {
    api: Arc<FeatureApi>,
    registry: Arc<ServiceRegistry>,
}

impl FeatureLifecycleManager {
    /// Create a manager over the given API and registry
    pub fn new(api: Arc<FeatureApi>, registry: Arc<ServiceRegistry>) -> Self {
        Self { api, registry }
    }

    /// Bind the registered default provider as the API's active provider
    ///
    /// Call once at application startup. A missing unnamed provider
    /// registration is a programmer error: it fails with a configuration
    /// error and leaves the API binding untouched. The token aborts the
    /// underlying bind call.
    pub async fn ensure_initialized(&self, cancel: CancellationToken) -> Result<()> {
        info!("starting initialization of the feature provider");

        let scope = self.registry.create_scope();
        let provider = scope.try_resolve::<SharedProvider>()?.ok_or_else(|| {
            Error::configuration("feature provider is not registered in the service registry")
        })?;

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = self.api.set_provider(provider.provider()) => result,
        }
    }

    /// Shut the feature API down, releasing provider resources
    ///
    /// Safe during application teardown even if initialization never
    /// completed; the API's shutdown tolerates "never started".
    pub async fn shutdown(&self, cancel: CancellationToken) -> Result<()> {
        info!("shutting down the feature provider");

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = self.api.shutdown() => result,
        }
    }
}

//! Composition root
//!
//! [`add_feature_flags`] is the single entry point a host calls once at
//! startup: it seeds the registry with the [`FeatureApi`] singleton and the
//! [`FeatureLifecycleManager`], runs the host's configuration callback
//! against a fresh [`FlagwireBuilder`], then registers the snapshot options
//! and the ambient-client recipe.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use flagwire_di::{add_feature_flags, ServiceRegistry};
//!
//! let registry = Arc::new(ServiceRegistry::new());
//! add_feature_flags(&registry, |flags| {
//!     flags.add_context(|ctx| ctx.set("environment", "production"));
//!     flags.add_named_provider::<EnvProviderBuilder, _>("env", |b| {
//!         b.prefix = "FLAGS_".into();
//!     })?;
//!     Ok(())
//! })?;
//!
//! let lifecycle = registry.create_scope().resolve::<FeatureLifecycleManager>()?;
//! lifecycle.ensure_initialized(CancellationToken::new()).await?;
//! ```

use std::sync::Arc;

use tracing::debug;

use flagwire_domain::{FeatureApi, Result};

use crate::builder::FlagwireBuilder;
use crate::lifecycle::FeatureLifecycleManager;
use crate::policy::{DefaultClient, resolve_default_client};
use crate::registry::ServiceRegistry;

/// Snapshot of the registration session, resolvable by downstream consumers
///
/// Lets hosts enumerate which provider names were registered and whether an
/// unnamed default exists, without re-walking the registry.
#[derive(Debug, Clone, Default)]
pub struct FlagwireOptions {
    /// True when an unnamed provider registration occurred
    pub has_default_provider: bool,
    /// Provider names recorded by named registrations, in call order
    pub provider_names: Vec<String>,
}

/// Wire feature-flag services into the registry
///
/// Idempotent at the slot level: every registration performed here is
/// add-if-absent, so composing multiple layers keeps the first
/// configuration for each slot.
pub fn add_feature_flags<F>(registry: &Arc<ServiceRegistry>, configure: F) -> Result<()>
where
    F: FnOnce(&mut FlagwireBuilder) -> Result<()>,
{
    registry.register_singleton_if_absent::<FeatureApi, _>(|_scope| Ok(FeatureApi::new()));
    registry.register_singleton_if_absent::<FeatureLifecycleManager, _>(|scope| {
        let api = scope.resolve::<FeatureApi>()?;
        Ok(FeatureLifecycleManager::new(api, Arc::clone(scope.registry())))
    });

    let mut builder = FlagwireBuilder::new(Arc::clone(registry));
    configure(&mut builder)?;
    debug!(
        named_providers = builder.named_provider_count(),
        has_default_provider = builder.has_default_provider(),
        policy_configured = builder.is_policy_configured(),
        "feature-flag registration session complete"
    );

    let options = FlagwireOptions {
        has_default_provider: builder.has_default_provider(),
        provider_names: builder.provider_names().to_vec(),
    };
    registry.register_singleton_if_absent::<FlagwireOptions, _>(move |_scope| Ok(options.clone()));
    registry.register_scoped_if_absent::<DefaultClient, _>(resolve_default_client);

    Ok(())
}

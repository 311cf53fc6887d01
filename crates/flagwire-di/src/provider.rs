//! Provider construction glue
//!
//! [`ProviderBuilder`] is the blueprint callers implement per backend: a
//! default-constructible options carrier whose `build()` produces the actual
//! [`FeatureProvider`]. The registry stores the finished provider behind
//! [`SharedProvider`], the concrete slot type for both the default and the
//! named provider registrations.

use std::sync::Arc;

use flagwire_domain::{FeatureProvider, Result};

/// Blueprint for constructing a configured [`FeatureProvider`]
///
/// Implementations start from `Default`, are mutated by the caller's
/// configure callback, validated, and finally built - exactly once per
/// registered name.
pub trait ProviderBuilder: Default + Send + Sync + 'static {
    /// Construct the provider from this builder's configuration
    fn build(&self) -> Result<Arc<dyn FeatureProvider>>;

    /// Validation hook run at options-resolution time, before `build`
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Registered handle around a constructed provider singleton
#[derive(Clone)]
pub struct SharedProvider(pub Arc<dyn FeatureProvider>);

impl SharedProvider {
    /// The underlying provider instance
    pub fn provider(&self) -> Arc<dyn FeatureProvider> {
        Arc::clone(&self.0)
    }
}

impl std::fmt::Debug for SharedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedProvider")
            .field(&self.0.metadata().name)
            .finish()
    }
}

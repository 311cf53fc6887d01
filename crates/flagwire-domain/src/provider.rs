//! Feature provider port
//!
//! A [`FeatureProvider`] is a flag-evaluation backend. Flagwire wires
//! providers to names and hands out client handles; the providers themselves
//! own all evaluation behavior. The port deliberately exposes a minimal
//! resolution surface - backends with richer type support layer it on top.

use async_trait::async_trait;

use crate::context::EvaluationContext;
use crate::error::Result;

/// Metadata describing a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Provider name (e.g., "no-op", "env", "launchdarkly")
    pub name: String,
}

impl ProviderMetadata {
    /// Create metadata with the given provider name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Outcome of a single flag resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionDetails<T> {
    /// The resolved value
    pub value: T,
    /// Variant identifier chosen by the backend, if any
    pub variant: Option<String>,
    /// Reason the backend chose this value, if reported
    pub reason: Option<String>,
}

impl<T> ResolutionDetails<T> {
    /// A bare resolution carrying only a value
    pub fn new(value: T) -> Self {
        Self {
            value,
            variant: None,
            reason: None,
        }
    }

    /// A resolution with an explanatory reason
    pub fn with_reason(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            variant: None,
            reason: Some(reason.into()),
        }
    }
}

/// Port for flag-evaluation backends
///
/// Implementations must be cheap to share (`Arc<dyn FeatureProvider>`); the
/// registry constructs each provider at most once and every client handle for
/// its name wraps that same instance.
#[async_trait]
pub trait FeatureProvider: Send + Sync {
    /// Metadata identifying this provider
    fn metadata(&self) -> ProviderMetadata;

    /// Called once when the provider becomes an active binding
    async fn initialize(&self, _context: &EvaluationContext) -> Result<()> {
        Ok(())
    }

    /// Called once when the provider is unbound or the API shuts down
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    /// Resolve a boolean flag
    async fn resolve_bool(
        &self,
        flag_key: &str,
        default_value: bool,
        context: &EvaluationContext,
    ) -> Result<ResolutionDetails<bool>>;
}

/// Provider that always returns the caller's default value
///
/// The initial binding of every [`FeatureApi`](crate::api::FeatureApi) slot,
/// and the standard test double.
#[derive(Debug, Default)]
pub struct NoOpProvider;

#[async_trait]
impl FeatureProvider for NoOpProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata::new("no-op")
    }

    async fn resolve_bool(
        &self,
        _flag_key: &str,
        default_value: bool,
        _context: &EvaluationContext,
    ) -> Result<ResolutionDetails<bool>> {
        Ok(ResolutionDetails::with_reason(default_value, "no-op default"))
    }
}

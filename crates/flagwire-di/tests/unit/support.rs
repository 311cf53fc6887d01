//! Shared test doubles for the flagwire-di suite

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use flagwire_di::ProviderBuilder;
use flagwire_domain::{
    Error, EvaluationContext, FeatureProvider, ProviderMetadata, ResolutionDetails, Result,
};

/// Provider double that reports its label as metadata and echoes defaults
pub struct StubProvider {
    pub label: String,
}

#[async_trait]
impl FeatureProvider for StubProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata::new(self.label.clone())
    }

    async fn resolve_bool(
        &self,
        _flag_key: &str,
        default_value: bool,
        _context: &EvaluationContext,
    ) -> Result<ResolutionDetails<bool>> {
        Ok(ResolutionDetails::new(default_value))
    }
}

/// Builder double with an injectable build counter and a validation switch
#[derive(Default)]
pub struct StubProviderBuilder {
    pub label: String,
    pub builds: Option<Arc<AtomicUsize>>,
    pub fail_validation: bool,
}

impl ProviderBuilder for StubProviderBuilder {
    fn build(&self) -> Result<Arc<dyn FeatureProvider>> {
        if let Some(builds) = &self.builds {
            builds.fetch_add(1, Ordering::SeqCst);
        }
        Ok(Arc::new(StubProvider {
            label: self.label.clone(),
        }))
    }

    fn validate(&self) -> Result<()> {
        if self.fail_validation {
            Err(Error::configuration("stub builder marked invalid"))
        } else {
            Ok(())
        }
    }
}

//! Caller-facing feature client handle
//!
//! A [`FeatureClient`] is a lightweight handle over the [`FeatureApi`]: it
//! remembers which named slot it routes through and carries the evaluation
//! context bound for its resolution scope. Handles are cheap to create; the
//! provider behind them is always the shared singleton bound in the API.

use std::sync::{Arc, RwLock};

use crate::api::FeatureApi;
use crate::context::EvaluationContext;
use crate::error::Result;
use crate::provider::ResolutionDetails;

/// Handle used to request flag evaluations
pub struct FeatureClient {
    api: Arc<FeatureApi>,
    name: Option<String>,
    context: RwLock<EvaluationContext>,
}

impl FeatureClient {
    /// Create a handle routing through the given named slot
    pub(crate) fn new(api: Arc<FeatureApi>, name: Option<String>) -> Self {
        Self {
            api,
            name,
            context: RwLock::new(EvaluationContext::default()),
        }
    }

    /// The provider name this client routes through, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replace this client's bound evaluation context
    pub fn set_context(&self, context: EvaluationContext) {
        let mut slot = self
            .context
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = context;
    }

    /// The evaluation context currently bound to this client
    pub fn context(&self) -> EvaluationContext {
        self.context
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Resolve a boolean flag through the currently bound provider
    pub async fn get_bool_value(&self, flag_key: &str, default_value: bool) -> Result<bool> {
        self.get_bool_details(flag_key, default_value)
            .await
            .map(|details| details.value)
    }

    /// Resolve a boolean flag, returning the full resolution details
    pub async fn get_bool_details(
        &self,
        flag_key: &str,
        default_value: bool,
    ) -> Result<ResolutionDetails<bool>> {
        let provider = self.api.provider(self.name.as_deref());
        let context = self.context();
        provider.resolve_bool(flag_key, default_value, &context).await
    }
}

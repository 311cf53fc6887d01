//! Flagwire configuration builder
//!
//! One [`FlagwireBuilder`] exists per configuration session. It never
//! constructs anything itself: every `add_*` operation writes a deferred
//! construction recipe into the shared [`ServiceRegistry`] and updates the
//! builder's bookkeeping flags. Construction happens lazily on first
//! resolution, and each name's build path is independent - resolving one
//! named provider never triggers another name's recipes.

use std::sync::Arc;

use flagwire_domain::{
    Error, EvaluationContext, EvaluationContextBuilder, FeatureApi, FeatureClient, Result,
};

use crate::policy::PolicyNameOptions;
use crate::provider::{ProviderBuilder, SharedProvider};
use crate::registry::{ServiceRegistry, ServiceScope};

/// Accumulator for feature-flag registration intents
pub struct FlagwireBuilder {
    registry: Arc<ServiceRegistry>,
    is_context_configured: bool,
    has_default_provider: bool,
    named_provider_count: usize,
    is_policy_configured: bool,
    provider_names: Vec<String>,
}

impl FlagwireBuilder {
    pub(crate) fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self {
            registry,
            is_context_configured: false,
            has_default_provider: false,
            named_provider_count: 0,
            is_policy_configured: false,
            provider_names: Vec::new(),
        }
    }

    /// The registry this builder writes recipes into
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// True once any context recipe has been registered
    pub fn is_context_configured(&self) -> bool {
        self.is_context_configured
    }

    /// True once an unnamed provider registration has occurred
    pub fn has_default_provider(&self) -> bool {
        self.has_default_provider
    }

    /// Number of named provider registrations recorded so far
    pub fn named_provider_count(&self) -> usize {
        self.named_provider_count
    }

    /// True once a default-name-selection policy has been supplied
    pub fn is_policy_configured(&self) -> bool {
        self.is_policy_configured
    }

    /// Names recorded by named provider registrations, in call order
    ///
    /// Each name appears once; re-registering a taken name is a no-op at the
    /// registry level and is not recorded again.
    pub fn provider_names(&self) -> &[String] {
        &self.provider_names
    }

    /// Register the evaluation-context recipe
    ///
    /// First configuration wins across composition layers: the recipe is
    /// add-if-absent, so a second `add_context` call is a no-op and its
    /// callback never runs.
    pub fn add_context<F>(&mut self, configure: F) -> &mut Self
    where
        F: Fn(EvaluationContextBuilder) -> EvaluationContextBuilder + Send + Sync + 'static,
    {
        self.add_context_with(move |builder, _scope| configure(builder))
    }

    /// Register the evaluation-context recipe with registry access
    ///
    /// Variant of [`add_context`](Self::add_context) whose callback also
    /// receives the resolving scope for service lookups while the context is
    /// being assembled.
    pub fn add_context_with<F>(&mut self, configure: F) -> &mut Self
    where
        F: Fn(EvaluationContextBuilder, &ServiceScope) -> EvaluationContextBuilder
            + Send
            + Sync
            + 'static,
    {
        self.is_context_configured = true;
        self.registry
            .register_scoped_if_absent::<EvaluationContext, _>(move |scope| {
                Ok(configure(EvaluationContext::builder(), scope).build())
            });
        self
    }

    /// Register the default (unnamed) provider
    ///
    /// Marks the default slot as taken; by add-if-absent discipline a later
    /// competing default registration is silently ignored rather than
    /// overwriting the first.
    pub fn add_provider<B, F>(&mut self, configure: F) -> &mut Self
    where
        B: ProviderBuilder,
        F: Fn(&mut B) + Send + Sync + 'static,
    {
        self.has_default_provider = true;
        self.register_provider::<B, F>(None, configure);
        self
    }

    /// Register a provider under a name
    ///
    /// The name must be non-empty and non-whitespace.
    pub fn add_named_provider<B, F>(&mut self, name: &str, configure: F) -> Result<&mut Self>
    where
        B: ProviderBuilder,
        F: Fn(&mut B) + Send + Sync + 'static,
    {
        if name.trim().is_empty() {
            return Err(Error::invalid_argument(
                "provider name must be non-empty and non-whitespace",
            ));
        }

        // Count and record only registrations that actually took the slot
        if self.register_provider::<B, F>(Some(name), configure) {
            self.named_provider_count += 1;
            self.provider_names.push(name.to_string());
        }
        Ok(self)
    }

    /// Register a client-construction recipe for the given slot
    ///
    /// Scoped lifetime: one client handle per scope per name, always wrapping
    /// the shared provider singleton. If a context recipe exists at
    /// resolution time, the scope's context is bound onto the client exactly
    /// once, after acquisition and before the client is handed out. Chained
    /// automatically by the provider registrations; exposed for hosts that
    /// bind providers into the API out of band.
    pub fn add_client(&mut self, name: Option<&str>) -> &mut Self {
        let client_name = name.map(str::to_string);
        let recipe = move |scope: &ServiceScope| {
            let api = scope.resolve::<FeatureApi>()?;
            let client = api.client(client_name.as_deref());
            if let Some(context) = scope.try_resolve::<EvaluationContext>()? {
                client.set_context((*context).clone());
            }
            Ok(client)
        };

        match name {
            Some(name) => self
                .registry
                .register_keyed_scoped_if_absent::<FeatureClient, _>(name, recipe),
            None => self
                .registry
                .register_scoped_if_absent::<FeatureClient, _>(recipe),
        };
        self
    }

    /// Configure the default-name-selection policy
    ///
    /// Consumed lazily by the ambient-client recipe; the selector runs fresh
    /// on every scoped resolution and is never cached across scopes.
    pub fn add_policy_name<F>(&mut self, configure: F) -> &mut Self
    where
        F: Fn(&mut PolicyNameOptions) + Send + Sync + 'static,
    {
        self.is_policy_configured = true;
        self.registry
            .register_options::<PolicyNameOptions, _, _>(None, configure, |_| Ok(()));
        self
    }

    fn register_provider<B, F>(&mut self, name: Option<&str>, configure: F) -> bool
    where
        B: ProviderBuilder,
        F: Fn(&mut B) + Send + Sync + 'static,
    {
        self.registry
            .register_options::<B, _, _>(name, configure, B::validate);

        let options_name = name.map(str::to_string);
        let recipe = move |scope: &ServiceScope| {
            let options = match options_name.as_deref() {
                Some(name) => scope.resolve_keyed::<B>(name)?,
                None => scope.resolve::<B>()?,
            };
            Ok(SharedProvider(options.build()?))
        };

        let inserted = match name {
            Some(name) => self
                .registry
                .register_keyed_singleton_if_absent::<SharedProvider, _>(name, recipe),
            None => self
                .registry
                .register_singleton_if_absent::<SharedProvider, _>(recipe),
        };

        self.add_client(name);
        inserted
    }
}

//! Default-client resolution policy
//!
//! An unqualified ("ambient") client request has to be mapped onto one of
//! the registered client slots. The policy is a pluggable strategy function
//! over the resolving scope: hosts can pick the default client dynamically
//! per request (by tenant, by header) without re-registering providers. The
//! selector runs fresh on every scoped resolution and is never cached across
//! scopes.
//!
//! When no unqualified client exists and no selector yields a name, the
//! resolution fails fast with a configuration error. Falling back silently
//! to the first named provider would hide misconfiguration, so that policy
//! variant is deliberately not implemented.

use std::ops::Deref;
use std::sync::Arc;

use flagwire_domain::{Error, FeatureClient, Result};

use crate::registry::ServiceScope;

/// Strategy function selecting the default client name for one resolution
pub type DefaultNameSelector = Arc<dyn Fn(&ServiceScope) -> Option<String> + Send + Sync>;

/// Options carrying the default-name-selection strategy
///
/// Set at most once via
/// [`FlagwireBuilder::add_policy_name`](crate::builder::FlagwireBuilder::add_policy_name).
#[derive(Default)]
pub struct PolicyNameOptions {
    /// Selector invoked per scoped resolution of the ambient client
    pub default_name_selector: Option<DefaultNameSelector>,
}

impl PolicyNameOptions {
    /// Set the selector from a plain closure
    pub fn select_with<F>(&mut self, selector: F) -> &mut Self
    where
        F: Fn(&ServiceScope) -> Option<String> + Send + Sync + 'static,
    {
        self.default_name_selector = Some(Arc::new(selector));
        self
    }
}

/// The ambient feature-client handle
///
/// Resolving `DefaultClient` applies the configured policy; resolving
/// [`FeatureClient`] directly returns the raw unqualified registration.
#[derive(Clone)]
pub struct DefaultClient(Arc<FeatureClient>);

impl DefaultClient {
    /// The underlying client handle
    pub fn client(&self) -> &Arc<FeatureClient> {
        &self.0
    }
}

impl Deref for DefaultClient {
    type Target = FeatureClient;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for DefaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultClient")
            .field("name", &self.0.name())
            .finish()
    }
}

/// Scoped recipe for the ambient client
///
/// No selector, or a selector yielding no name, routes to the unqualified
/// client; otherwise the keyed client for the selected name is returned.
pub(crate) fn resolve_default_client(scope: &ServiceScope) -> Result<DefaultClient> {
    let policy = scope.try_resolve::<PolicyNameOptions>()?;
    let selected = policy
        .as_deref()
        .and_then(|options| options.default_name_selector.as_ref())
        .and_then(|selector| selector(scope))
        .filter(|name| !name.trim().is_empty());

    let client = match selected {
        Some(name) => scope.resolve_keyed::<FeatureClient>(&name)?,
        None => scope.try_resolve::<FeatureClient>()?.ok_or_else(|| {
            Error::configuration(
                "default feature client is not configured; \
                 register an unnamed provider or supply a default-name policy",
            )
        })?,
    };

    Ok(DefaultClient(client))
}

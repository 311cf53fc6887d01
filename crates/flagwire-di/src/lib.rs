//! Dependency-injection layer for Flagwire
//!
//! Wires feature-flag providers, clients and evaluation contexts into a
//! [`ServiceRegistry`] with named slots and policy-driven defaulting. The
//! crate implements the registration/resolution protocol only; flag
//! evaluation itself lives behind the `flagwire-domain` provider port.
//!
//! - [`registry`] - the add-if-absent slot container and resolution scopes
//! - [`builder`] - the per-session registration accumulator
//! - [`policy`] - default-client selection strategy
//! - [`lifecycle`] - startup/shutdown coordination against the feature API
//! - [`bootstrap`] - the composition-root entry point

pub mod bootstrap;
pub mod builder;
pub mod lifecycle;
pub mod options;
pub mod policy;
pub mod provider;
pub mod registry;

pub use bootstrap::{FlagwireOptions, add_feature_flags};
pub use builder::FlagwireBuilder;
pub use lifecycle::FeatureLifecycleManager;
pub use policy::{DefaultClient, DefaultNameSelector, PolicyNameOptions};
pub use provider::{ProviderBuilder, SharedProvider};
pub use registry::{Lifetime, ServiceRegistry, ServiceScope};

//! Domain layer for Flagwire
//!
//! Core value types and ports for feature-flag evaluation wiring: the
//! immutable [`EvaluationContext`], the [`FeatureProvider`] port, the
//! caller-facing [`FeatureClient`] handle and the process-wide
//! [`FeatureApi`] that binds names to active providers.
//!
//! This crate carries no evaluation algorithms. Providers implement the
//! actual flag backends; this layer only defines the contracts they plug
//! into and the handles callers use to reach them.

pub mod api;
pub mod client;
pub mod context;
pub mod error;
pub mod provider;

pub use api::FeatureApi;
pub use client::FeatureClient;
pub use context::{ContextValue, EvaluationContext, EvaluationContextBuilder};
pub use error::{Error, Result};
pub use provider::{FeatureProvider, NoOpProvider, ProviderMetadata, ResolutionDetails};

//! Tests for the feature lifecycle manager

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use flagwire_di::{FeatureLifecycleManager, ServiceRegistry, SharedProvider, add_feature_flags};
use flagwire_domain::{Error, FeatureApi};

use crate::support::StubProviderBuilder;

#[tokio::test]
async fn initialization_without_a_provider_is_fatal() {
    let registry = Arc::new(ServiceRegistry::new());
    add_feature_flags(&registry, |_flags| Ok(())).unwrap();

    let scope = registry.create_scope();
    let lifecycle = scope.resolve::<FeatureLifecycleManager>().unwrap();
    let api = scope.resolve::<FeatureApi>().unwrap();

    let err = lifecycle
        .ensure_initialized(CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }), "got: {err}");
    assert!(err.to_string().contains("not registered"), "got: {err}");
    // The API binding must be left untouched
    assert_eq!(api.provider(None).metadata().name, "no-op");
}

#[tokio::test]
async fn initialization_binds_the_registered_provider() {
    let registry = Arc::new(ServiceRegistry::new());
    add_feature_flags(&registry, |flags| {
        flags.add_provider::<StubProviderBuilder, _>(|builder| {
            builder.label = "primary".to_string();
        });
        Ok(())
    })
    .unwrap();

    let scope = registry.create_scope();
    let lifecycle = scope.resolve::<FeatureLifecycleManager>().unwrap();
    let api = scope.resolve::<FeatureApi>().unwrap();

    lifecycle
        .ensure_initialized(CancellationToken::new())
        .await
        .unwrap();

    let registered = scope.resolve::<SharedProvider>().unwrap();
    assert!(Arc::ptr_eq(&api.provider(None), &registered.provider()));
}

#[tokio::test]
async fn shutdown_before_initialization_does_not_fail() {
    let registry = Arc::new(ServiceRegistry::new());
    add_feature_flags(&registry, |_flags| Ok(())).unwrap();

    let lifecycle = registry
        .create_scope()
        .resolve::<FeatureLifecycleManager>()
        .unwrap();

    lifecycle.shutdown(CancellationToken::new()).await.unwrap();
    lifecycle.shutdown(CancellationToken::new()).await.unwrap();
}

#[tokio::test]
async fn shutdown_after_initialization_unbinds_the_provider() {
    let registry = Arc::new(ServiceRegistry::new());
    add_feature_flags(&registry, |flags| {
        flags.add_provider::<StubProviderBuilder, _>(|builder| {
            builder.label = "primary".to_string();
        });
        Ok(())
    })
    .unwrap();

    let scope = registry.create_scope();
    let lifecycle = scope.resolve::<FeatureLifecycleManager>().unwrap();
    let api = scope.resolve::<FeatureApi>().unwrap();

    lifecycle
        .ensure_initialized(CancellationToken::new())
        .await
        .unwrap();
    lifecycle.shutdown(CancellationToken::new()).await.unwrap();

    assert_eq!(api.provider(None).metadata().name, "no-op");
}

#[tokio::test]
async fn cancelled_token_aborts_initialization() {
    let registry = Arc::new(ServiceRegistry::new());
    add_feature_flags(&registry, |flags| {
        flags.add_provider::<StubProviderBuilder, _>(|builder| {
            builder.label = "primary".to_string();
        });
        Ok(())
    })
    .unwrap();

    let scope = registry.create_scope();
    let lifecycle = scope.resolve::<FeatureLifecycleManager>().unwrap();
    let api = scope.resolve::<FeatureApi>().unwrap();

    let token = CancellationToken::new();
    token.cancel();

    let err = lifecycle.ensure_initialized(token).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled), "got: {err}");
    assert_eq!(api.provider(None).metadata().name, "no-op");
}

//! Resolver behaviour against stub backends
//!
//! Run with: cargo test --package tagpin-core --test resolver_tests

mod common;

use common::StubFactory;
use tagpin_core::{DigestSource, Error, ProviderKind, Resolver};

#[tokio::test]
async fn short_name_resolves_on_docker_hub() {
    let factory = StubFactory::digest("abc123");
    let resolver = Resolver::new(factory.clone());

    let digest = resolver
        .resolve(&DigestSource::new("library/nginx", "latest"))
        .await
        .unwrap();

    assert_eq!(digest, "abc123");
    let built = factory.built();
    assert_eq!(built.len(), 1);
    assert_eq!(built[0].kind, ProviderKind::DockerHub);
    assert_eq!(built[0].request.image, "library/nginx");
    assert_eq!(built[0].request.tag, "latest");
}

#[tokio::test]
async fn hostname_reference_resolves_on_generic_registry() {
    let factory = StubFactory::digest("def456");
    let resolver = Resolver::new(factory.clone());

    let digest = resolver
        .resolve(&DigestSource::new("registry.example.com/team/app", "v1").with_token("t0k"))
        .await
        .unwrap();

    assert_eq!(digest, "def456");
    let target = &factory.built()[0];
    assert_eq!(target.kind, ProviderKind::DockerRegistry);
    assert_eq!(target.hostname, "registry.example.com");
    assert_eq!(target.request.image, "team/app");
    assert_eq!(target.request.token.as_deref(), Some("t0k"));
}

#[tokio::test]
async fn quay_reference_resolves_on_quay() {
    let factory = StubFactory::digest("fff");
    let resolver = Resolver::new(factory.clone());

    resolver
        .resolve(&DigestSource::new("quay.io/prometheus/node-exporter", "v1.8.0"))
        .await
        .unwrap();

    let target = &factory.built()[0];
    assert_eq!(target.kind, ProviderKind::Quay);
    assert_eq!(target.request.image, "prometheus/node-exporter");
}

#[tokio::test]
async fn empty_image_fails_validation_without_dispatch() {
    let factory = StubFactory::digest("abc123");
    let resolver = Resolver::new(factory.clone());

    let err = resolver
        .resolve(&DigestSource::new("", "latest"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert!(factory.built().is_empty());
    assert_eq!(factory.call_count(), 0);
}

#[tokio::test]
async fn validation_aggregates_every_problem() {
    let resolver = Resolver::new(StubFactory::digest("abc123"));

    let err = resolver
        .resolve(&DigestSource::new("", "").with_token(""))
        .await
        .unwrap_err();

    match err {
        Error::Validation { errors } => assert_eq!(errors.lines().count(), 3),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_reference_propagates() {
    let factory = StubFactory::digest("abc123");
    let resolver = Resolver::new(factory.clone());

    let err = resolver
        .resolve(&DigestSource::new("registry.example.com/", "v1"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedReference { .. }));
    assert_eq!(factory.call_count(), 0);
}

#[tokio::test]
async fn backend_error_propagates_without_retry() {
    let factory = StubFactory::failing("unauthorized");
    let resolver = Resolver::new(factory.clone());

    let err = resolver
        .resolve(&DigestSource::new("library/nginx", "latest"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Backend(_)));
    assert_eq!(err.to_string(), "unauthorized");
    assert_eq!(factory.call_count(), 1);
}

#[tokio::test]
async fn empty_digest_is_not_an_error() {
    let factory = StubFactory::digest("");
    let resolver = Resolver::new(factory.clone());

    let digest = resolver
        .resolve(&DigestSource::new("library/nginx", "does-not-exist"))
        .await
        .unwrap();

    assert_eq!(digest, "");
    assert_eq!(factory.call_count(), 1);
}

#[tokio::test]
async fn resolving_twice_yields_same_digest() {
    let factory = StubFactory::digest("abc123");
    let resolver = Resolver::new(factory.clone());
    let source = DigestSource::new("nginx", "1.27").with_token("t");

    let first = resolver.resolve(&source).await.unwrap();
    let second = resolver.resolve(&source).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(factory.call_count(), 2);
    assert_eq!(factory.built()[0], factory.built()[1]);
}

#[tokio::test]
async fn conflicting_registry_signals_fail_validation() {
    let factory = StubFactory::digest("abc123");
    let resolver = Resolver::new(factory.clone());

    let source = DigestSource::new("ghcr.io/org/app", "v1").with_registry("quay.io");
    let err = resolver.resolve(&source).await.unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert!(factory.built().is_empty());
}

#[tokio::test]
async fn tag_exists_reports_empty_digest_as_false() {
    let resolver = Resolver::new(StubFactory::digest(""));
    assert!(!resolver
        .tag_exists(&DigestSource::new("nginx", "nope"))
        .await
        .unwrap());
}

#[tokio::test]
async fn concurrent_resolutions_are_independent() {
    let factory = StubFactory::digest("abc123");
    let resolver = std::sync::Arc::new(Resolver::new(factory.clone()));

    let mut handles = Vec::new();
    for tag in ["1", "2", "3", "4"] {
        let resolver = std::sync::Arc::clone(&resolver);
        handles.push(tokio::spawn(async move {
            resolver.resolve(&DigestSource::new("nginx", tag)).await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "abc123");
    }
    assert_eq!(factory.call_count(), 4);
}

#[tokio::test]
async fn tags_with_url_delimiters_never_reach_a_backend() {
    let factory = StubFactory::digest("abc123");
    let resolver = Resolver::new(factory.clone());

    for tag in ["latest#does-not-exist", "nope/../latest", "v1?x=1"] {
        let err = resolver
            .resolve(&DigestSource::new("nginx", tag))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "tag {}", tag);
    }
    assert_eq!(factory.call_count(), 0);
}

#[tokio::test]
async fn invalid_registry_host_fails_validation() {
    let factory = StubFactory::digest("abc123");
    let resolver = Resolver::new(factory.clone());

    let err = resolver
        .resolve(&DigestSource::new("team/app", "v1").with_registry("bad_host:port"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert!(err.to_string().contains("bad_host:port"));
    assert!(factory.built().is_empty());
}

#[tokio::test]
async fn docker_hub_alias_registry_resolves_on_hub() {
    let factory = StubFactory::digest("abc123");
    let resolver = Resolver::new(factory.clone());

    let source = DigestSource::new("docker.io/library/nginx", "latest").with_registry("index.docker.io");
    resolver.resolve(&source).await.unwrap();

    assert_eq!(factory.built()[0].kind, ProviderKind::DockerHub);
}

//! Common test infrastructure for tagpin-registry tests
//!
//! Wiremock setup helpers for the Hub, Quay and OCI distribution APIs, plus
//! factories pointing the HTTP backends at a mock server.

#![allow(dead_code)]

use serde_json::json;
use tagpin_core::config::EndpointSettings;
use tagpin_core::{Resolver, RegistryRequest};
use tagpin_registry::HttpBackends;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DIGEST_AMD64: &str =
    "sha256:0a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f9";
pub const DIGEST_ARM64: &str =
    "sha256:ffeeddccbbaa99887766554433221100ffeeddccbbaa99887766554433221100";

/// Hex part of a digest constant
pub fn hex(digest: &str) -> &str {
    digest.strip_prefix("sha256:").unwrap_or(digest)
}

/// Host and port of the mock server, as used in image references
pub fn host_of(server: &MockServer) -> String {
    server
        .uri()
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

/// Endpoint settings routing every provider to `server`
pub fn endpoints_for(server: &MockServer) -> EndpointSettings {
    EndpointSettings {
        docker_hub_api: server.uri(),
        quay_api: server.uri(),
        insecure_registries: vec![host_of(server)],
    }
}

/// HTTP backends routed to `server`
pub fn backends_for(server: &MockServer) -> HttpBackends {
    HttpBackends::with_client(reqwest::Client::new(), endpoints_for(server))
}

/// Resolver whose backends talk to `server`
pub fn resolver_for(server: &MockServer) -> Resolver {
    Resolver::new(backends_for(server))
}

pub fn request(image: &str, tag: &str) -> RegistryRequest {
    RegistryRequest::new(image, tag)
}

/// Hub tag endpoint returning amd64 and arm64 images
pub async fn mock_hub_tag(server: &MockServer, repository: &str, tag: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/repositories/{}/tags/{}", repository, tag)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": tag,
            "digest": DIGEST_AMD64,
            "images": [
                {"architecture": "amd64", "os": "linux", "digest": DIGEST_AMD64},
                {"architecture": "arm64", "os": "linux", "digest": DIGEST_ARM64}
            ]
        })))
        .mount(server)
        .await;
}

/// Quay tag endpoint returning one active tag
pub async fn mock_quay_tag(server: &MockServer, repository: &str, tag: &str, digest: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/repository/{}/tag/", repository)))
        .and(query_param("specificTag", tag))
        .and(query_param("onlyActiveTags", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tags": [{"name": tag, "manifest_digest": digest, "reversion": false}],
            "page": 1,
            "has_additional": false
        })))
        .mount(server)
        .await;
}

/// Registry `/v2/` ping answering 200 (no authentication)
pub async fn mock_open_registry(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Registry `/v2/` ping demanding a bearer token from `/token`
///
/// With `basic` set, the token endpoint only answers requests carrying that
/// `Authorization: Basic ...` value.
pub async fn mock_token_registry(server: &MockServer, issued: &str, basic: Option<&str>) {
    let challenge = format!(
        r#"Bearer realm="{}/token",service="mock-registry""#,
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/v2/"))
        .respond_with(ResponseTemplate::new(401).insert_header("WWW-Authenticate", challenge))
        .mount(server)
        .await;

    let mut token = Mock::given(method("GET"))
        .and(path("/token"))
        .and(query_param("service", "mock-registry"))
        .and(query_param("scope", "repository:team/app:pull"));
    if let Some(value) = basic {
        token = token.and(header("Authorization", format!("Basic {}", value).as_str()));
    }

    token
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": issued })))
        .expect(1)
        .mount(server)
        .await;
}

/// Manifest HEAD answering with a digest header, optionally requiring an Authorization value
pub async fn mock_manifest(
    server: &MockServer,
    repository: &str,
    tag: &str,
    digest: &str,
    authorization: Option<&str>,
) {
    let mut mock = Mock::given(method("HEAD"))
        .and(path(format!("/v2/{}/manifests/{}", repository, tag)));
    if let Some(value) = authorization {
        mock = mock.and(header("Authorization", value));
    }

    mock.respond_with(ResponseTemplate::new(200).insert_header("Docker-Content-Digest", digest))
        .expect(1)
        .mount(server)
        .await;
}

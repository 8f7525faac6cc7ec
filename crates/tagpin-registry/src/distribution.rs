//! Generic OCI distribution registry backend
//!
//! Resolves digests with a `HEAD /v2/<image>/manifests/<tag>` request and the
//! `Docker-Content-Digest` response header. Before the manifest request the
//! registry is pinged at `/v2/` to learn which authentication it expects.

use crate::auth::{fetch_bearer_token, Challenge};
use crate::http::{decode_error, endpoint, status_error, strip_algorithm, transport_error};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::StatusCode;
use tagpin_core::{BackendError, Registry, RegistryRequest};
use tracing::debug;

const NAME: &str = "docker-registry";

/// Manifest media types accepted, multi-platform indexes first
pub const MANIFEST_ACCEPT: &str = "application/vnd.docker.distribution.manifest.list.v2+json,\
application/vnd.oci.image.index.v1+json,\
application/vnd.docker.distribution.manifest.v2+json,\
application/vnd.oci.image.manifest.v1+json";

/// Header carrying the manifest digest
pub const DIGEST_HEADER: &str = "docker-content-digest";

/// OCI distribution v2 registry addressed by hostname
pub struct DockerRegistry {
    client: reqwest::Client,
    base_url: String,
    hostname: String,
    request: RegistryRequest,
}

impl DockerRegistry {
    /// Create a backend for `hostname`, reached over `scheme`
    pub fn new(
        client: reqwest::Client,
        scheme: &str,
        hostname: impl Into<String>,
        request: RegistryRequest,
    ) -> Self {
        let hostname = hostname.into();
        Self {
            client,
            base_url: format!("{}://{}", scheme, hostname),
            hostname,
            request,
        }
    }

    /// Work out the Authorization header the registry wants
    async fn authorization(&self) -> Result<Option<String>, BackendError> {
        let url = endpoint(&self.hostname, &self.base_url, &["v2", ""], &[])?;
        debug!("Pinging registry at {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(&self.hostname, &url, e))?;

        let token = self.request.token.as_deref();

        match response.status() {
            status if status.is_success() => Ok(token.map(|t| format!("Bearer {}", t))),
            StatusCode::UNAUTHORIZED => {
                let challenge = response
                    .headers()
                    .get(WWW_AUTHENTICATE)
                    .and_then(|h| h.to_str().ok())
                    .and_then(Challenge::parse);

                match challenge {
                    Some(Challenge::Bearer { realm, service }) => {
                        let bearer = fetch_bearer_token(
                            &self.client,
                            &self.hostname,
                            &realm,
                            service.as_deref(),
                            &self.request.image,
                            token,
                        )
                        .await?;
                        Ok(Some(format!("Bearer {}", bearer)))
                    }
                    Some(Challenge::Basic) => Ok(token.map(|t| format!("Basic {}", t))),
                    None => Ok(token.map(|t| format!("Bearer {}", t))),
                }
            }
            _ => Err(status_error(&self.hostname, &self.request.image, &url, response).await),
        }
    }
}

#[async_trait]
impl Registry for DockerRegistry {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn digest(&self) -> Result<String, BackendError> {
        let authorization = self.authorization().await?;

        let mut segments = vec!["v2"];
        segments.extend(self.request.image.split('/'));
        segments.extend(["manifests", self.request.tag.as_str()]);
        let url = endpoint(&self.hostname, &self.base_url, &segments, &[])?;

        debug!("Fetching manifest digest from: {}", url);

        let mut builder = self
            .client
            .head(url.clone())
            .header(ACCEPT, HeaderValue::from_static(MANIFEST_ACCEPT));
        if let Some(authorization) = authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&self.hostname, &url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(
                "Manifest {}:{} not found on {}",
                self.request.image, self.request.tag, self.hostname
            );
            return Ok(String::new());
        }

        if !response.status().is_success() {
            return Err(status_error(&self.hostname, &self.request.image, &url, response).await);
        }

        let digest = response
            .headers()
            .get(DIGEST_HEADER)
            .ok_or_else(|| {
                decode_error(&self.hostname, "response has no Docker-Content-Digest header")
            })?
            .to_str()
            .map_err(|e| decode_error(&self.hostname, e))?;

        Ok(strip_algorithm(digest))
    }
}

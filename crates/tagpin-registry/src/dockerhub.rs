//! Docker Hub backend
//!
//! Reads tag metadata from the Hub API rather than the registry endpoint, so
//! a digest can be picked per architecture without a token exchange.

use crate::http::{decode_error, endpoint, status_error, strip_algorithm, transport_error};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tagpin_core::{BackendError, Registry, RegistryRequest};
use tracing::debug;

const NAME: &str = "dockerhub";

/// Docker Hub tag lookup
pub struct DockerHub {
    client: reqwest::Client,
    api_url: String,
    request: RegistryRequest,
}

impl DockerHub {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, request: RegistryRequest) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            request,
        }
    }

    /// Repository path on Hub; official images live under `library/`
    pub fn repository(&self) -> String {
        if self.request.image.contains('/') {
            self.request.image.clone()
        } else {
            format!("library/{}", self.request.image)
        }
    }
}

#[async_trait]
impl Registry for DockerHub {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn digest(&self) -> Result<String, BackendError> {
        let repository = self.repository();
        let mut segments = vec!["v2", "repositories"];
        segments.extend(repository.split('/'));
        segments.extend(["tags", self.request.tag.as_str()]);
        let url = endpoint(NAME, &self.api_url, &segments, &[])?;

        debug!("Fetching tag metadata from: {}", url);

        let mut builder = self.client.get(url.clone());
        if let Some(token) = &self.request.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(NAME, &url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Tag {}:{} not found on Docker Hub", repository, self.request.tag);
            return Ok(String::new());
        }

        if !response.status().is_success() {
            return Err(status_error(NAME, &repository, &url, response).await);
        }

        let tag: TagResponse = response.json().await.map_err(|e| decode_error(NAME, e))?;

        Ok(tag
            .digest_for(&self.request.architecture)
            .map(strip_algorithm)
            .unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct TagResponse {
    #[serde(default)]
    digest: Option<String>,
    #[serde(default)]
    images: Vec<TagImage>,
}

#[derive(Debug, Deserialize)]
struct TagImage {
    #[serde(default)]
    architecture: String,
    #[serde(default)]
    digest: Option<String>,
}

impl TagResponse {
    /// Digest of the image built for `architecture`
    ///
    /// Tags without a per-image breakdown fall back to the tag-level digest.
    fn digest_for(&self, architecture: &str) -> Option<&str> {
        if self.images.is_empty() {
            return self.digest.as_deref();
        }

        self.images
            .iter()
            .find(|img| img.architecture == architecture)
            .and_then(|img| img.digest.as_deref())
    }
}

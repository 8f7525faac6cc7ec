//! Quay backend

use crate::http::{decode_error, endpoint, status_error, strip_algorithm, transport_error};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tagpin_core::{BackendError, Registry, RegistryRequest};
use tracing::debug;

const NAME: &str = "quay";

/// Quay tag lookup through the v1 repository API
pub struct Quay {
    client: reqwest::Client,
    api_url: String,
    request: RegistryRequest,
}

impl Quay {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, request: RegistryRequest) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            request,
        }
    }
}

#[async_trait]
impl Registry for Quay {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn digest(&self) -> Result<String, BackendError> {
        let mut segments = vec!["api", "v1", "repository"];
        segments.extend(self.request.image.split('/'));
        segments.extend(["tag", ""]);
        let url = endpoint(
            NAME,
            &self.api_url,
            &segments,
            &[
                ("specificTag", self.request.tag.as_str()),
                ("onlyActiveTags", "true"),
            ],
        )?;

        debug!("Fetching tag list from: {}", url);

        let mut builder = self.client.get(url.clone());
        if let Some(token) = &self.request.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(NAME, &url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Repository {} not found on Quay", self.request.image);
            return Ok(String::new());
        }

        if !response.status().is_success() {
            return Err(status_error(NAME, &self.request.image, &url, response).await);
        }

        let tags: TagsResponse = response.json().await.map_err(|e| decode_error(NAME, e))?;

        Ok(tags
            .tags
            .iter()
            .find(|t| t.name == self.request.tag)
            .and_then(|t| t.manifest_digest.as_deref())
            .map(strip_algorithm)
            .unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    tags: Vec<QuayTag>,
}

#[derive(Debug, Deserialize)]
struct QuayTag {
    name: String,
    #[serde(default)]
    manifest_digest: Option<String>,
}

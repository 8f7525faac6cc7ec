//! Per-request digest source definition

use crate::classify::DOCKER_HUB_HOSTS;
use crate::error::Result;
use crate::reference::{is_valid_hostname, is_valid_repository, is_valid_tag, parse_image};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;

/// Architecture selected on registries that index digests per platform
pub const DEFAULT_ARCHITECTURE: &str = "amd64";

/// What to resolve: an image, its tag and how to reach the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DigestSource {
    /// Image reference, optionally prefixed by a registry hostname
    #[serde(default)]
    pub image: String,

    /// Tag to resolve
    #[serde(default)]
    pub tag: String,

    /// Opaque registry credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Registry hostname for images that do not carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// Platform architecture (Docker Hub only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
}

impl DigestSource {
    /// Create a source for `image:tag`
    pub fn new(image: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set the registry credential
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an explicit registry hostname
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Set the platform architecture
    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = Some(architecture.into());
        self
    }

    /// Load a source definition from a YAML file
    pub fn from_yaml_file(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let source: Self = serde_yaml_ng::from_str(&content)?;
        Ok(source)
    }

    /// Architecture to select, defaulting to amd64
    pub fn architecture(&self) -> &str {
        self.architecture
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_ARCHITECTURE)
    }

    /// Check every field and return one message per problem found
    ///
    /// References that cannot be split into hostname and image are left to
    /// the parser, which reports them as malformed.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let parsed = parse_image(&self.image).ok();

        if self.image.is_empty() {
            errors.push("docker image must be specified".to_string());
        } else if let Some((_, repository)) = &parsed {
            if !is_valid_repository(repository) {
                errors.push(format!(
                    "docker image '{}' is not a valid repository path (lowercase components separated by '/')",
                    self.image
                ));
            }
        }

        if self.tag.is_empty() {
            errors.push("docker tag must be specified".to_string());
        } else if !is_valid_tag(&self.tag) {
            errors.push(format!(
                "docker tag '{}' is not valid: use up to 128 letters, digits, '_', '.' or '-', not starting with '.' or '-'",
                self.tag
            ));
        }

        if matches!(self.token.as_deref(), Some("")) {
            errors.push("docker token must not be empty when set".to_string());
        }

        if let Some(registry) = self.registry.as_deref() {
            if registry.is_empty() {
                errors.push("docker registry must not be empty when set".to_string());
            } else if !is_valid_hostname(registry) {
                errors.push(format!(
                    "docker registry '{}' must be a hostname with an optional port, without scheme or path",
                    registry
                ));
            } else if let Some((hostname, _)) = &parsed {
                // Only one registry-selection signal may be set
                if !hostname.is_empty() && !same_registry(hostname, registry) {
                    errors.push(format!(
                        "docker image hostname '{}' conflicts with registry '{}', set only one",
                        hostname, registry
                    ));
                }
            }
        }

        errors
    }
}

/// Hosts name the same registry when equal or both Docker Hub aliases
fn same_registry(a: &str, b: &str) -> bool {
    let is_hub = |host: &str| DOCKER_HUB_HOSTS.iter().any(|h| h.eq_ignore_ascii_case(host));
    a.eq_ignore_ascii_case(b) || (is_hub(a) && is_hub(b))
}

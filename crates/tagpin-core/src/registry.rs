//! Registry backend trait definitions

use crate::classify::ProviderKind;
use crate::config::DEFAULT_ARCHITECTURE;
use crate::error::BackendError;
use async_trait::async_trait;

/// Normalized input handed to a registry backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRequest {
    /// Repository path without hostname (e.g., "team/app")
    pub image: String,
    /// Tag to resolve
    pub tag: String,
    /// Opaque registry credential
    pub token: Option<String>,
    /// Platform architecture to select where the registry indexes per platform
    pub architecture: String,
}

impl RegistryRequest {
    pub fn new(image: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            tag: tag.into(),
            token: None,
            architecture: DEFAULT_ARCHITECTURE.to_string(),
        }
    }

    /// Set the registry credential; empty tokens are ignored
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }
}

/// Everything a factory needs to construct one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryTarget {
    /// Selected provider family
    pub kind: ProviderKind,
    /// Registry hostname, set for generic registries only
    pub hostname: String,
    /// Request the backend answers
    pub request: RegistryRequest,
}

/// A registry able to report the digest of one image tag
#[async_trait]
pub trait Registry: Send + Sync {
    /// Backend name
    fn name(&self) -> &'static str;

    /// Query the digest of the configured image tag
    ///
    /// Returns the hex digest without its `sha256:` prefix, or an empty string
    /// when the registry has no digest for the tag. Issues exactly one digest
    /// query; failures are returned, never retried.
    async fn digest(&self) -> Result<String, BackendError>;
}

/// Constructs the backend matching a classified target
pub trait BackendFactory: Send + Sync {
    fn build(&self, target: RegistryTarget) -> Box<dyn Registry>;
}

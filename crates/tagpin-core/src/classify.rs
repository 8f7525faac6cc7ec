//! Registry provider classification
//!
//! Rules are evaluated in the order of [`CLASSIFICATION_RULES`] and the first
//! match wins. The default hub comes first so that short names like
//! `nginx:latest` resolve without any registry configuration.

use crate::error::{Error, Result};
use crate::registry::{RegistryRequest, RegistryTarget};
use std::fmt;
use tracing::debug;

/// Hostnames served by the Docker Hub API
pub const DOCKER_HUB_HOSTS: &[&str] = &[
    "docker.io",
    "index.docker.io",
    "registry-1.docker.io",
    "registry.hub.docker.com",
    "hub.docker.com",
];

/// Canonical domain of the Quay registry
pub const QUAY_HOST: &str = "quay.io";

/// Registry provider family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Default public hub (Docker Hub)
    DockerHub,
    /// Named alternate hub (Quay)
    Quay,
    /// Any OCI distribution registry addressed by hostname
    DockerRegistry,
}

impl ProviderKind {
    /// Short identifier used in logs and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::DockerHub => "dockerhub",
            ProviderKind::Quay => "quay",
            ProviderKind::DockerRegistry => "docker-registry",
        }
    }

    /// Build the backend target for this provider
    ///
    /// The hostname is only carried for generic registries; hub backends talk
    /// to their fixed API endpoint.
    pub fn target(self, selection: &RegistrySelection, request: RegistryRequest) -> RegistryTarget {
        let hostname = match self {
            ProviderKind::DockerRegistry => selection.effective_host().to_string(),
            ProviderKind::DockerHub | ProviderKind::Quay => String::new(),
        };

        RegistryTarget {
            kind: self,
            hostname,
            request,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of the registry-selection signals for one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySelection {
    /// Image path, used in error messages
    pub image: String,
    /// Hostname parsed from the image reference, empty when absent
    pub hostname: String,
    /// Explicit registry hostname from configuration
    pub registry: Option<String>,
}

impl RegistrySelection {
    pub fn new(
        image: impl Into<String>,
        hostname: impl Into<String>,
        registry: Option<String>,
    ) -> Self {
        Self {
            image: image.into(),
            hostname: hostname.into(),
            registry: registry.filter(|r| !r.is_empty()),
        }
    }

    /// Host the image lives on: the parsed hostname, else the configured registry
    pub fn effective_host(&self) -> &str {
        if !self.hostname.is_empty() {
            &self.hostname
        } else {
            self.registry.as_deref().unwrap_or("")
        }
    }
}

/// True when the image lives on the default public hub
pub fn is_default_hub(selection: &RegistrySelection) -> bool {
    let host = selection.effective_host();
    host.is_empty() || DOCKER_HUB_HOSTS.iter().any(|h| h.eq_ignore_ascii_case(host))
}

/// True when the image lives on the named alternate hub
pub fn is_named_alternate(selection: &RegistrySelection) -> bool {
    selection.effective_host().eq_ignore_ascii_case(QUAY_HOST)
}

/// True when an explicit registry hostname addresses the image
///
/// Fails when the parsed hostname and the configured registry disagree, or when
/// neither is set.
pub fn is_generic_registry(selection: &RegistrySelection) -> Result<bool> {
    match (selection.hostname.as_str(), selection.registry.as_deref()) {
        ("", None) => Err(Error::MissingRegistry {
            image: selection.image.clone(),
        }),
        (hostname, Some(registry))
            if !hostname.is_empty() && !hostname.eq_ignore_ascii_case(registry) =>
        {
            Err(Error::inconsistent_registry(hostname, registry))
        }
        _ => Ok(true),
    }
}

type Rule = fn(&RegistrySelection) -> Result<bool>;

fn default_hub_rule(selection: &RegistrySelection) -> Result<bool> {
    Ok(is_default_hub(selection))
}

fn named_alternate_rule(selection: &RegistrySelection) -> Result<bool> {
    Ok(is_named_alternate(selection))
}

/// Classification rules in priority order
pub const CLASSIFICATION_RULES: &[(ProviderKind, Rule)] = &[
    (ProviderKind::DockerHub, default_hub_rule),
    (ProviderKind::Quay, named_alternate_rule),
    (ProviderKind::DockerRegistry, is_generic_registry),
];

/// Pick the provider serving the image
///
/// An error raised by a rule terminates classification; it does not fall
/// through to the next rule.
pub fn classify(selection: &RegistrySelection) -> Result<ProviderKind> {
    for (kind, rule) in CLASSIFICATION_RULES {
        if rule(selection)? {
            debug!(
                "Classified '{}' (host '{}') as {}",
                selection.image,
                selection.effective_host(),
                kind
            );
            return Ok(*kind);
        }
    }

    Err(Error::UnknownRegistryProvider)
}

//! Registry backends for tagpin
//!
//! This crate provides the HTTP implementations of [`tagpin_core::Registry`]:
//! - [`DockerHub`] (the default public hub, via the Hub tag API)
//! - [`Quay`] (quay.io, via the v1 repository API)
//! - [`DockerRegistry`] (any OCI distribution registry, via manifest HEAD requests)
//!
//! # Example
//!
//! ```no_run
//! use tagpin_core::{DigestSource, Resolver, Settings};
//! use tagpin_registry::HttpBackends;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backends = HttpBackends::new(&Settings::default())?;
//!     let resolver = Resolver::new(backends);
//!
//!     let digest = resolver
//!         .resolve(&DigestSource::new("library/nginx", "latest"))
//!         .await?;
//!     println!("nginx@sha256:{}", digest);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod distribution;
pub mod dockerhub;
pub mod http;
pub mod quay;

pub use distribution::DockerRegistry;
pub use dockerhub::DockerHub;
pub use quay::Quay;

use tagpin_core::config::EndpointSettings;
use tagpin_core::{BackendError, BackendFactory, ProviderKind, Registry, RegistryTarget, Settings};

/// Backend factory issuing HTTP backends that share one client
#[derive(Clone)]
pub struct HttpBackends {
    client: reqwest::Client,
    endpoints: EndpointSettings,
}

impl HttpBackends {
    /// Create a factory from operational settings
    pub fn new(settings: &Settings) -> Result<Self, BackendError> {
        Ok(Self {
            client: http::build_client(&settings.network)?,
            endpoints: settings.endpoints.clone(),
        })
    }

    /// Create a factory around an existing client
    pub fn with_client(client: reqwest::Client, endpoints: EndpointSettings) -> Self {
        Self { client, endpoints }
    }
}

impl BackendFactory for HttpBackends {
    fn build(&self, target: RegistryTarget) -> Box<dyn Registry> {
        let client = self.client.clone();
        match target.kind {
            ProviderKind::DockerHub => Box::new(DockerHub::new(
                client,
                self.endpoints.docker_hub_api.clone(),
                target.request,
            )),
            ProviderKind::Quay => Box::new(Quay::new(
                client,
                self.endpoints.quay_api.clone(),
                target.request,
            )),
            ProviderKind::DockerRegistry => {
                let scheme = self.endpoints.scheme_for(&target.hostname);
                Box::new(DockerRegistry::new(
                    client,
                    scheme,
                    target.hostname,
                    target.request,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagpin_core::RegistryRequest;

    fn target(kind: ProviderKind, hostname: &str) -> RegistryTarget {
        RegistryTarget {
            kind,
            hostname: hostname.to_string(),
            request: RegistryRequest::new("team/app", "v1"),
        }
    }

    #[test]
    fn test_factory_builds_matching_backend() {
        let backends = HttpBackends::new(&Settings::default()).unwrap();

        assert_eq!(backends.build(target(ProviderKind::DockerHub, "")).name(), "dockerhub");
        assert_eq!(backends.build(target(ProviderKind::Quay, "")).name(), "quay");
        assert_eq!(
            backends
                .build(target(ProviderKind::DockerRegistry, "registry.example.com"))
                .name(),
            "docker-registry"
        );
    }
}

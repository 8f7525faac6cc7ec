//! Digest resolution
//!
//! Runs one resolution through its stages: validate the source, parse the
//! image reference, classify the provider, dispatch to the backend and report
//! the outcome. The first failing stage ends the resolution.

use crate::classify::{classify, RegistrySelection};
use crate::config::DigestSource;
use crate::error::{Error, Result};
use crate::reference::parse_image;
use crate::registry::{BackendFactory, Registry, RegistryRequest, RegistryTarget};
use tracing::{debug, error, info};

/// Resolves image tags to digests through a backend factory
pub struct Resolver {
    factory: Box<dyn BackendFactory>,
}

impl Resolver {
    /// Create a resolver using `factory` to construct registry backends
    pub fn new(factory: impl BackendFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
        }
    }

    /// Validate, parse and classify a source into a backend target
    pub fn target(&self, source: &DigestSource) -> Result<RegistryTarget> {
        let errors = source.validate();
        if !errors.is_empty() {
            for err in &errors {
                error!("{}", err);
            }
            return Err(Error::validation(errors));
        }

        let (hostname, image) = parse_image(&source.image)?;

        let selection = RegistrySelection::new(image.clone(), hostname, source.registry.clone());
        let kind = classify(&selection)?;

        let request = RegistryRequest::new(image, source.tag.clone())
            .with_token(source.token.clone())
            .with_architecture(source.architecture());

        Ok(kind.target(&selection, request))
    }

    /// Construct the backend serving `source`
    pub fn backend(&self, source: &DigestSource) -> Result<Box<dyn Registry>> {
        let target = self.target(source)?;
        debug!(
            "Dispatching {}:{} to {} backend",
            target.request.image, target.request.tag, target.kind
        );
        Ok(self.factory.build(target))
    }

    /// Resolve the current digest of `source`
    ///
    /// An empty digest means the registry has none for this tag; it is not an error.
    pub async fn resolve(&self, source: &DigestSource) -> Result<String> {
        let registry = self.backend(source)?;

        let digest = registry.digest().await?;

        if digest.is_empty() {
            info!(
                "\u{2717} No digest found for docker image {}:{} on the Docker registry",
                source.image, source.tag
            );
        } else {
            info!(
                "\u{2714} Digest '{}' found for docker image {}:{} available from Docker registry",
                digest, source.image, source.tag
            );
            info!("Remark: Do not forget to add @sha256 after the docker image name");
            info!("Example: {}@sha256:{}", source.image, digest);
        }

        Ok(digest)
    }

    /// Whether the registry publishes a digest for `source`
    pub async fn tag_exists(&self, source: &DigestSource) -> Result<bool> {
        let digest = self.resolve(source).await?;
        Ok(!digest.is_empty())
    }
}

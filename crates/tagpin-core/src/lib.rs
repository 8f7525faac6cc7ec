//! # tagpin-core
//!
//! Core library for tagpin providing:
//! - Image reference parsing into hostname and repository path
//! - Registry provider classification (Docker Hub, Quay, generic registries)
//! - The [`Registry`] backend trait and the [`Resolver`] driving it
//! - Digest source and settings configuration

pub mod classify;
pub mod config;
pub mod error;
pub mod reference;
pub mod registry;
pub mod resolver;

pub use classify::{classify, ProviderKind, RegistrySelection};
pub use config::{DigestSource, Settings, SettingsLoader};
pub use error::{BackendError, Error, Result};
pub use reference::{parse_image, ImageReference};
pub use registry::{BackendFactory, Registry, RegistryRequest, RegistryTarget};
pub use resolver::Resolver;

/// Version of the tagpin-core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

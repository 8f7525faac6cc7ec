//! CLI command implementations

pub mod digest;
pub mod exists;
pub mod version;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tagpin_core::{DigestSource, Resolver, Settings, SettingsLoader};
use tagpin_registry::HttpBackends;
use tracing::debug;

use crate::cli::SourceArgs;

/// Build the digest source from an optional file plus flag overrides
pub fn load_source(args: &SourceArgs) -> Result<DigestSource> {
    let mut source = match &args.file {
        Some(path) => DigestSource::from_yaml_file(path)
            .with_context(|| format!("Failed to load source file {}", path))?,
        None => DigestSource::default(),
    };

    if let Some(image) = &args.image {
        source.image = image.clone();
    }
    if let Some(tag) = &args.tag {
        source.tag = tag.clone();
    }
    if args.token.is_some() {
        source.token = args.token.clone();
    }
    if args.registry.is_some() {
        source.registry = args.registry.clone();
    }
    if args.architecture.is_some() {
        source.architecture = args.architecture.clone();
    }

    Ok(source)
}

/// Load settings and report which file they came from
///
/// The file is `None` when no explicit path was given and the default
/// settings file does not exist.
pub fn load_settings(settings_path: Option<&Utf8Path>) -> Result<(Settings, Option<Utf8PathBuf>)> {
    let loader = SettingsLoader::new();
    let (settings, file) = match settings_path {
        Some(path) => (loader.load_from(path), Some(path.to_path_buf())),
        None => (loader.load(), loader.settings_path().filter(|p| p.exists())),
    };

    let settings = settings.context("Failed to load settings")?;
    Ok((settings, file))
}

/// Build a resolver backed by the HTTP registry backends
pub fn build_resolver(settings: &Settings) -> Result<Resolver> {
    debug!(
        "Using Docker Hub API {} and Quay API {}",
        settings.endpoints.docker_hub_api, settings.endpoints.quay_api
    );

    let backends = HttpBackends::new(settings).context("Failed to set up registry backends")?;
    Ok(Resolver::new(backends))
}

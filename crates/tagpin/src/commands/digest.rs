//! Digest command - resolve the current digest of an image tag

use anyhow::Result;
use camino::Utf8Path;
use serde::Serialize;
use tagpin_core::ImageReference;

use super::{build_resolver, load_settings, load_source};
use crate::cli::DigestArgs;
use crate::output;

/// JSON shape of a resolution
#[derive(Debug, Serialize)]
pub struct DigestReport {
    pub image: String,
    pub tag: String,
    pub digest: Option<String>,
    pub pinned: Option<String>,
}

impl DigestReport {
    pub fn new(image: &str, tag: &str, digest: &str) -> Self {
        let found = !digest.is_empty();
        let pinned = if found {
            ImageReference::parse(image, tag)
                .ok()
                .map(|r| r.pinned(digest))
        } else {
            None
        };

        Self {
            image: image.to_string(),
            tag: tag.to_string(),
            digest: found.then(|| digest.to_string()),
            pinned,
        }
    }
}

pub async fn run(args: DigestArgs, settings_path: Option<&Utf8Path>) -> Result<()> {
    let source = load_source(&args.source)?;
    let (settings, _) = load_settings(settings_path)?;
    let resolver = build_resolver(&settings)?;

    let digest = resolver.resolve(&source).await?;
    let report = DigestReport::new(&source.image, &source.tag, &digest);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::digest(&report);
    }

    Ok(())
}

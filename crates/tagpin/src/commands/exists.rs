//! Exists command - check that an image tag is published

use anyhow::Result;
use camino::Utf8Path;

use super::{build_resolver, load_settings, load_source};
use crate::cli::DigestArgs;
use crate::output;

/// Exit code when the tag has no digest
const NOT_FOUND_EXIT_CODE: i32 = 1;

pub async fn run(args: DigestArgs, settings_path: Option<&Utf8Path>) -> Result<()> {
    let source = load_source(&args.source)?;
    let (settings, _) = load_settings(settings_path)?;
    let resolver = build_resolver(&settings)?;

    let exists = resolver.tag_exists(&source).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "image": source.image,
                "tag": source.tag,
                "exists": exists,
            }))?
        );
    } else {
        output::availability(&source.image, &source.tag, exists);
    }

    if !exists {
        std::process::exit(NOT_FOUND_EXIT_CODE);
    }

    Ok(())
}

//! Terminal rendering of tagpin results
//!
//! Values meant for scripts (a digest, `true` or `false`) go to stdout. Styled
//! context lines go to stderr.

use console::style;

use crate::commands::digest::DigestReport;
use crate::commands::version::VersionReport;

/// Print a resolution: the bare digest, then the pinned reference
pub fn digest(report: &DigestReport) {
    let Some(digest) = &report.digest else {
        not_found(&report.image, &report.tag);
        return;
    };

    println!("{}", digest);
    if let Some(pinned) = &report.pinned {
        eprintln!("{} {}", style("pin").dim(), style(pinned).cyan());
    }
}

/// Print whether a tag is published
pub fn availability(image: &str, tag: &str, exists: bool) {
    println!("{}", exists);
    if exists {
        eprintln!("{} {}:{} is published", style("✔").green().bold(), image, tag);
    } else {
        not_found(image, tag);
    }
}

fn not_found(image: &str, tag: &str) {
    eprintln!(
        "{} No digest found for {}:{}",
        style("✗").red().bold(),
        image,
        tag
    );
}

/// Print the version line and the settings in effect
pub fn version(report: &VersionReport) {
    println!("tagpin {} (core {})", report.version, report.core_version);
    field("Settings", &report.settings_source());
    field("Docker Hub API", &report.endpoints.docker_hub_api);
    field("Quay API", &report.endpoints.quay_api);
    if !report.endpoints.insecure_registries.is_empty() {
        field("Plain HTTP", &report.endpoints.insecure_registries.join(", "));
    }
    field("User agent", &report.user_agent);
    field("Timeout", &format!("{}s", report.http_timeout_secs));
}

fn field(key: &str, value: &str) {
    println!("  {} {}", style(format!("{:<15}", key)).dim(), value);
}

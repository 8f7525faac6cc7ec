//! Image reference parsing
//!
//! Splits references such as `registry.example.com:5000/team/app` into the
//! registry hostname and the repository path. A leading segment is treated as a
//! hostname only when it contains a `.` or `:`, or is exactly `localhost`;
//! otherwise the whole reference is a path on the default hub.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub(crate) static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*(?::[0-9]{1,5})?$",
    )
    .expect("hostname regex is valid")
});

/// Repository path: lowercase components joined by `/`
pub(crate) static REPOSITORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-z0-9]+(?:(?:\.|_|__|-+)[a-z0-9]+)*(?:/[a-z0-9]+(?:(?:\.|_|__|-+)[a-z0-9]+)*)*$",
    )
    .expect("repository regex is valid")
});

pub(crate) static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("tag regex is valid")
});

/// Returns true for a DNS-style host with an optional port
pub fn is_valid_hostname(host: &str) -> bool {
    HOSTNAME_RE.is_match(host)
}

/// Returns true for a repository path such as `team/app`
pub fn is_valid_repository(image: &str) -> bool {
    REPOSITORY_RE.is_match(image)
}

/// Returns true for a tag such as `v1.2.3` or `latest`
pub fn is_valid_tag(tag: &str) -> bool {
    TAG_RE.is_match(tag)
}

/// Returns true when a path segment names a registry host rather than a namespace
pub fn looks_like_hostname(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':') || segment == "localhost"
}

/// Split a raw image reference into `(hostname, image)`
///
/// The hostname is empty when the reference does not carry one.
pub fn parse_image(raw: &str) -> Result<(String, String)> {
    if raw.is_empty() {
        return Err(Error::malformed_reference(raw, "reference is empty"));
    }

    if raw.contains("://") {
        return Err(Error::malformed_reference(
            raw,
            "repository name should not contain '://'",
        ));
    }

    let Some((first, rest)) = raw.split_once('/') else {
        return Ok((String::new(), raw.to_string()));
    };

    if !looks_like_hostname(first) {
        return Ok((String::new(), raw.to_string()));
    }

    if !HOSTNAME_RE.is_match(first) {
        return Err(Error::malformed_reference(
            raw,
            format!("'{}' is not a valid registry hostname", first),
        ));
    }

    if rest.is_empty() {
        return Err(Error::malformed_reference(
            raw,
            "image name is missing after the registry hostname",
        ));
    }

    Ok((first.to_string(), rest.to_string()))
}

/// Canonical `(hostname, image, tag)` triple for one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Registry hostname, empty for the default hub
    pub hostname: String,
    /// Repository path (e.g., "team/app")
    pub image: String,
    /// Tag (e.g., "v1")
    pub tag: String,
}

impl ImageReference {
    /// Parse a raw image string and attach the tag
    pub fn parse(raw: &str, tag: impl Into<String>) -> Result<Self> {
        let (hostname, image) = parse_image(raw)?;
        Ok(Self {
            hostname,
            image,
            tag: tag.into(),
        })
    }

    /// Repository reference without the tag
    pub fn name(&self) -> String {
        if self.hostname.is_empty() {
            self.image.clone()
        } else {
            format!("{}/{}", self.hostname, self.image)
        }
    }

    /// Reference pinned to a digest (algorithm prefix optional in `digest`)
    pub fn pinned(&self, digest: &str) -> String {
        let hex = digest.strip_prefix("sha256:").unwrap_or(digest);
        format!("{}@sha256:{}", self.name(), hex)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name(), self.tag)
    }
}

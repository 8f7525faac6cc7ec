//! Shared HTTP helpers for registry backends

use reqwest::{Response, StatusCode};
use tagpin_core::config::NetworkSettings;
use tagpin_core::BackendError;
use url::Url;

/// Build the HTTP client shared by all backends
pub fn build_client(network: &NetworkSettings) -> Result<reqwest::Client, BackendError> {
    reqwest::Client::builder()
        .user_agent(&network.user_agent)
        .timeout(std::time::Duration::from_secs(network.http_timeout_secs))
        .build()
        .map_err(|e| BackendError::Transport {
            registry: "http-client".to_string(),
            message: format!("Failed to create HTTP client: {}", e),
        })
}

/// Strip the algorithm prefix from a digest
pub fn strip_algorithm(digest: &str) -> String {
    digest
        .strip_prefix("sha256:")
        .unwrap_or(digest)
        .trim()
        .to_string()
}

/// Append path segments and query parameters to a base URL
///
/// Each segment is percent-encoded, so `/`, `?` and `#` inside a segment stay
/// part of it. An empty trailing segment keeps a trailing slash.
pub fn endpoint(
    registry: &str,
    base: &str,
    segments: &[&str],
    params: &[(&str, &str)],
) -> Result<Url, BackendError> {
    let invalid = |reason: String| BackendError::Decode {
        registry: registry.to_string(),
        message: format!("invalid URL '{}': {}", base, reason),
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;

    if !segments.is_empty() {
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
    }

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url)
}

/// Map a request failure to a transport error
pub fn transport_error(registry: &str, url: &Url, err: reqwest::Error) -> BackendError {
    BackendError::Transport {
        registry: registry.to_string(),
        message: format!("{}: {}", url, err),
    }
}

/// Map a response decoding failure to a decode error
pub fn decode_error(registry: &str, err: impl std::fmt::Display) -> BackendError {
    BackendError::Decode {
        registry: registry.to_string(),
        message: err.to_string(),
    }
}

/// Convert a non-success response into a backend error
pub async fn status_error(
    registry: &str,
    image: &str,
    url: &Url,
    response: Response,
) -> BackendError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return BackendError::Unauthorized {
            registry: registry.to_string(),
            image: image.to_string(),
            status: status.as_u16(),
        };
    }

    let body = response.text().await.unwrap_or_default();
    BackendError::Status {
        registry: registry.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        body: if body.is_empty() {
            "(no response body)".to_string()
        } else {
            body
        },
    }
}

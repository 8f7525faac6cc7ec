//! Registry authentication challenges
//!
//! OCI distribution registries answer `GET /v2/` with `401` and a
//! `WWW-Authenticate` header naming how to authenticate. For bearer challenges
//! a pull token is requested from the realm, either anonymously or with the
//! caller's credential.

use crate::http::{decode_error, endpoint, status_error, transport_error};
use serde::Deserialize;
use std::collections::HashMap;
use tagpin_core::BackendError;
use tracing::debug;

/// Parsed `WWW-Authenticate` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
    Bearer {
        realm: String,
        service: Option<String>,
    },
    Basic,
}

impl Challenge {
    /// Parse a `WWW-Authenticate` header value
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, rest) = header.split_once(' ').unwrap_or((header, ""));

        if scheme.eq_ignore_ascii_case("basic") {
            return Some(Challenge::Basic);
        }
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }

        let mut params = parse_params(rest);
        let realm = params.remove("realm")?;
        Some(Challenge::Bearer {
            realm,
            service: params.remove("service"),
        })
    }
}

/// Split `key="value",key2=value2` pairs, honouring quoted commas
fn parse_params(input: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut in_quotes = false;

    let mut flush = |key: &mut String, value: &mut String| {
        let k = key.trim().to_ascii_lowercase();
        if !k.is_empty() {
            params.insert(k, value.trim().to_string());
        }
        key.clear();
        value.clear();
    };

    for c in input.chars() {
        match c {
            '"' if in_value => in_quotes = !in_quotes,
            '=' if !in_value => in_value = true,
            ',' if !in_quotes => {
                flush(&mut key, &mut value);
                in_value = false;
            }
            _ if in_value => value.push(c),
            _ => key.push(c),
        }
    }
    flush(&mut key, &mut value);

    params
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// Request a pull token for `repository` from a bearer realm
pub async fn fetch_bearer_token(
    client: &reqwest::Client,
    registry: &str,
    realm: &str,
    service: Option<&str>,
    repository: &str,
    credential: Option<&str>,
) -> Result<String, BackendError> {
    let scope = format!("repository:{}:pull", repository);
    let mut params = vec![("scope", scope.as_str())];
    if let Some(service) = service {
        params.push(("service", service));
    }
    let url = endpoint(registry, realm, &[], &params)?;

    let mut builder = client.get(url.clone());
    if let Some(credential) = credential {
        debug!("Requesting authenticated pull token from {}", url);
        builder = builder.basic_auth("token", Some(credential));
    } else {
        debug!("Requesting anonymous pull token from {}", url);
    }

    let response = builder
        .send()
        .await
        .map_err(|e| transport_error(registry, &url, e))?;

    if !response.status().is_success() {
        return Err(status_error(registry, repository, &url, response).await);
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| decode_error(registry, e))?;

    body.token
        .or(body.access_token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| decode_error(registry, "token response did not contain a token"))
}

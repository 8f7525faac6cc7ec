//! Error types for tagpin-core

use thiserror::Error;

/// Result type alias using tagpin-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving an image digest
#[derive(Error, Debug)]
pub enum Error {
    /// One or more fields of the digest source are invalid
    #[error("error found in docker parameters:\n{errors}")]
    Validation { errors: String },

    /// Image reference could not be split into hostname and image
    #[error("Malformed image reference '{reference}': {reason}")]
    MalformedReference { reference: String, reason: String },

    /// None of the classification rules matched
    #[error("unknown docker registry api")]
    UnknownRegistryProvider,

    /// The image hostname and the configured registry point at different hosts
    #[error("Image hostname '{hostname}' does not match configured registry '{registry}'")]
    InconsistentRegistry { hostname: String, registry: String },

    /// Neither the image nor the configuration names a registry host
    #[error("No registry hostname found for image '{image}'")]
    MissingRegistry { image: String },

    /// Registry backend failure, propagated unchanged
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Invalid settings value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error from a list of messages
    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation {
            errors: errors.join("\n"),
        }
    }

    /// Create a malformed reference error
    pub fn malformed_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create an inconsistent registry error
    pub fn inconsistent_registry(hostname: impl Into<String>, registry: impl Into<String>) -> Self {
        Self::InconsistentRegistry {
            hostname: hostname.into(),
            registry: registry.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Failures reported by a registry backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Registry rejected the credentials (or demanded some)
    #[error("unauthorized: {registry} returned {status} for {image}")]
    Unauthorized {
        registry: String,
        image: String,
        status: u16,
    },

    /// Registry answered with an unexpected status code
    #[error("{registry} returned {status} for {url}: {body}")]
    Status {
        registry: String,
        url: String,
        status: u16,
        body: String,
    },

    /// Request never completed
    #[error("failed to query {registry}: {message}")]
    Transport { registry: String, message: String },

    /// Response body or headers could not be interpreted
    #[error("unexpected response from {registry}: {message}")]
    Decode { registry: String, message: String },

    /// Free-form failure, used by stub and third-party backends
    #[error("{0}")]
    Other(String),
}

//! Configuration loading and management

mod settings;
mod source;

pub use settings::{EndpointSettings, NetworkSettings, Settings, SettingsLoader, SETTINGS_FILE};
pub use source::{DigestSource, DEFAULT_ARCHITECTURE};

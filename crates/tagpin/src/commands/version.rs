//! Version command - build version and the settings in effect

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tagpin_core::config::EndpointSettings;
use tagpin_core::Settings;

use super::load_settings;
use crate::cli::VersionArgs;
use crate::output;

/// Version and the configuration a resolution would run with
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VersionReport {
    pub version: String,
    pub core_version: String,
    /// Settings file read, `None` when running on built-in defaults
    pub settings_file: Option<String>,
    pub user_agent: String,
    pub http_timeout_secs: u64,
    pub endpoints: EndpointSettings,
}

impl VersionReport {
    pub fn new(settings: &Settings, settings_file: Option<Utf8PathBuf>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            core_version: tagpin_core::VERSION.to_string(),
            settings_file: settings_file.map(Utf8PathBuf::into_string),
            user_agent: settings.network.user_agent.clone(),
            http_timeout_secs: settings.network.http_timeout_secs,
            endpoints: settings.endpoints.clone(),
        }
    }

    /// Where the settings came from, for display
    pub fn settings_source(&self) -> String {
        self.settings_file
            .clone()
            .unwrap_or_else(|| "built-in defaults".to_string())
    }
}

pub fn run(args: VersionArgs, settings_path: Option<&Utf8Path>) -> Result<()> {
    let (settings, settings_file) = load_settings(settings_path)?;
    let report = VersionReport::new(&settings, settings_file);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::version(&report);
    }

    Ok(())
}

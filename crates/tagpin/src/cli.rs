//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Tagpin - resolve container image tags to digests
#[derive(Parser, Debug)]
#[command(name = "tagpin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to settings file (default: ~/.tagpin/config.yaml)
    #[arg(long, global = true)]
    pub settings: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Resolve the digest of an image tag
    Digest(DigestArgs),

    /// Check whether an image tag has a published digest
    Exists(DigestArgs),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Digest and exists commands
#[derive(Args, Debug)]
pub struct DigestArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Image reference (e.g., nginx, quay.io/coreos/etcd, registry.lan:5000/team/app)
    #[arg(short, long)]
    pub image: Option<String>,

    /// Tag to resolve
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Registry token
    #[arg(long, env = "TAGPIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Registry hostname for images without one
    #[arg(long)]
    pub registry: Option<String>,

    /// Platform architecture (Docker Hub only)
    #[arg(long = "arch")]
    pub architecture: Option<String>,

    /// YAML file describing the source; flags override its values
    #[arg(short, long)]
    pub file: Option<Utf8PathBuf>,
}

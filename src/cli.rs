//! CLI argument parsing. Environment variables provided by CI are read
//! here and nowhere else.
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::{
    command::{package::PackageRequest, publish::PublishRequest},
    forge::config::RemoteConfig,
    result::Result,
};

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Log destructive and publishing steps instead of running them.
    pub dry_run: bool,

    #[arg(long, global = true)]
    /// Configuration file. Defaults to pigcel-release.toml when present.
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Release pipeline subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the macOS disk image from the prepared application bundle.
    Package(PackageArgs),

    /// Create the release for a tag if needed and upload the disk image.
    Publish(PublishArgs),
}

#[derive(ClapArgs, Debug)]
pub struct PackageArgs {
    #[arg(long, env = "GITHUB_REF")]
    /// Git reference that triggered the build (refs/heads/* or refs/tags/*).
    pub git_ref: String,

    #[arg(long, default_value = "dist")]
    /// Directory containing the application bundle.
    pub source_dir: PathBuf,

    #[arg(long, default_value = ".")]
    /// Directory the disk image is written to.
    pub output_dir: PathBuf,
}

#[derive(ClapArgs, Debug)]
pub struct PublishArgs {
    #[arg(long, env = "GITHUB_REF")]
    /// Git tag reference to publish (refs/tags/*).
    pub git_ref: String,

    #[arg(long, env = "GITHUB_SERVER_URL")]
    /// Base URL of the hosting server.
    pub server_url: String,

    #[arg(long, env = "GITHUB_REPOSITORY")]
    /// Repository identifier (owner/name).
    pub repository: String,

    #[arg(long, default_value = "CHANGELOG.md")]
    /// File used verbatim as release notes.
    pub changelog: PathBuf,

    #[arg(long, default_value = ".")]
    /// Directory holding the disk image produced by `package`.
    pub artifact_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    /// Replace an already uploaded asset with the same name.
    pub clobber: bool,
}

impl PackageArgs {
    pub fn to_request(&self, dry_run: bool) -> PackageRequest {
        PackageRequest {
            git_ref: self.git_ref.clone(),
            source_dir: self.source_dir.clone(),
            output_dir: self.output_dir.clone(),
            dry_run,
        }
    }
}

impl PublishArgs {
    /// Configure remote repository connection from CLI arguments.
    pub fn remote_config(&self, dry_run: bool) -> Result<RemoteConfig> {
        RemoteConfig::new(&self.server_url, &self.repository, dry_run)
    }

    pub fn to_request(&self) -> PublishRequest {
        PublishRequest {
            git_ref: self.git_ref.clone(),
            changelog: self.changelog.clone(),
            artifact_dir: self.artifact_dir.clone(),
            clobber: self.clobber,
        }
    }
}

//! Configuration loading and parsing for `pigcel-release.toml` files.
//!
//! Every field has a default, so the file is optional and may override only
//! the settings it names.
use log::*;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{error::PigcelReleaseError, result::Result};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "pigcel-release.toml";
/// Default pause after unmounting a stale volume.
pub const DEFAULT_SETTLE_DELAY_SECS: u64 = 2;
/// Text `gh release view` prints when no release exists for a tag.
pub const DEFAULT_NOT_FOUND_MARKER: &str = "release not found";

/// Finder window layout of the disk image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DmgLayout {
    /// Volume name shown in Finder; also names the mount point.
    pub volume_name: String,
    /// Background image rendered behind the icons.
    pub background: PathBuf,
    /// Name of the application bundle inside the source directory.
    pub app_name: String,
    pub window_pos: (u32, u32),
    pub window_size: (u32, u32),
    pub icon_size: u32,
    /// Position of the application icon.
    pub icon_pos: (u32, u32),
    /// Position of the `/Applications` drop target.
    pub app_drop_link: (u32, u32),
}

impl Default for DmgLayout {
    fn default() -> Self {
        Self {
            volume_name: "pigcel".into(),
            background: PathBuf::from("images/dmg_background.png"),
            app_name: "pigcel.app".into(),
            window_pos: (200, 120),
            window_size: (800, 400),
            icon_size: 100,
            icon_pos: (200, 190),
            app_drop_link: (600, 185),
        }
    }
}

impl DmgLayout {
    /// Where macOS mounts the volume.
    pub fn mount_point(&self) -> PathBuf {
        Path::new("/Volumes").join(&self.volume_name)
    }
}

/// Settings for talking to the release host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Release CLI executable.
    pub program: String,
    /// Marker in the view output meaning the release does not exist.
    pub not_found_marker: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            program: "gh".into(),
            not_found_marker: DEFAULT_NOT_FOUND_MARKER.into(),
        }
    }
}

/// Root configuration structure for `pigcel-release.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds to wait after the forced unmount.
    pub settle_delay_secs: u64,
    /// Disk-image authoring executable.
    pub dmg_tool: String,
    /// Volume utility used to unmount stale images.
    pub volume_tool: String,
    pub dmg: DmgLayout,
    pub release: ReleaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay_secs: DEFAULT_SETTLE_DELAY_SECS,
            dmg_tool: "create-dmg".into(),
            volume_tool: "hdiutil".into(),
            dmg: DmgLayout::default(),
            release: ReleaseConfig::default(),
        }
    }
}

impl Config {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(PigcelReleaseError::from)?;
        Ok(config)
    }

    /// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] in
    /// the working directory when no path is given. A missing default file
    /// yields the defaults; a missing explicit file is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            debug!("no {} found: using defaults", path.display());
            return Ok(Config::default());
        }

        if !path.exists() {
            return Err(PigcelReleaseError::invalid_config(format!(
                "config file does not exist: {}",
                path.display()
            ))
            .into());
        }

        info!("loading configuration from {}", path.display());
        let content = tokio::fs::read_to_string(&path).await?;
        Self::parse(&content)
    }
}

//! Naming of the distributable disk image shared by `package` and `publish`.

/// Application name used in the artifact file name.
pub const APP_NAME: &str = "pigcel";
/// Target platform label.
pub const PLATFORM: &str = "macOS";
/// Target architecture label.
pub const ARCH: &str = "amd64";
/// Glob matching disk images left over from earlier builds.
pub const STALE_IMAGE_PATTERN: &str = "*.dmg";

/// File name of the disk image for `version`,
/// e.g. `pigcel-v1.2.3-macOS-amd64.dmg`.
pub fn dmg_file_name(version: &str) -> String {
    format!("{APP_NAME}-{version}-{PLATFORM}-{ARCH}.dmg")
}

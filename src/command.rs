//! Command execution for pigcel-release.
//!
//! The two commands are run by CI one after the other and share nothing but
//! the disk-image naming in [`crate::artifact`]:
//!
//! 1. **package**: derive the version from the git reference, remove stale
//!    disk images, force-unmount the previous volume, wait for it to settle
//!    and author a new disk image with `create-dmg`.
//! 2. **publish**: derive the tag from the git reference, create the release
//!    if the host does not have one yet, and upload the disk image.
//!
//! Both accept `--dry-run`, which keeps read-only steps and logs the rest.

/// Disk-image packaging.
pub mod package;

/// Release creation and asset upload.
pub mod publish;

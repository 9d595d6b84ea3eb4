//! Result type used throughout pigcel-release.
//!
//! Errors are reported through `color-eyre`, so any domain error from
//! [`crate::error::PigcelReleaseError`] can be lifted with `?` and enriched
//! with `.wrap_err()` as it propagates.
//!
//! ```rust,ignore
//! use color_eyre::eyre::Context;
//! use crate::result::Result;
//!
//! async fn read_notes(path: &Path) -> Result<String> {
//!     let notes = tokio::fs::read_to_string(path)
//!         .await
//!         .wrap_err("failed to read release notes")?;
//!     Ok(notes)
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout pigcel-release.
pub type Result<T> = EyreResult<T>;

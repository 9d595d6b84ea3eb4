//! Interface to the platform hosting the repository's releases.
//!
//! Release lookups, creation and asset uploads go through the [`traits::Forge`]
//! trait so the publish workflow can be exercised without a live host.

/// Repository location and connection settings.
pub mod config;

/// Release host backed by the `gh` command-line client.
pub mod gh;

/// Dry-run aware wrapper around a forge implementation.
pub mod manager;

/// Request types passed to forge implementations.
pub mod request;

/// Common trait for release host abstraction.
pub mod traits;

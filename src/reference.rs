//! Parsing of the CI-provided git reference that triggered a build.
use std::fmt;

use crate::error::PigcelReleaseError;

/// Prefix of branch references, e.g. `refs/heads/main`.
pub const BRANCH_PREFIX: &str = "refs/heads/";
/// Prefix of tag references, e.g. `refs/tags/v1.2.3`.
pub const TAG_PREFIX: &str = "refs/tags/";

/// A git reference classified by its prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitRef {
    Branch(String),
    Tag(String),
    /// Anything that is neither a branch nor a tag; holds the raw input.
    Invalid(String),
}

impl GitRef {
    /// Classify a raw reference string. The recognised prefix is removed
    /// exactly once.
    pub fn parse(reference: &str) -> Self {
        if let Some(name) = reference.strip_prefix(BRANCH_PREFIX) {
            return GitRef::Branch(name.to_string());
        }

        if let Some(name) = reference.strip_prefix(TAG_PREFIX) {
            return GitRef::Tag(name.to_string());
        }

        GitRef::Invalid(reference.to_string())
    }

    /// Version string used to name the disk image. Branch builds are
    /// versioned by branch name, tag builds by tag name.
    pub fn version(&self) -> Result<&str, PigcelReleaseError> {
        match self {
            GitRef::Branch(name) | GitRef::Tag(name) => Ok(name),
            GitRef::Invalid(raw) => {
                Err(PigcelReleaseError::InvalidReference(raw.clone()))
            }
        }
    }

    /// Tag name; only tag references can be published.
    pub fn tag(&self) -> Result<&str, PigcelReleaseError> {
        match self {
            GitRef::Tag(name) => Ok(name),
            other => Err(PigcelReleaseError::NotATag(other.to_string())),
        }
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitRef::Branch(name) => write!(f, "{BRANCH_PREFIX}{name}"),
            GitRef::Tag(name) => write!(f, "{TAG_PREFIX}{name}"),
            GitRef::Invalid(raw) => write!(f, "{raw}"),
        }
    }
}

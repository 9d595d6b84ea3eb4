//! Error types for pigcel-release with explicit exit status mapping.

use color_eyre::Report;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status used for malformed input, configuration and missing files.
pub const INPUT_ERROR_EXIT_CODE: i32 = 1;

/// Main error type for pigcel-release operations.
#[derive(Error, Debug)]
pub enum PigcelReleaseError {
    // Reference errors
    #[error(
        "unsupported git reference: {0:?} (expected refs/heads/* or refs/tags/*)"
    )]
    InvalidReference(String),

    #[error("git reference is not a tag: {0:?}")]
    NotATag(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    // Filesystem errors
    #[error("disk image not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("failed to read changelog {}: {source}", path.display())]
    ChangelogUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    // External tool errors
    #[error("{tool} exited with status {code}: {output}")]
    ToolFailed {
        tool: String,
        code: i32,
        /// Everything the tool printed on stdout and stderr.
        output: String,
    },

    #[error(
        "release {tag} was created but publishing did not complete: {reason}"
    )]
    PartialRelease { tag: String, code: i32, reason: String },

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),
}

impl PigcelReleaseError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an error for an external tool that exited unsuccessfully
    pub fn tool_failed(
        tool: impl Into<String>,
        code: i32,
        output: impl Into<String>,
    ) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            code,
            output: output.into(),
        }
    }

    /// Process exit status this error should produce.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed { code, .. }
            | Self::PartialRelease { code, .. } => {
                if *code == 0 {
                    INPUT_ERROR_EXIT_CODE
                } else {
                    *code
                }
            }
            _ => INPUT_ERROR_EXIT_CODE,
        }
    }
}

/// Resolves the exit status for a report by looking for a
/// [`PigcelReleaseError`] anywhere in its chain.
pub fn exit_code_for(report: &Report) -> i32 {
    report
        .chain()
        .find_map(|e| e.downcast_ref::<PigcelReleaseError>())
        .map(PigcelReleaseError::exit_code)
        .unwrap_or(INPUT_ERROR_EXIT_CODE)
}

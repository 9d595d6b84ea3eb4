//! Execution of external tools (`create-dmg`, `hdiutil`, `gh`).
use async_trait::async_trait;
use color_eyre::eyre::Context;
use log::*;
use std::fmt;

#[cfg(test)]
use mockall::automock;

use crate::{error::PigcelReleaseError, result::Result};

/// Arguments longer than this, or spanning several lines, are logged by
/// size only.
const MAX_DISPLAYED_ARG_LEN: usize = 80;

/// A single external program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.args.iter() {
            if arg.len() > MAX_DISPLAYED_ARG_LEN || arg.contains('\n') {
                write!(f, " <{} bytes>", arg.len())?;
            } else if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished external program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit status suitable for propagating; signals map to 1.
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }

    /// Non-empty stdout and stderr, trimmed and joined by a newline.
    pub fn combined(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` to completion. Failing to start the program is an
    /// error; a non-zero exit status is not.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Runs programs on the host through tokio's process API.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        info!("running: {invocation}");

        let output = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .await
            .wrap_err_with(|| {
                format!("failed to execute {}", invocation.program)
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.stdout.is_empty() {
            debug!(
                "{} stdout:\n{}",
                invocation.program,
                result.stdout.trim_end()
            );
        }
        if !result.stderr.is_empty() {
            debug!(
                "{} stderr:\n{}",
                invocation.program,
                result.stderr.trim_end()
            );
        }

        Ok(result)
    }
}

/// Turn an unsuccessful exit into [`PigcelReleaseError::ToolFailed`]
/// carrying everything the tool printed.
pub fn ensure_success(
    tool: &str,
    output: CommandOutput,
) -> std::result::Result<CommandOutput, PigcelReleaseError> {
    if output.success() {
        return Ok(output);
    }

    Err(PigcelReleaseError::tool_failed(
        tool,
        output.exit_code(),
        output.combined(),
    ))
}

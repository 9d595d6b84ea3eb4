//! Release host implemented on top of the `gh` command-line client.
use async_trait::async_trait;
use color_eyre::eyre::OptionExt;
use log::*;
use std::sync::Arc;

use crate::{
    config::ReleaseConfig,
    error::PigcelReleaseError,
    forge::{
        config::RemoteConfig,
        request::{CreateReleaseRequest, UploadAssetRequest},
        traits::Forge,
    },
    result::Result,
    runner::{CommandRunner, Invocation, ensure_success},
};

/// Talks to the release host by shelling out to `gh release ...`.
pub struct GhCli {
    config: RemoteConfig,
    program: String,
    not_found_marker: String,
    runner: Arc<dyn CommandRunner>,
}

impl GhCli {
    pub fn new(
        config: RemoteConfig,
        release: &ReleaseConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            program: release.program.clone(),
            not_found_marker: release.not_found_marker.clone(),
            runner,
        }
    }

    fn release_command(&self, action: &str, tag: &str) -> Invocation {
        Invocation::new(&self.program)
            .args(["release", action, tag])
            .args(["--repo", self.config.url.as_str()])
    }
}

#[async_trait]
impl Forge for GhCli {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn release_exists(&self, tag: &str) -> Result<bool> {
        let output = self.runner.run(&self.release_command("view", tag)).await?;

        if output.success() {
            debug!("found existing release for tag: {tag}");
            return Ok(true);
        }

        if output.combined().contains(&self.not_found_marker) {
            debug!("no release found for tag: {tag}");
            return Ok(false);
        }

        // neither found nor reported missing: the query itself failed
        Err(PigcelReleaseError::tool_failed(
            &self.program,
            output.exit_code(),
            output.combined(),
        )
        .into())
    }

    async fn create_release(&self, req: CreateReleaseRequest) -> Result<()> {
        let invocation = self
            .release_command("create", &req.tag)
            .args(["--title", req.title.as_str()])
            .args(["--notes", req.notes.as_str()]);

        let output = self.runner.run(&invocation).await?;
        ensure_success(&self.program, output)?;

        Ok(())
    }

    async fn upload_asset(&self, req: UploadAssetRequest) -> Result<()> {
        let path = req
            .path
            .to_str()
            .ok_or_eyre("asset path contains non-UTF8 characters")?;

        let mut invocation = self.release_command("upload", &req.tag).arg(path);

        if req.clobber {
            invocation = invocation.arg("--clobber");
        }

        let output = self.runner.run(&invocation).await?;
        ensure_success(&self.program, output)?;

        Ok(())
    }
}

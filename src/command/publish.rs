//! Release publication command implementation.
use log::*;
use std::path::{Path, PathBuf};

use crate::{
    artifact::dmg_file_name,
    error::{PigcelReleaseError, exit_code_for},
    forge::{
        manager::ForgeManager,
        request::{CreateReleaseRequest, UploadAssetRequest},
    },
    reference::GitRef,
    result::Result,
};

/// Inputs of a single `publish` run.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Raw CI reference; must be a tag.
    pub git_ref: String,
    /// File whose contents become the release notes.
    pub changelog: PathBuf,
    /// Directory holding the disk image produced by `package`.
    pub artifact_dir: PathBuf,
    /// Replace an asset of the same name already attached to the release.
    pub clobber: bool,
}

/// What a successful publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub tag: String,
    /// False when the release already existed.
    pub created: bool,
    pub asset: PathBuf,
}

/// Execute publish command: make sure a release exists for the tag and
/// attach the disk image to it.
pub async fn execute(
    forge_manager: &ForgeManager,
    req: &PublishRequest,
) -> Result<PublishOutcome> {
    let git_ref = GitRef::parse(&req.git_ref);
    let tag = git_ref.tag()?.to_string();

    let asset = req.artifact_dir.join(dmg_file_name(&tag));

    if !asset.is_file() {
        return Err(PigcelReleaseError::ArtifactMissing(asset).into());
    }

    let remote = forge_manager.remote_config();
    info!(
        "publishing {} to {} for tag {tag}",
        asset.display(),
        remote.repository
    );
    debug!("release repository url: {}", remote.url);

    let created = if forge_manager.release_exists(&tag).await? {
        info!("release {tag} already exists: skipping creation");
        false
    } else {
        let notes = read_notes(&req.changelog).await?;

        info!("creating release: tag: {tag}");

        forge_manager
            .create_release(CreateReleaseRequest {
                tag: tag.clone(),
                title: tag.clone(),
                notes,
            })
            .await?;

        true
    };

    info!("uploading asset: {}", asset.display());

    let upload = forge_manager
        .upload_asset(UploadAssetRequest {
            tag: tag.clone(),
            path: asset.clone(),
            clobber: req.clobber,
        })
        .await;

    if let Err(err) = upload {
        if !created {
            return Err(err);
        }

        error!("release {tag} was created but the asset upload failed");

        return Err(PigcelReleaseError::PartialRelease {
            tag,
            code: exit_code_for(&err),
            reason: format!("{err:#}"),
        }
        .into());
    }

    info!("published {} to release {tag}", asset.display());

    Ok(PublishOutcome {
        tag,
        created,
        asset,
    })
}

/// Read the changelog verbatim for use as release notes.
async fn read_notes(path: &Path) -> Result<String> {
    let notes = tokio::fs::read_to_string(path).await.map_err(|source| {
        PigcelReleaseError::ChangelogUnreadable {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(notes)
}

//! Manager that wraps forge implementations
use log::*;

use crate::{
    forge::{
        config::RemoteConfig,
        request::{CreateReleaseRequest, UploadAssetRequest},
        traits::Forge,
    },
    result::Result,
};

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn remote_config(&self) -> RemoteConfig {
        self.remote_config.clone()
    }

    pub async fn release_exists(&self, tag: &str) -> Result<bool> {
        debug!(
            "looking up release for tag {tag} in {}",
            self.remote_config.url
        );
        self.forge.release_exists(tag).await
    }

    pub async fn create_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<()> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create release: req: {:#?}", req);
            return Ok(());
        }

        self.forge.create_release(req).await
    }

    pub async fn upload_asset(&self, req: UploadAssetRequest) -> Result<()> {
        if self.remote_config.dry_run {
            warn!("dry_run: would upload asset: req: {:#?}", req);
            return Ok(());
        }

        self.forge.upload_asset(req).await
    }
}

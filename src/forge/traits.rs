//! Traits related to release hosting platforms
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    forge::{
        config::RemoteConfig,
        request::{CreateReleaseRequest, UploadAssetRequest},
    },
    result::Result,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;
    /// Whether a release is already published for `tag`.
    async fn release_exists(&self, tag: &str) -> Result<bool>;
    async fn create_release(&self, req: CreateReleaseRequest) -> Result<()>;
    async fn upload_asset(&self, req: UploadAssetRequest) -> Result<()>;
}

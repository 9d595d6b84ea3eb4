use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a release for an existing tag.
pub struct CreateReleaseRequest {
    pub tag: String,
    pub title: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to attach a file to a release.
pub struct UploadAssetRequest {
    pub tag: String,
    pub path: PathBuf,
    /// Replace an existing asset with the same name.
    pub clobber: bool,
}

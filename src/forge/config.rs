//! Configuration for the release-hosting repository.
use url::Url;

use crate::{error::PigcelReleaseError, result::Result};

/// Remote repository the release is published to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Repository identifier in `owner/name` form.
    pub repository: String,
    /// Full repository URL handed to the release CLI.
    pub url: String,
    /// Log mutating operations instead of performing them.
    pub dry_run: bool,
}

impl RemoteConfig {
    pub fn new(
        server_url: &str,
        repository: &str,
        dry_run: bool,
    ) -> Result<Self> {
        let url = repository_url(server_url, repository)?;

        Ok(Self {
            repository: repository.trim().trim_matches('/').to_string(),
            url,
            dry_run,
        })
    }
}

/// Join the CI server URL and repository identifier into the repository URL.
pub fn repository_url(server_url: &str, repository: &str) -> Result<String> {
    let server = server_url.trim().trim_end_matches('/');
    let repository = repository.trim().trim_matches('/');

    if server.is_empty() {
        return Err(
            PigcelReleaseError::invalid_config("server url is empty").into()
        );
    }

    let parsed = Url::parse(server).map_err(PigcelReleaseError::from)?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(PigcelReleaseError::invalid_config(format!(
            "only http and https server urls are supported: {server}"
        ))
        .into());
    }

    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {}
        _ => {
            return Err(PigcelReleaseError::invalid_config(format!(
                "repository must be in owner/name form: {repository:?}"
            ))
            .into());
        }
    }

    Ok(format!("{server}/{repository}"))
}

//! Common test helper functions shared across test modules.
use crate::forge::config::RemoteConfig;

/// Creates a test RemoteConfig pointing at `https://example.com/org/pigcel`.
///
/// # Example
/// ```ignore
/// let config = create_test_remote_config();
/// ```
pub fn create_test_remote_config() -> RemoteConfig {
    RemoteConfig {
        repository: "org/pigcel".to_string(),
        url: "https://example.com/org/pigcel".to_string(),
        dry_run: false,
    }
}

//! Common test utilities

use std::path::Path;
use std::sync::Arc;

use folio_daemon::media::{LocalMediaStore, MediaStorage};
use folio_daemon::server::AppContext;
use folio_daemon::store::{DocumentStore, JsonFileStore};
use folio_daemon::AppConfig;
use tempfile::TempDir;

#[allow(dead_code)] // Referenced by a subset of the test binaries
pub const TEST_CREDENTIAL: &str = "test-secret";

/// Create a temporary data directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Build an application context over a file-backed store in `data_dir`
pub fn test_context(data_dir: &Path) -> Arc<AppContext> {
    let mut config = AppConfig::with_data_dir(data_dir.to_path_buf());
    config.auth.admin_token = Some(TEST_CREDENTIAL.to_string());
    config.auth.admin_email = Some("admin@example.com".to_string());

    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(data_dir));
    let media: Arc<dyn MediaStorage> =
        Arc::new(LocalMediaStore::new(&data_dir.join("media"), "/media"));
    Arc::new(AppContext::new(config, store, media))
}

/// Sign in with the test credential and return the session token
#[allow(dead_code)] // Test utility shared across integration test binaries
pub async fn sign_in(ctx: &AppContext) -> String {
    let (token, _claims) = ctx
        .sessions
        .sign_in(TEST_CREDENTIAL)
        .await
        .expect("Test credential should sign in");
    token
}

use crate::config::AppConfig;
use std::path::Path;
use tempfile::TempDir;

pub const TEST_ADMIN_PASSWORD: &str = "gala-admin";
pub const TEST_SECRET_KEY: &str = "gala-report-key";
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Creates a unique temporary directory for avatar uploads. The directory is
/// cleaned up when the returned `TempDir` is dropped.
///
/// Keep the returned `TempDir` in scope for as long as you need the files.
pub fn setup_test_storage_root() -> TempDir {
    TempDir::new().expect("failed to create tempdir")
}

/// Configuration for tests: in-memory database, known secrets, avatars
/// stored under `avatar_root`, email disabled.
pub fn test_config(avatar_root: &Path) -> AppConfig {
    let abs = avatar_root
        .canonicalize()
        .unwrap_or_else(|_| avatar_root.to_path_buf());

    AppConfig {
        env: "test".into(),
        project_name: "gala-checkin-test".into(),
        log_level: "api=debug".into(),
        log_file: "test.log".into(),
        log_to_stdout: false,
        database_path: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: TEST_JWT_SECRET.into(),
        jwt_duration_minutes: 24 * 60,
        admin_password: TEST_ADMIN_PASSWORD.into(),
        secret_key: Some(TEST_SECRET_KEY.into()),
        avatar_storage_root: abs.to_string_lossy().into_owned(),
        max_avatar_bytes: 64 * 1024,
        max_report_email_bytes: 8 * 1024 * 1024,
        event_utc_offset_minutes: 0,
        smtp_host: "localhost".into(),
        smtp_port: 2525,
        smtp_username: String::new(),
        smtp_password: String::new(),
        email_from_name: "Gala Reports".into(),
        email_from_address: "reports@example.com".into(),
    }
}

pub mod models;
pub mod reports;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection, DbErr};
use util::config::AppConfig;

/// Opens the configured database.
///
/// `database_path` may be a full DSN or a plain SQLite file path; for a file
/// path the parent directory is created and the file opened read-write-create.
pub async fn connect(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    // SQLite won't create intermediate dirs.
    if let Some(parent) = config.sqlite_file_path().and_then(|p| p.parent()) {
        let _ = std::fs::create_dir_all(parent);
    }

    let url = config.database_url();
    tracing::info!(url = %url, "connecting to database");
    Database::connect(&url).await
}

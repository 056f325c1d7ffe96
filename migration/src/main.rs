use std::{fs, path::Path, process};
use util::config::AppConfig;

mod runner;

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(&config);
            remove_avatar_storage(&config.avatar_storage_root);
        }
        Some("fresh") => {
            remove_db_file(&config);
            remove_avatar_storage(&config.avatar_storage_root);
            migrate(&config).await;
        }
        _ => migrate(&config).await,
    }
}

async fn migrate(config: &AppConfig) {
    if let Some(path) = config.sqlite_file_path() {
        create_db_dir(path);
    }
    let url = config.database_url();

    let db = match sea_orm::Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("DB connection failed: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = runner::run_pending_migrations(&db).await {
        eprintln!("Migration failed: {e}");
        process::exit(1);
    }
}

fn remove_db_file(config: &AppConfig) {
    let Some(db_path) = config.sqlite_file_path() else {
        println!("DATABASE_PATH is a connection URL; nothing to delete");
        return;
    };
    if db_path.exists() {
        match fs::remove_file(db_path) {
            Ok(()) => println!("Deleted DB: {}", db_path.display()),
            Err(e) => eprintln!("Failed to delete DB {}: {e}", db_path.display()),
        }
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn remove_avatar_storage(root: &str) {
    let avatar_path = Path::new(root);
    if avatar_path.exists() {
        match fs::remove_dir_all(avatar_path) {
            Ok(()) => println!("Deleted avatars: {}", avatar_path.display()),
            Err(e) => eprintln!("Failed to delete avatars {}: {e}", avatar_path.display()),
        }
    } else {
        println!("Avatar storage does not exist: {}", avatar_path.display());
    }
}

fn create_db_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Failed to create DB directory: {e}");
        }
    }
}

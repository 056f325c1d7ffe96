use colored::*;
use futures::FutureExt;
use migration::Migrator;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Applies every pending migration, printing one dotted status line each.
///
/// Already-applied migrations are skipped so running twice is harmless.
pub async fn run_pending_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let applied: Vec<String> = Migrator::get_applied_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    println!("Running migrations...");
    for migration in Migrator::migrations() {
        if applied.iter().any(|name| name == migration.name()) {
            continue;
        }
        run_migration(db, migration.name()).await?;
    }
    Ok(())
}

async fn run_migration(db: &DatabaseConnection, name: &str) -> Result<(), DbErr> {
    let label = format!("Applying {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
    print!("{}{} ", label, dots);
    io::stdout().flush().ok();

    let start = Instant::now();
    let result = std::panic::AssertUnwindSafe(Migrator::up(db, Some(1)))
        .catch_unwind()
        .await;

    match result {
        Ok(Ok(())) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
            Ok(())
        }
        Ok(Err(e)) => {
            println!("{}", "failed".red());
            Err(e)
        }
        Err(_) => {
            println!("{}", "failed".red());
            Err(DbErr::Migration(format!("{name} panicked")))
        }
    }
}

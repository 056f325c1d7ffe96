//! Database fixtures shared by unit tests here and the HTTP tests in `api`.

use crate::models::student;
use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory SQLite database with every migration applied.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Inserts `(full_name, grade)` pairs and returns the rows in the same order.
pub async fn seed_students(db: &DatabaseConnection, roster: &[(&str, i32)]) -> Vec<student::Model> {
    let mut out = Vec::with_capacity(roster.len());
    for (name, grade) in roster {
        out.push(
            student::Model::create(db, name, *grade)
                .await
                .expect("Failed to seed student"),
        );
    }
    out
}

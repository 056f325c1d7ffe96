use crate::seed::{Seeder, run_seeder};
use crate::seeds::{checkin::CheckInSeeder, student::StudentSeeder};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::process;
use util::{config::AppConfig, event_date};

mod seed;
mod seeds;

/// Random students added per grade on top of the fixed demo roster.
const STUDENTS_PER_GRADE: usize = 20;
/// Share of the roster checked in when `--with-checkins` is passed.
const DEMO_CHECKIN_PERCENT: u32 = 60;

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    let db = match db::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("Failed to apply migrations: {e}");
        process::exit(1);
    }

    let with_checkins = std::env::args().any(|a| a == "--with-checkins");

    let mut seeders: Vec<(Box<dyn Seeder + Send + Sync>, &str)> = vec![(
        Box::new(StudentSeeder {
            per_grade: STUDENTS_PER_GRADE,
        }),
        "Student",
    )];
    if with_checkins {
        seeders.push((
            Box::new(CheckInSeeder {
                event_date: event_date::today(&config),
                share_percent: DEMO_CHECKIN_PERCENT,
            }),
            "CheckIn",
        ));
    }

    for (seeder, name) in seeders {
        if let Err(e) = run_seeder(&*seeder, name, &db).await {
            eprintln!("{name} seeder failed: {e}");
            process::exit(1);
        }
    }
}

use crate::seed::Seeder;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use db::models::{
    attendance::{self, CheckInError},
    student,
};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

/// Checks a random share of the roster in for `event_date`, so the reports
/// page has something to show.
pub struct CheckInSeeder {
    pub event_date: NaiveDate,
    /// Percentage of students to check in, 0 to 100.
    pub share_percent: u32,
}

#[async_trait]
impl Seeder for CheckInSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<usize, DbErr> {
        let students = student::Entity::find().all(db).await?;
        let start = Utc::now() - Duration::minutes(students.len() as i64);
        let mut created = 0;

        for (i, s) in students.iter().enumerate() {
            if fastrand::u32(0..100) >= self.share_percent {
                continue;
            }
            let at = start + Duration::minutes(i as i64);
            match attendance::Model::check_in(db, s.id, self.event_date, at).await {
                Ok(_) => created += 1,
                Err(CheckInError::AlreadyCheckedIn | CheckInError::StudentNotFound) => {}
                Err(CheckInError::Database(e)) => return Err(e),
            }
        }

        Ok(created)
    }
}

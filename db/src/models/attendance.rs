use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryOrder, QuerySelect, SqlErr};
use serde::Serialize;
use thiserror::Error;

use super::student;

/// A check-in fact: `student_id` attended on `event_date`.
///
/// `(student_id, event_date)` is unique; the constraint, not application
/// locking, is what keeps concurrent duplicate check-ins out.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub event_date: NaiveDate,
    pub checkin_time: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("Already checked in")]
    AlreadyCheckedIn,
    #[error("Student not found")]
    StudentNotFound,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl Model {
    /// Inserts the check-in for `(student_id, event_date)`.
    ///
    /// A second attempt for the same day fails with
    /// [`CheckInError::AlreadyCheckedIn`]; the existing row is never touched.
    pub async fn check_in(
        db: &DbConn,
        student_id: i64,
        event_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Model, CheckInError> {
        if student::Entity::find_by_id(student_id).one(db).await?.is_none() {
            return Err(CheckInError::StudentNotFound);
        }

        let row = ActiveModel {
            student_id: Set(student_id),
            event_date: Set(event_date),
            checkin_time: Set(now),
            ..Default::default()
        };

        row.insert(db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => CheckInError::AlreadyCheckedIn,
            // The student may have vanished between the lookup and the insert.
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => CheckInError::StudentNotFound,
            _ => CheckInError::Database(e),
        })
    }

    pub async fn count_on(db: &DbConn, event_date: NaiveDate) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::EventDate.eq(event_date))
            .count(db)
            .await
    }

    /// Check-ins on `event_date` for the given students.
    pub async fn for_students_on(
        db: &DbConn,
        student_ids: &[i64],
        event_date: NaiveDate,
    ) -> Result<Vec<Model>, DbErr> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        Entity::find()
            .filter(Column::EventDate.eq(event_date))
            .filter(Column::StudentId.is_in(student_ids.iter().copied()))
            .all(db)
            .await
    }

    /// Students of `grade` checked in on `event_date`, ordered by name.
    pub async fn checked_in_for_grade(
        db: &DbConn,
        grade: i32,
        event_date: NaiveDate,
    ) -> Result<Vec<(student::Model, Model)>, DbErr> {
        let rows = Entity::find()
            .find_also_related(student::Entity)
            .filter(Column::EventDate.eq(event_date))
            .filter(student::Column::Grade.eq(grade))
            .order_by_asc(student::Column::FullName)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(checkin, student)| student.map(|s| (s, checkin)))
            .collect())
    }

    /// Newest check-ins on `event_date`, at most `limit` of them.
    ///
    /// The student is `None` when the referenced row no longer exists.
    pub async fn recent_on(
        db: &DbConn,
        event_date: NaiveDate,
        limit: u64,
    ) -> Result<Vec<(Model, Option<student::Model>)>, DbErr> {
        Entity::find()
            .find_also_related(student::Entity)
            .filter(Column::EventDate.eq(event_date))
            .order_by_desc(Column::CheckinTime)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    /// Deletes every check-in on `event_date`. Returns the number removed.
    pub async fn reset_on(db: &DbConn, event_date: NaiveDate) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::EventDate.eq(event_date))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}

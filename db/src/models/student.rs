use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{ActiveValue::Set, QueryOrder};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::RangeInclusive;

use super::attendance;

/// Grades an event roster may contain.
pub const GRADE_RANGE: RangeInclusive<i32> = 7..=12;

/// A roster entry in the `students` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    pub full_name: String,
    /// Unicode-lowercased `full_name`, the column searches match against.
    /// SQLite's own `lower()` only folds ASCII.
    #[serde(skip)]
    pub full_name_folded: String,
    /// Cohort, always within [`GRADE_RANGE`].
    pub grade: i32,
    /// Public URL of the uploaded avatar, if any.
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, full_name: &str, grade: i32) -> Result<Model, DbErr> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(DbErr::Custom("Student name must not be empty".into()));
        }
        if !GRADE_RANGE.contains(&grade) {
            return Err(DbErr::Custom(format!(
                "Grade {grade} is outside {}..={}",
                GRADE_RANGE.start(),
                GRADE_RANGE.end()
            )));
        }

        let now = Utc::now();
        ActiveModel {
            full_name: Set(full_name.to_owned()),
            full_name_folded: Set(fold_name(full_name)),
            grade: Set(grade),
            avatar_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Case-insensitive substring match on the full name, ordered by grade
    /// then name. A blank query matches nothing.
    pub async fn search_by_name(db: &DbConn, query: &str) -> Result<Vec<Model>, DbErr> {
        let needle = fold_name(query.trim());
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(&needle));
        Entity::find()
            .filter(
                Expr::col(Column::FullNameFolded).like(LikeExpr::new(pattern).escape('\\')),
            )
            .order_by_asc(Column::Grade)
            .order_by_asc(Column::FullName)
            .all(db)
            .await
    }

    /// [`Model::search_by_name`] with each student's check-in on `event_date`, if any.
    pub async fn search_with_checkin(
        db: &DbConn,
        query: &str,
        event_date: NaiveDate,
    ) -> Result<Vec<(Model, Option<attendance::Model>)>, DbErr> {
        let students = Self::search_by_name(db, query).await?;
        if students.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
        let mut by_student: HashMap<i64, attendance::Model> =
            attendance::Model::for_students_on(db, &ids, event_date)
                .await?
                .into_iter()
                .map(|a| (a.student_id, a))
                .collect();

        Ok(students
            .into_iter()
            .map(|s| {
                let checkin = by_student.remove(&s.id);
                (s, checkin)
            })
            .collect())
    }

    pub async fn count(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    pub async fn count_in_grade(db: &DbConn, grade: i32) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::Grade.eq(grade))
            .count(db)
            .await
    }

    /// Records a new avatar URL on the student.
    pub async fn set_avatar(db: &DbConn, id: i64, avatar_url: &str) -> Result<Model, DbErr> {
        let Some(existing) = Self::find_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound(format!("Student {id} not found")));
        };

        let mut active: ActiveModel = existing.into();
        active.avatar_url = Set(Some(avatar_url.to_owned()));
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}

/// Case folding shared by stored names and search needles.
fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Escapes LIKE wildcards so they match literally under `ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

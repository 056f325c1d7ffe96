//! Attendance aggregation for the live report and the admin dashboard.
//!
//! Everything is derived from the `students` and `attendance` tables at read
//! time. The handful of queries are not run in one transaction; a check-in
//! landing mid-build may show up in some sections and not others.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{DbConn, DbErr};
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::models::{
    attendance,
    student::{self, GRADE_RANGE},
};

/// Number of entries in the "recent check-ins" feed.
pub const RECENT_CHECKIN_LIMIT: u64 = 10;

const UNKNOWN_STUDENT: &str = "Unknown Student";

/// `round(checked_in / total * 100)`, defined as 0 for an empty roster.
pub fn attendance_rate(checked_in: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((checked_in as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportSummary {
    /// Checked in today.
    pub total: u64,
    pub total_students: u64,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedInStudent {
    pub id: i64,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub checkin_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub grade: i32,
    pub total: u64,
    pub checked_in: u64,
    pub students: Vec<CheckedInStudent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCheckin {
    pub full_name: String,
    pub grade: i32,
    pub avatar_url: Option<String>,
    pub checkin_time: DateTime<Utc>,
}

impl From<(attendance::Model, Option<student::Model>)> for RecentCheckin {
    fn from((checkin, student): (attendance::Model, Option<student::Model>)) -> Self {
        match student {
            Some(s) => Self {
                full_name: s.full_name,
                grade: s.grade,
                avatar_url: s.avatar_url,
                checkin_time: checkin.checkin_time,
            },
            None => Self {
                full_name: UNKNOWN_STUDENT.to_string(),
                grade: 0,
                avatar_url: None,
                checkin_time: checkin.checkin_time,
            },
        }
    }
}

/// The live report shown on the reports page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    pub event_date: NaiveDate,
    pub summary: ReportSummary,
    pub grade_data: Vec<GradeReport>,
    pub recent_checkins: Vec<RecentCheckin>,
}

impl AttendanceReport {
    /// Builds the report for `event_date`.
    ///
    /// Never fails: a sub-query that errors is logged and its section is
    /// zeroed, so the dashboard keeps rendering.
    pub async fn build(db: &DbConn, event_date: NaiveDate) -> Self {
        let total = or_default("attendance count", attendance::Model::count_on(db, event_date)).await;
        let total_students = or_default("student count", student::Model::count(db)).await;

        let mut grade_data = Vec::with_capacity(GRADE_RANGE.count());
        for grade in GRADE_RANGE {
            let enrolled =
                or_default("grade roster count", student::Model::count_in_grade(db, grade)).await;
            let present = or_default(
                "grade check-ins",
                attendance::Model::checked_in_for_grade(db, grade, event_date),
            )
            .await;

            grade_data.push(GradeReport {
                grade,
                total: enrolled,
                checked_in: present.len() as u64,
                students: present
                    .into_iter()
                    .map(|(s, a)| CheckedInStudent {
                        id: s.id,
                        full_name: s.full_name,
                        avatar_url: s.avatar_url,
                        checkin_time: a.checkin_time,
                    })
                    .collect(),
            });
        }

        let recent_checkins = or_default(
            "recent check-ins",
            attendance::Model::recent_on(db, event_date, RECENT_CHECKIN_LIMIT),
        )
        .await
        .into_iter()
        .map(RecentCheckin::from)
        .collect();

        Self {
            event_date,
            summary: ReportSummary {
                total,
                total_students,
                percentage: attendance_rate(total, total_students),
            },
            grade_data,
            recent_checkins,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeCount {
    pub grade: i32,
    pub checked_in: u64,
    pub total: u64,
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_checked_in: u64,
    pub total_students: u64,
    pub percentage: u32,
    pub grade_data: Vec<GradeCount>,
}

impl AdminStats {
    pub async fn build(db: &DbConn, event_date: NaiveDate) -> Result<Self, DbErr> {
        let total_students = student::Model::count(db).await?;
        let total_checked_in = attendance::Model::count_on(db, event_date).await?;

        let mut grade_data = Vec::with_capacity(GRADE_RANGE.count());
        for grade in GRADE_RANGE {
            let total = student::Model::count_in_grade(db, grade).await?;
            let checked_in = attendance::Model::checked_in_for_grade(db, grade, event_date)
                .await?
                .len() as u64;
            grade_data.push(GradeCount {
                grade,
                checked_in,
                total,
            });
        }

        Ok(Self {
            total_checked_in,
            total_students,
            percentage: attendance_rate(total_checked_in, total_students),
            grade_data,
        })
    }
}

async fn or_default<T, F>(what: &str, query: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, DbErr>>,
{
    match query.await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, section = what, "report query failed; using empty section");
            T::default()
        }
    }
}

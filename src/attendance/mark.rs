use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;

use super::{directory, scope, validate, AttendanceError};
use crate::auth::auth::CallerIdentity;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::role::Capability;

/// One line of a marking call: a student and the status to record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterEntry {
    #[schema(example = 42)]
    pub student_id: i64,
    pub status: AttendanceStatus,
    #[schema(example = "08:00:00", value_type = Option<String>)]
    pub time_in: Option<NaiveTime>,
    #[schema(example = "14:30:00", value_type = Option<String>)]
    pub time_out: Option<NaiveTime>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = 7)]
    pub class_id: i64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub roster: Vec<RosterEntry>,
}

const UPSERT_SQL: &str = r#"
INSERT INTO attendance (student_id, class_id, date, status, time_in, time_out, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (student_id, class_id, date) DO UPDATE SET
    status = excluded.status,
    time_in = excluded.time_in,
    time_out = excluded.time_out,
    updated_at = excluded.updated_at
RETURNING id, student_id, class_id, date, status, time_in, time_out, created_at, updated_at
"#;

/// Record attendance for one class and date. Each roster entry is an
/// upsert keyed on (student_id, class_id, date): created if absent, fully
/// overwritten (status and times, never created_at) if present. All
/// entries share one transaction; a missing student aborts the lot.
pub async fn mark_attendance(
    pool: &SqlitePool,
    caller: &CallerIdentity,
    req: &MarkAttendance,
) -> Result<Vec<AttendanceRecord>, AttendanceError> {
    validate::validate_roster(req.class_id, &req.roster)?;

    let class = directory::find_class_by_id(pool, req.class_id, caller.school_id)
        .await?
        .ok_or(AttendanceError::ClassNotFound(req.class_id))?;

    let assignment = directory::assignment_for_caller(pool, caller).await?;
    scope::authorize_write(caller, Capability::MarkAttendance, class.id, assignment.as_ref())?;

    let now = Utc::now().naive_utc();
    // Dropping the transaction on any error path rolls the whole call back.
    let mut tx = pool.begin().await?;

    let mut records = Vec::with_capacity(req.roster.len());
    for entry in &req.roster {
        if !directory::student_exists(&mut *tx, entry.student_id, caller.school_id).await? {
            return Err(AttendanceError::StudentNotFound(entry.student_id));
        }

        let record = sqlx::query_as::<_, AttendanceRecord>(UPSERT_SQL)
            .bind(entry.student_id)
            .bind(req.class_id)
            .bind(req.date)
            .bind(entry.status)
            .bind(entry.time_in)
            .bind(entry.time_out)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
        records.push(record);
    }

    tx.commit().await?;

    tracing::debug!(
        class_id = req.class_id,
        date = %req.date,
        entries = records.len(),
        "Attendance marked"
    );

    Ok(records)
}

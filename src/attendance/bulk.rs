use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use utoipa::ToSchema;

use super::mark::RosterEntry;
use super::{directory, scope, validate, AttendanceError};
use crate::auth::auth::CallerIdentity;
use crate::model::role::Capability;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkUpdateAttendance {
    #[schema(example = 7)]
    pub class_id: i64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub records: Vec<RosterEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkOutcome {
    #[schema(example = 28)]
    pub updated_count: u64,
}

/// Batch variant of marking: the end state matches N single-entry mark
/// calls for the same class and date, but the write is issued as one
/// multi-row upsert statement inside one transaction. Student existence
/// is probed with a single IN-list query before the write.
pub async fn bulk_update_attendance(
    pool: &SqlitePool,
    caller: &CallerIdentity,
    req: &BulkUpdateAttendance,
) -> Result<BulkOutcome, AttendanceError> {
    validate::validate_roster(req.class_id, &req.records)?;

    let class = directory::find_class_by_id(pool, req.class_id, caller.school_id)
        .await?
        .ok_or(AttendanceError::ClassNotFound(req.class_id))?;

    let assignment = directory::assignment_for_caller(pool, caller).await?;
    scope::authorize_write(
        caller,
        Capability::BulkUpdateAttendance,
        class.id,
        assignment.as_ref(),
    )?;

    let now = Utc::now().naive_utc();
    let mut tx = pool.begin().await?;

    let student_ids: Vec<i64> = req.records.iter().map(|r| r.student_id).collect();
    if let Some(missing) =
        directory::first_missing_student(&mut *tx, &student_ids, caller.school_id).await?
    {
        return Err(AttendanceError::StudentNotFound(missing));
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "INSERT INTO attendance (student_id, class_id, date, status, time_in, time_out, created_at, updated_at) ",
    );
    qb.push_values(req.records.iter(), |mut row, entry| {
        row.push_bind(entry.student_id)
            .push_bind(req.class_id)
            .push_bind(req.date)
            .push_bind(entry.status)
            .push_bind(entry.time_in)
            .push_bind(entry.time_out)
            .push_bind(now)
            .push_bind(now);
    });
    qb.push(
        " ON CONFLICT (student_id, class_id, date) DO UPDATE SET \
         status = excluded.status, \
         time_in = excluded.time_in, \
         time_out = excluded.time_out, \
         updated_at = excluded.updated_at",
    );

    let result = qb.build().execute(&mut *tx).await?;
    tx.commit().await?;

    tracing::debug!(
        class_id = req.class_id,
        date = %req.date,
        updated = result.rows_affected(),
        "Attendance bulk updated"
    );

    Ok(BulkOutcome {
        updated_count: result.rows_affected(),
    })
}

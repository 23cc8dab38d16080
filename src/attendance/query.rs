use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use super::scope::ReadScope;
use super::{directory, scope, AttendanceError, FilterValue};
use crate::auth::auth::CallerIdentity;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    /// Filter by class
    pub class_id: Option<i64>,
    /// Filter by student
    pub student_id: Option<i64>,
    /// Exact calendar day
    #[schema(example = "2026-01-01", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    /// Filter by status
    pub status: Option<AttendanceStatus>,
    /// Pagination page number (1-based)
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// A single record with its class/student context attached.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceDetail {
    pub id: i64,
    pub student_id: i64,
    #[schema(example = "Amina Okafor")]
    pub student_name: String,
    pub class_id: i64,
    #[schema(example = "Grade 5 Blue")]
    pub class_name: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(value_type = Option<String>)]
    pub time_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub time_out: Option<NaiveTime>,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
    #[schema(value_type = String)]
    pub updated_at: NaiveDateTime,
}

/// Joined single-record lookup. Teachers may only see records of classes
/// they are assigned to.
pub async fn get_attendance_by_id(
    pool: &SqlitePool,
    caller: &CallerIdentity,
    record_id: i64,
) -> Result<AttendanceDetail, AttendanceError> {
    let assignment = directory::assignment_for_caller(pool, caller).await?;

    let detail = sqlx::query_as::<_, AttendanceDetail>(
        r#"
        SELECT a.id, a.student_id,
               s.first_name || ' ' || s.last_name AS student_name,
               a.class_id, c.name AS class_name,
               a.date, a.status, a.time_in, a.time_out, a.created_at, a.updated_at
        FROM attendance a
        JOIN students s ON s.id = a.student_id
        JOIN classes c ON c.id = a.class_id
        WHERE a.id = ? AND c.school_id = ?
        "#,
    )
    .bind(record_id)
    .bind(caller.school_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AttendanceError::RecordNotFound(record_id))?;

    // The record's class decides visibility, so the check runs after the
    // fetch; a teacher outside the class gets Forbidden, not NotFound.
    scope::scope_read(caller, Some(detail.class_id), assignment.as_ref())?;

    Ok(detail)
}

/// Filtered, paginated record listing with role scoping applied.
pub async fn list_attendance(
    pool: &SqlitePool,
    caller: &CallerIdentity,
    filter: &AttendanceFilter,
) -> Result<AttendanceListResponse, AttendanceError> {
    let assignment = directory::assignment_for_caller(pool, caller).await?;
    let read_scope = scope::scope_read(caller, filter.class_id, assignment.as_ref())?;

    let per_page = filter.per_page.unwrap_or(10).min(100);
    // Cap so the offset arithmetic cannot overflow the i64 bind.
    let page = filter.page.unwrap_or(1).clamp(1, 1 << 31);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE c.school_id = ?");
    let mut args: Vec<FilterValue> = vec![FilterValue::I64(caller.school_id)];

    if let Some(class_id) = filter.class_id {
        // Scope already verified membership for teacher callers.
        where_sql.push_str(" AND a.class_id = ?");
        args.push(FilterValue::I64(class_id));
    } else if let ReadScope::Classes(class_ids) = &read_scope {
        if class_ids.is_empty() {
            return Ok(AttendanceListResponse {
                data: Vec::new(),
                page: page as u32,
                per_page: per_page as u32,
                total: 0,
            });
        }
        let placeholders = vec!["?"; class_ids.len()].join(", ");
        where_sql.push_str(&format!(" AND a.class_id IN ({placeholders})"));
        args.extend(class_ids.iter().map(|id| FilterValue::I64(*id)));
    }

    if let Some(student_id) = filter.student_id {
        where_sql.push_str(" AND a.student_id = ?");
        args.push(FilterValue::I64(student_id));
    }

    if let Some(date) = filter.date {
        where_sql.push_str(" AND a.date = ?");
        args.push(FilterValue::Date(date));
    }

    if let Some(status) = filter.status {
        where_sql.push_str(" AND a.status = ?");
        args.push(FilterValue::Status(status));
    }

    let count_sql = format!(
        "SELECT COUNT(*) FROM attendance a JOIN classes c ON c.id = a.class_id{where_sql}"
    );

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::I64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
            FilterValue::Status(s) => count_q.bind(*s),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let data_sql = format!(
        r#"
        SELECT a.id, a.student_id, a.class_id, a.date, a.status,
               a.time_in, a.time_out, a.created_at, a.updated_at
        FROM attendance a
        JOIN classes c ON c.id = a.class_id
        {where_sql}
        ORDER BY a.date DESC, a.id ASC
        LIMIT ? OFFSET ?
        "#
    );

    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    for arg in &args {
        data_q = match arg {
            FilterValue::I64(v) => data_q.bind(*v),
            FilterValue::Date(d) => data_q.bind(*d),
            FilterValue::Status(s) => data_q.bind(*s),
        };
    }

    let data = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool)
        .await?;

    Ok(AttendanceListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    })
}

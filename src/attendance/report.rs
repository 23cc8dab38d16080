use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use super::scope::ReadScope;
use super::{directory, scope, AttendanceError, FilterValue};
use crate::auth::auth::CallerIdentity;
use crate::model::attendance::AttendanceStatus;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ReportFilter {
    /// Range start, inclusive
    #[schema(example = "2026-01-01", format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    /// Range end, inclusive
    #[schema(example = "2026-01-31", format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    /// Filter by class
    pub class_id: Option<i64>,
    /// Filter by student
    pub student_id: Option<i64>,
    /// Filter by status
    pub status: Option<AttendanceStatus>,
}

/// One group of the aggregation: all records of one status on one day.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct ReportRow {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(example = 25)]
    pub count: i64,
    #[schema(example = 25)]
    pub unique_students: i64,
}

/// Grouped statistics over the attendance store: records matching the
/// filter are grouped by (date, status) with a row count and a distinct
/// student count per group, most recent day first. Role scoping narrows
/// the match before the store is queried.
pub async fn attendance_report(
    pool: &SqlitePool,
    caller: &CallerIdentity,
    filter: &ReportFilter,
) -> Result<Vec<ReportRow>, AttendanceError> {
    let assignment = directory::assignment_for_caller(pool, caller).await?;
    let read_scope = scope::scope_read(caller, filter.class_id, assignment.as_ref())?;

    let mut where_sql = String::from(" WHERE c.school_id = ?");
    let mut args: Vec<FilterValue> = vec![FilterValue::I64(caller.school_id)];

    if let Some(class_id) = filter.class_id {
        where_sql.push_str(" AND a.class_id = ?");
        args.push(FilterValue::I64(class_id));
    } else if let ReadScope::Classes(class_ids) = &read_scope {
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; class_ids.len()].join(", ");
        where_sql.push_str(&format!(" AND a.class_id IN ({placeholders})"));
        args.extend(class_ids.iter().map(|id| FilterValue::I64(*id)));
    }

    if let Some(start) = filter.start_date {
        where_sql.push_str(" AND a.date >= ?");
        args.push(FilterValue::Date(start));
    }

    if let Some(end) = filter.end_date {
        where_sql.push_str(" AND a.date <= ?");
        args.push(FilterValue::Date(end));
    }

    if let Some(student_id) = filter.student_id {
        where_sql.push_str(" AND a.student_id = ?");
        args.push(FilterValue::I64(student_id));
    }

    if let Some(status) = filter.status {
        where_sql.push_str(" AND a.status = ?");
        args.push(FilterValue::Status(status));
    }

    let sql = format!(
        r#"
        SELECT a.date, a.status,
               COUNT(*) AS count,
               COUNT(DISTINCT a.student_id) AS unique_students
        FROM attendance a
        JOIN classes c ON c.id = a.class_id
        {where_sql}
        GROUP BY a.date, a.status
        ORDER BY a.date DESC, a.status ASC
        "#
    );

    let mut q = sqlx::query_as::<_, ReportRow>(&sql);
    for arg in &args {
        q = match arg {
            FilterValue::I64(v) => q.bind(*v),
            FilterValue::Date(d) => q.bind(*d),
            FilterValue::Status(s) => q.bind(*s),
        };
    }

    Ok(q.fetch_all(pool).await?)
}

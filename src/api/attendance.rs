use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;

use crate::attendance::audit::{self, ActivityEvent};
use crate::attendance::bulk::{self, BulkOutcome, BulkUpdateAttendance};
use crate::attendance::mark::{self, MarkAttendance};
use crate::attendance::query::{self, AttendanceDetail, AttendanceFilter, AttendanceListResponse};
use crate::attendance::report::{self, ReportFilter, ReportRow};
use crate::attendance::AttendanceError;
use crate::auth::auth::AuthUser;
use crate::model::attendance::AttendanceRecord;

fn client_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info()
        .realip_remote_addr()
        .map(str::to_string)
}

fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}

/// Mark attendance for one class and date
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body(
        content = MarkAttendance,
        description = "Class, date and roster to record",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Roster recorded", body = [AttendanceRecord]),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "message": "Validation failed: roster must not be empty",
            "statusCode": 400
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Class not assigned to caller"),
        (status = 404, description = "Class or student not found"),
        (status = 503, description = "Attendance store unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    payload: web::Json<MarkAttendance>,
) -> Result<impl Responder, AttendanceError> {
    let caller = auth.identity();
    let payload = payload.into_inner();

    let records = mark::mark_attendance(pool.get_ref(), &caller, &payload).await?;

    // One audit event per roster entry; the write has already committed.
    for record in &records {
        audit::record(
            pool.get_ref(),
            ActivityEvent {
                user_id: caller.user_id,
                kind: "ATTENDANCE_MARKED",
                description: format!(
                    "Marked {} for student {} in class {} on {}",
                    record.status, record.student_id, record.class_id, record.date
                ),
                metadata: json!({
                    "attendance_id": record.id,
                    "student_id": record.student_id,
                    "class_id": record.class_id,
                    "date": record.date,
                    "status": record.status,
                }),
                ip: client_ip(&req),
                user_agent: user_agent(&req),
            },
        );
    }

    Ok(HttpResponse::Ok().json(records))
}

/// Bulk-update an existing attendance day
#[utoipa::path(
    put,
    path = "/api/v1/attendance/bulk",
    request_body(
        content = BulkUpdateAttendance,
        description = "Class, date and the batch of statuses to apply",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Batch applied", body = BulkOutcome),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Class not assigned to caller"),
        (status = 404, description = "Class or student not found"),
        (status = 503, description = "Attendance store unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn bulk_update_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
    payload: web::Json<BulkUpdateAttendance>,
) -> Result<impl Responder, AttendanceError> {
    let caller = auth.identity();
    let payload = payload.into_inner();

    let outcome = bulk::bulk_update_attendance(pool.get_ref(), &caller, &payload).await?;

    // Bulk emits one summarizing event, not one per record.
    audit::record(
        pool.get_ref(),
        ActivityEvent {
            user_id: caller.user_id,
            kind: "ATTENDANCE_BULK_UPDATED",
            description: format!(
                "Bulk updated {} attendance records in class {} on {}",
                outcome.updated_count, payload.class_id, payload.date
            ),
            metadata: json!({
                "class_id": payload.class_id,
                "date": payload.date,
                "updated_count": outcome.updated_count,
            }),
            ip: client_ip(&req),
            user_agent: user_agent(&req),
        },
    );

    Ok(HttpResponse::Ok().json(outcome))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated record list", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    filter: web::Query<AttendanceFilter>,
) -> Result<impl Responder, AttendanceError> {
    let caller = auth.identity();
    let response = query::list_attendance(pool.get_ref(), &caller, &filter).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Attendance report grouped by date and status
#[utoipa::path(
    get,
    path = "/api/v1/attendance/report",
    params(ReportFilter),
    responses(
        (status = 200, description = "Grouped statistics, most recent day first", body = [ReportRow]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_report(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    filter: web::Query<ReportFilter>,
) -> Result<impl Responder, AttendanceError> {
    let caller = auth.identity();
    let rows = report::attendance_report(pool.get_ref(), &caller, &filter).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Fetch one attendance record with class and student context
#[utoipa::path(
    get,
    path = "/api/v1/attendance/{id}",
    params(
        ("id" = i64, Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Record found", body = AttendanceDetail),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Record's class not assigned to caller"),
        (status = 404, description = "Record not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<impl Responder, AttendanceError> {
    let caller = auth.identity();
    let detail = query::get_attendance_by_id(pool.get_ref(), &caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

use crate::attendance::bulk::{BulkOutcome, BulkUpdateAttendance};
use crate::attendance::mark::{MarkAttendance, RosterEntry};
use crate::attendance::query::{AttendanceDetail, AttendanceFilter, AttendanceListResponse};
use crate::attendance::report::{ReportFilter, ReportRow};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{openapi, Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EduTrack Attendance API",
        version = "1.0.0",
        description = r#"
Attendance recording and reporting service for a multi-tenant school
management system.

- **Marking**: record a whole class roster for one day in a single
  all-or-nothing transaction; re-marking the same day overwrites.
- **Bulk update**: batch-edit an existing day as one write.
- **Reporting**: per-day, per-status counts with unique-student totals.

All endpoints require a **JWT Bearer token**; teachers are confined to
their assigned classes, school admins to their school.
"#,
    ),
    paths(
        crate::api::attendance::mark_attendance,
        crate::api::attendance::bulk_update_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::attendance_report,
        crate::api::attendance::get_attendance,
    ),
    components(
        schemas(
            AttendanceStatus,
            AttendanceRecord,
            AttendanceDetail,
            AttendanceFilter,
            AttendanceListResponse,
            MarkAttendance,
            RosterEntry,
            BulkUpdateAttendance,
            BulkOutcome,
            ReportFilter,
            ReportRow,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance recording and reporting APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

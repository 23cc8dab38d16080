use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

/// Error taxonomy of the attendance core. Validation and authorization
/// failures are raised before any transaction opens; `StudentNotFound` may
/// surface mid-transaction and aborts the whole write. Store errors are
/// retryable by the caller: every write is an upsert keyed on the unique
/// (student, class, date) triple, so repeating the call is safe.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Class {0} not found")]
    ClassNotFound(i64),

    #[error("Student {0} not found")]
    StudentNotFound(i64),

    #[error("Attendance record {0} not found")]
    RecordNotFound(i64),

    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    #[error("Attendance store unavailable")]
    Store(#[from] sqlx::Error),
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::Validation(_) => StatusCode::BAD_REQUEST,
            AttendanceError::ClassNotFound(_)
            | AttendanceError::StudentNotFound(_)
            | AttendanceError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Forbidden(_) => StatusCode::FORBIDDEN,
            AttendanceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Store detail stays server-side.
        let message = match self {
            AttendanceError::Store(e) => {
                tracing::error!(error = %e, "Attendance store error");
                "Attendance store unavailable, retry later".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "message": message,
            "statusCode": self.status_code().as_u16(),
        }))
    }
}

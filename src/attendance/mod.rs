//! Attendance recording and reporting core.
//!
//! Every operation takes the pool and an explicit `CallerIdentity`; there
//! is no ambient request state below the HTTP layer. Writes are grouped
//! into one transaction per call: either the whole roster commits or none
//! of it does.

pub mod audit;
pub mod bulk;
pub mod directory;
pub mod error;
pub mod mark;
pub mod query;
pub mod report;
pub mod scope;
pub mod validate;

pub use error::AttendanceError;

use crate::model::attendance::AttendanceStatus;
use chrono::NaiveDate;

/// Typed bind value for dynamically assembled WHERE clauses.
pub(crate) enum FilterValue {
    I64(i64),
    Date(NaiveDate),
    Status(AttendanceStatus),
}

use std::collections::HashSet;

use super::error::AttendanceError;
use super::mark::RosterEntry;

/// Pre-transaction shape checks for mark and bulk-update payloads. Field
/// types are already enforced at deserialization; this covers the rules
/// the type system cannot express.
pub fn validate_roster(class_id: i64, roster: &[RosterEntry]) -> Result<(), AttendanceError> {
    if class_id <= 0 {
        return Err(AttendanceError::Validation(format!(
            "{class_id} is not a valid class reference"
        )));
    }

    if roster.is_empty() {
        return Err(AttendanceError::Validation(
            "roster must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(roster.len());
    for entry in roster {
        if entry.student_id <= 0 {
            return Err(AttendanceError::Validation(format!(
                "{} is not a valid student reference",
                entry.student_id
            )));
        }

        // A duplicate would make two entries race for the same upsert key
        // within one statement.
        if !seen.insert(entry.student_id) {
            return Err(AttendanceError::Validation(format!(
                "student {} appears more than once in the roster",
                entry.student_id
            )));
        }

        if let (Some(time_in), Some(time_out)) = (entry.time_in, entry.time_out) {
            if time_in > time_out {
                return Err(AttendanceError::Validation(format!(
                    "time_in is after time_out for student {}",
                    entry.student_id
                )));
            }
        }
    }

    Ok(())
}

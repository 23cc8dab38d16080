use super::error::AttendanceError;
use crate::auth::auth::CallerIdentity;
use crate::model::role::{Capability, Role};
use crate::model::teacher::TeacherAssignment;

/// How a read query must be narrowed for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadScope {
    Unrestricted,
    /// Restrict to these classes. May be empty, in which case the caller
    /// simply sees nothing.
    Classes(Vec<i64>),
}

/// Write-side decision: may the caller record attendance for `class_id`?
/// Pure function; the assignment set is resolved by the caller from the
/// teacher directory (only needed for teacher roles).
pub fn authorize_write(
    caller: &CallerIdentity,
    capability: Capability,
    class_id: i64,
    assignment: Option<&TeacherAssignment>,
) -> Result<(), AttendanceError> {
    if !caller.role.can(capability) {
        return Err(AttendanceError::Forbidden(
            "role may not record attendance",
        ));
    }

    if caller.role == Role::Teacher {
        let assignment = assignment.ok_or(AttendanceError::Forbidden(
            "no teacher profile linked to this account",
        ))?;
        if !assignment.is_assigned(class_id) {
            return Err(AttendanceError::Forbidden(
                "class is not assigned to this teacher",
            ));
        }
    }

    Ok(())
}

/// Read-side decision. A teacher asking for a specific class must own it;
/// a teacher asking for everything gets their assignment set injected as
/// a filter. Admin roles read unrestricted within their school.
pub fn scope_read(
    caller: &CallerIdentity,
    requested_class: Option<i64>,
    assignment: Option<&TeacherAssignment>,
) -> Result<ReadScope, AttendanceError> {
    if !caller.role.can(Capability::ViewAttendance) {
        return Err(AttendanceError::Forbidden("role may not view attendance"));
    }

    if caller.role.can(Capability::ViewAllClasses) {
        return Ok(ReadScope::Unrestricted);
    }

    let assignment = assignment.ok_or(AttendanceError::Forbidden(
        "no teacher profile linked to this account",
    ))?;

    match requested_class {
        Some(class_id) if assignment.is_assigned(class_id) => {
            Ok(ReadScope::Classes(vec![class_id]))
        }
        Some(_) => Err(AttendanceError::Forbidden(
            "class is not assigned to this teacher",
        )),
        None => Ok(ReadScope::Classes(assignment.class_ids.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> CallerIdentity {
        CallerIdentity {
            user_id: 10,
            role,
            school_id: 1,
        }
    }

    fn assignment(class_ids: Vec<i64>) -> TeacherAssignment {
        TeacherAssignment {
            teacher_id: 4,
            class_ids,
        }
    }

    #[test]
    fn teacher_may_write_assigned_class_only() {
        let a = assignment(vec![1, 2]);
        let c = caller(Role::Teacher);
        assert!(authorize_write(&c, Capability::MarkAttendance, 2, Some(&a)).is_ok());
        assert!(matches!(
            authorize_write(&c, Capability::MarkAttendance, 3, Some(&a)),
            Err(AttendanceError::Forbidden(_))
        ));
    }

    #[test]
    fn teacher_without_profile_is_forbidden() {
        let c = caller(Role::Teacher);
        assert!(matches!(
            authorize_write(&c, Capability::MarkAttendance, 1, None),
            Err(AttendanceError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_writes_without_assignment() {
        let c = caller(Role::SchoolAdmin);
        assert!(authorize_write(&c, Capability::BulkUpdateAttendance, 9, None).is_ok());
    }

    #[test]
    fn student_role_may_not_write_or_read() {
        let c = caller(Role::Student);
        assert!(authorize_write(&c, Capability::MarkAttendance, 1, None).is_err());
        assert!(scope_read(&c, None, None).is_err());
    }

    #[test]
    fn admin_reads_unrestricted() {
        let c = caller(Role::SuperAdmin);
        assert_eq!(scope_read(&c, Some(3), None).unwrap(), ReadScope::Unrestricted);
    }

    #[test]
    fn teacher_read_scope_is_injected_or_verified() {
        let a = assignment(vec![1, 2]);
        let c = caller(Role::Teacher);
        assert_eq!(
            scope_read(&c, None, Some(&a)).unwrap(),
            ReadScope::Classes(vec![1, 2])
        );
        assert_eq!(
            scope_read(&c, Some(2), Some(&a)).unwrap(),
            ReadScope::Classes(vec![2])
        );
        assert!(scope_read(&c, Some(7), Some(&a)).is_err());
    }

    #[test]
    fn teacher_with_no_classes_sees_empty_scope() {
        let a = assignment(vec![]);
        let c = caller(Role::Teacher);
        assert_eq!(scope_read(&c, None, Some(&a)).unwrap(), ReadScope::Classes(vec![]));
    }
}

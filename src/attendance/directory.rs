//! Lookups against the class/student/teacher directories. These entities
//! are owned by the wider school management system; the attendance core
//! only reads them, always scoped to the caller's school.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashSet;

use super::error::AttendanceError;
use crate::auth::auth::CallerIdentity;
use crate::model::class::SchoolClass;
use crate::model::role::Role;
use crate::model::teacher::TeacherAssignment;

pub async fn find_class_by_id(
    pool: &SqlitePool,
    class_id: i64,
    school_id: i64,
) -> Result<Option<SchoolClass>, sqlx::Error> {
    sqlx::query_as::<_, SchoolClass>(
        "SELECT id, school_id, name, grade_level FROM classes WHERE id = ? AND school_id = ?",
    )
    .bind(class_id)
    .bind(school_id)
    .fetch_optional(pool)
    .await
}

/// Works inside or outside a transaction; mark passes its open transaction
/// so the existence check and the upsert see the same snapshot.
pub async fn student_exists<'e, E>(
    executor: E,
    student_id: i64,
    school_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM students WHERE id = ? AND school_id = ?")
            .bind(student_id)
            .bind(school_id)
            .fetch_optional(executor)
            .await?;
    Ok(found.is_some())
}

/// Batched existence probe: returns the first (in input order) student id
/// with no directory entry, or None when all exist.
pub async fn first_missing_student<'e, E>(
    executor: E,
    student_ids: &[i64],
    school_id: i64,
) -> Result<Option<i64>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    if student_ids.is_empty() {
        return Ok(None);
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id FROM students WHERE school_id = ");
    qb.push_bind(school_id);
    qb.push(" AND id IN (");
    let mut separated = qb.separated(", ");
    for id in student_ids {
        separated.push_bind(*id);
    }
    qb.push(")");

    let found: HashSet<i64> = qb
        .build_query_scalar()
        .fetch_all(executor)
        .await?
        .into_iter()
        .collect();

    Ok(student_ids.iter().copied().find(|id| !found.contains(id)))
}

pub async fn find_teacher_assignment(
    pool: &SqlitePool,
    user_id: i64,
    school_id: i64,
) -> Result<Option<TeacherAssignment>, sqlx::Error> {
    let teacher_id: Option<i64> =
        sqlx::query_scalar("SELECT id FROM teachers WHERE user_id = ? AND school_id = ?")
            .bind(user_id)
            .bind(school_id)
            .fetch_optional(pool)
            .await?;

    let Some(teacher_id) = teacher_id else {
        return Ok(None);
    };

    let class_ids: Vec<i64> =
        sqlx::query_scalar("SELECT class_id FROM teacher_classes WHERE teacher_id = ? ORDER BY class_id")
            .bind(teacher_id)
            .fetch_all(pool)
            .await?;

    Ok(Some(TeacherAssignment {
        teacher_id,
        class_ids,
    }))
}

/// Teacher callers need their assignment set for scoping; other roles are
/// decided from the capability table alone.
pub async fn assignment_for_caller(
    pool: &SqlitePool,
    caller: &CallerIdentity,
) -> Result<Option<TeacherAssignment>, AttendanceError> {
    if caller.role != Role::Teacher {
        return Ok(None);
    }
    Ok(find_teacher_assignment(pool, caller.user_id, caller.school_id).await?)
}

#![allow(dead_code)]

use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use edutrack::attendance::mark::RosterEntry;
use edutrack::auth::auth::CallerIdentity;
use edutrack::db;
use edutrack::model::attendance::AttendanceStatus;
use edutrack::model::role::Role;

/// One-connection pool: every `sqlite::memory:` connection is a separate
/// database, so the pool must never hand out a second one.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    db::init_schema(&pool).await.expect("failed to apply schema");
    pool
}

pub async fn seed_school(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO schools (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn seed_class(pool: &SqlitePool, school_id: i64, name: &str) -> i64 {
    sqlx::query("INSERT INTO classes (school_id, name) VALUES (?, ?)")
        .bind(school_id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn seed_student(pool: &SqlitePool, school_id: i64, class_id: i64, name: &str) -> i64 {
    sqlx::query(
        "INSERT INTO students (school_id, class_id, first_name, last_name) VALUES (?, ?, ?, ?)",
    )
    .bind(school_id)
    .bind(class_id)
    .bind(name)
    .bind("Test")
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub async fn seed_teacher(pool: &SqlitePool, user_id: i64, school_id: i64, name: &str) -> i64 {
    sqlx::query(
        "INSERT INTO teachers (user_id, school_id, first_name, last_name) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(school_id)
    .bind(name)
    .bind("Test")
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub async fn assign_class(pool: &SqlitePool, teacher_id: i64, class_id: i64) {
    sqlx::query("INSERT INTO teacher_classes (teacher_id, class_id) VALUES (?, ?)")
        .bind(teacher_id)
        .bind(class_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn attendance_row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn admin(school_id: i64) -> CallerIdentity {
    CallerIdentity {
        user_id: 1,
        role: Role::SchoolAdmin,
        school_id,
    }
}

pub fn teacher(user_id: i64, school_id: i64) -> CallerIdentity {
    CallerIdentity {
        user_id,
        role: Role::Teacher,
        school_id,
    }
}

pub fn caller(role: Role, school_id: i64) -> CallerIdentity {
    CallerIdentity {
        user_id: 99,
        role,
        school_id,
    }
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn entry(student_id: i64, status: AttendanceStatus) -> RosterEntry {
    RosterEntry {
        student_id,
        status,
        time_in: None,
        time_out: None,
    }
}

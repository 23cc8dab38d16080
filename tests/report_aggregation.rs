mod common;

use common::*;
use edutrack::attendance::mark::{mark_attendance, MarkAttendance};
use edutrack::attendance::report::{attendance_report, ReportFilter};
use edutrack::model::attendance::AttendanceStatus;

fn filter() -> ReportFilter {
    ReportFilter {
        start_date: None,
        end_date: None,
        class_id: None,
        student_id: None,
        status: None,
    }
}

async fn mark_one(
    pool: &sqlx::SqlitePool,
    school: i64,
    class: i64,
    student: i64,
    day: &str,
    status: AttendanceStatus,
) {
    let req = MarkAttendance {
        class_id: class,
        date: date(day),
        roster: vec![entry(student, status)],
    };
    mark_attendance(pool, &admin(school), &req).await.unwrap();
}

#[actix_web::test]
async fn groups_by_date_and_status_most_recent_first() {
    let pool = test_pool().await;
    let school = seed_school(&pool, "Hillside Primary").await;
    let c1 = seed_class(&pool, school, "Grade 5 Blue").await;
    let s1 = seed_student(&pool, school, c1, "Amina").await;
    let s2 = seed_student(&pool, school, c1, "Brian").await;

    mark_one(&pool, school, c1, s1, "2024-01-01", AttendanceStatus::Present).await;
    mark_one(&pool, school, c1, s2, "2024-01-01", AttendanceStatus::Present).await;
    mark_one(&pool, school, c1, s1, "2024-01-02", AttendanceStatus::Absent).await;

    let mut f = filter();
    f.class_id = Some(c1);
    let rows = attendance_report(&pool, &admin(school), &f).await.unwrap();

    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].date, date("2024-01-02"));
    assert_eq!(rows[0].status, AttendanceStatus::Absent);
    assert_eq!(rows[0].count, 1);
    assert_eq!(rows[0].unique_students, 1);

    assert_eq!(rows[1].date, date("2024-01-01"));
    assert_eq!(rows[1].status, AttendanceStatus::Present);
    assert_eq!(rows[1].count, 2);
    assert_eq!(rows[1].unique_students, 2);
}

#[actix_web::test]
async fn unique_students_deduplicates_across_classes() {
    let pool = test_pool().await;
    let school = seed_school(&pool, "Hillside Primary").await;
    let maths = seed_class(&pool, school, "Maths").await;
    let science = seed_class(&pool, school, "Science").await;
    let s1 = seed_student(&pool, school, maths, "Amina").await;

    // Same student, same day, same status, two classes: two records but
    // one unique student in the group.
    mark_one(&pool, school, maths, s1, "2024-01-01", AttendanceStatus::Present).await;
    mark_one(&pool, school, science, s1, "2024-01-01", AttendanceStatus::Present).await;

    let rows = attendance_report(&pool, &admin(school), &filter())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[0].unique_students, 1);
}

#[actix_web::test]
async fn date_range_is_inclusive_on_both_ends() {
    let pool = test_pool().await;
    let school = seed_school(&pool, "Hillside Primary").await;
    let c1 = seed_class(&pool, school, "Grade 5 Blue").await;
    let s1 = seed_student(&pool, school, c1, "Amina").await;

    for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"] {
        mark_one(&pool, school, c1, s1, day, AttendanceStatus::Present).await;
    }

    let mut f = filter();
    f.start_date = Some(date("2024-01-02"));
    f.end_date = Some(date("2024-01-03"));
    let rows = attendance_report(&pool, &admin(school), &f).await.unwrap();

    let days: Vec<_> = rows.iter().map(|r| r.date).collect();
    assert_eq!(days, vec![date("2024-01-03"), date("2024-01-02")]);
}

#[actix_web::test]
async fn status_and_student_filters_narrow_the_groups() {
    let pool = test_pool().await;
    let school = seed_school(&pool, "Hillside Primary").await;
    let c1 = seed_class(&pool, school, "Grade 5 Blue").await;
    let s1 = seed_student(&pool, school, c1, "Amina").await;
    let s2 = seed_student(&pool, school, c1, "Brian").await;

    mark_one(&pool, school, c1, s1, "2024-01-01", AttendanceStatus::Present).await;
    mark_one(&pool, school, c1, s2, "2024-01-01", AttendanceStatus::Late).await;
    mark_one(&pool, school, c1, s1, "2024-01-02", AttendanceStatus::Late).await;

    let mut by_status = filter();
    by_status.status = Some(AttendanceStatus::Late);
    let rows = attendance_report(&pool, &admin(school), &by_status)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.status == AttendanceStatus::Late));

    let mut by_student = filter();
    by_student.student_id = Some(s2);
    let rows = attendance_report(&pool, &admin(school), &by_student)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, AttendanceStatus::Late);
    assert_eq!(rows[0].count, 1);
}

#[actix_web::test]
async fn empty_store_yields_empty_report() {
    let pool = test_pool().await;
    let school = seed_school(&pool, "Hillside Primary").await;
    let rows = attendance_report(&pool, &admin(school), &filter())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

//! Activity-log sink. Audit writes are fire-and-forget: a failure here is
//! logged and swallowed, never surfaced to the caller whose attendance
//! write already committed.

use chrono::Utc;
use sqlx::SqlitePool;

#[derive(Debug)]
pub struct ActivityEvent {
    pub user_id: i64,
    pub kind: &'static str,
    pub description: String,
    pub metadata: serde_json::Value,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

pub async fn log_activity(pool: &SqlitePool, event: &ActivityEvent) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO activity_log (user_id, kind, description, metadata, ip, user_agent, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(event.user_id)
    .bind(event.kind)
    .bind(&event.description)
    .bind(event.metadata.to_string())
    .bind(&event.ip)
    .bind(&event.user_agent)
    .bind(Utc::now().naive_utc())
    .execute(pool)
    .await?;
    Ok(())
}

/// Spawn the audit write off the request path.
pub fn record(pool: &SqlitePool, event: ActivityEvent) {
    let pool = pool.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = log_activity(&pool, &event).await {
            tracing::warn!(error = %e, kind = event.kind, "Failed to record activity");
        }
    });
}

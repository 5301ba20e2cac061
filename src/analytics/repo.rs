use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::analytics::summary::WindowSummary;

/// Cached per-day aggregate. Derived state only; recomputable from
/// health_readings at any time and never consulted by the live summary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailySummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub reading_count: i32,
    pub avg_ph: f32,
    pub avg_health_score: f32,
    pub critical_count: i32,
    pub poor_count: i32,
    pub fair_count: i32,
    pub good_count: i32,
    pub excellent_count: i32,
    pub alert_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
}

pub async fn list_daily(db: &PgPool, user_id: Uuid, days: i64) -> anyhow::Result<Vec<DailySummary>> {
    let rows = sqlx::query_as::<_, DailySummary>(
        r#"
        SELECT id, user_id, date, reading_count, avg_ph, avg_health_score,
               critical_count, poor_count, fair_count, good_count, excellent_count,
               alert_count, computed_at
        FROM daily_summaries
        WHERE user_id = $1
        ORDER BY date DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(days)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Write one day's aggregate, replacing any previous row for (user, date).
pub async fn upsert_daily(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    summary: &WindowSummary,
) -> anyhow::Result<DailySummary> {
    let h = &summary.score_histogram;
    let bucket = |lo: usize| h[lo] + h[lo + 1];
    let alert_count = summary.total_readings - summary.alert_counts.none;

    let row = sqlx::query_as::<_, DailySummary>(
        r#"
        INSERT INTO daily_summaries
            (user_id, date, reading_count, avg_ph, avg_health_score,
             critical_count, poor_count, fair_count, good_count, excellent_count,
             alert_count, computed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now())
        ON CONFLICT (user_id, date) DO UPDATE SET
            reading_count = EXCLUDED.reading_count,
            avg_ph = EXCLUDED.avg_ph,
            avg_health_score = EXCLUDED.avg_health_score,
            critical_count = EXCLUDED.critical_count,
            poor_count = EXCLUDED.poor_count,
            fair_count = EXCLUDED.fair_count,
            good_count = EXCLUDED.good_count,
            excellent_count = EXCLUDED.excellent_count,
            alert_count = EXCLUDED.alert_count,
            computed_at = now()
        RETURNING id, user_id, date, reading_count, avg_ph, avg_health_score,
                  critical_count, poor_count, fair_count, good_count, excellent_count,
                  alert_count, computed_at
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(summary.total_readings as i32)
    .bind(summary.avg_ph)
    .bind(summary.avg_health_score)
    .bind(bucket(0) as i32)
    .bind(bucket(2) as i32)
    .bind(bucket(4) as i32)
    .bind(bucket(6) as i32)
    .bind(bucket(8) as i32)
    .bind(alert_count as i32)
    .fetch_one(db)
    .await?;
    Ok(row)
}

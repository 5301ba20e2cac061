use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, QueryBuilder};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::classifier;

/// Where a reading came from. Matches the CHECK constraint on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Sensor,
    Manual,
    Calibration,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::Manual => "manual",
            Self::Calibration => "calibration",
        }
    }
}

/// One stored observation. Immutable after insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reading {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ph: f32,
    pub color_r: i16,
    pub color_g: i16,
    pub color_b: i16,
    pub health_score: i16,
    pub hydration_level: String,
    pub confidence_score: f32,
    pub alert_level: String,
    pub recommendations: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub reading_time: OffsetDateTime,
    pub device_id: Option<String>,
    pub source: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A reading ready to insert. Classification fields are always derived
/// through [`classified`](NewReading::classified), never supplied raw.
#[derive(Debug, Clone)]
pub struct NewReading {
    pub user_id: Uuid,
    pub ph: f32,
    pub color_r: u8,
    pub color_g: u8,
    pub color_b: u8,
    pub health_score: u8,
    pub hydration_level: &'static str,
    pub confidence_score: f32,
    pub alert_level: &'static str,
    pub recommendations: Vec<String>,
    pub reading_time: OffsetDateTime,
    pub device_id: Option<String>,
    pub source: Source,
}

impl NewReading {
    /// Build a reading from raw sensor values, running the classifier.
    pub fn classified(
        user_id: Uuid,
        ph: f32,
        (r, g, b): (u8, u8, u8),
        reading_time: OffsetDateTime,
        device_id: Option<String>,
        source: Source,
    ) -> Self {
        let c = classifier::classify(r, g, b);
        Self {
            user_id,
            ph,
            color_r: r,
            color_g: g,
            color_b: b,
            health_score: c.score,
            hydration_level: c.hydration_level().as_str(),
            confidence_score: c.confidence,
            alert_level: c.alert_level().as_str(),
            recommendations: c.recommendations().iter().map(|s| s.to_string()).collect(),
            reading_time,
            device_id,
            source,
        }
    }
}

const COLUMNS: &str = "id, user_id, ph, color_r, color_g, color_b, health_score, \
     hydration_level, confidence_score, alert_level, recommendations, \
     reading_time, device_id, source, created_at";

pub async fn insert(db: &PgPool, new: &NewReading) -> anyhow::Result<Reading> {
    let reading = sqlx::query_as::<_, Reading>(
        r#"
        INSERT INTO health_readings
            (user_id, ph, color_r, color_g, color_b, health_score, hydration_level,
             confidence_score, alert_level, recommendations, reading_time, device_id, source)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING id, user_id, ph, color_r, color_g, color_b, health_score,
                  hydration_level, confidence_score, alert_level, recommendations,
                  reading_time, device_id, source, created_at
        "#,
    )
    .bind(new.user_id)
    .bind(new.ph)
    .bind(new.color_r as i16)
    .bind(new.color_g as i16)
    .bind(new.color_b as i16)
    .bind(new.health_score as i16)
    .bind(new.hydration_level)
    .bind(new.confidence_score)
    .bind(new.alert_level)
    .bind(&new.recommendations)
    .bind(new.reading_time)
    .bind(&new.device_id)
    .bind(new.source.as_str())
    .fetch_one(db)
    .await?;
    Ok(reading)
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    since: OffsetDateTime,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Reading>> {
    let rows = sqlx::query_as::<_, Reading>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM health_readings
        WHERE user_id = $1 AND reading_time >= $2
        ORDER BY reading_time DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(user_id)
    .bind(since)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// All readings in [start, end), newest first. Unbounded; analytics windows
/// cap out at 30 days.
pub async fn list_window(
    db: &PgPool,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<Vec<Reading>> {
    let rows = sqlx::query_as::<_, Reading>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM health_readings
        WHERE user_id = $1 AND reading_time >= $2 AND reading_time < $3
        ORDER BY reading_time DESC
        "#
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn latest(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Reading>> {
    let row = sqlx::query_as::<_, Reading>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM health_readings
        WHERE user_id = $1
        ORDER BY reading_time DESC
        LIMIT 1
        "#
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Chunk size for batch inserts. Sized for request limits, not atomicity.
const BATCH_CHUNK: usize = 50;

/// Insert a batch best-effort: one multi-row INSERT per chunk, failed chunks
/// are logged and skipped. Returns (inserted, failed) row counts.
pub async fn insert_batch_best_effort(db: &PgPool, batch: &[NewReading]) -> (usize, usize) {
    let mut inserted = 0;
    let mut failed = 0;

    for chunk in batch.chunks(BATCH_CHUNK) {
        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "INSERT INTO health_readings \
             (user_id, ph, color_r, color_g, color_b, health_score, hydration_level, \
              confidence_score, alert_level, recommendations, reading_time, device_id, source) ",
        );
        qb.push_values(chunk, |mut row, new| {
            row.push_bind(new.user_id)
                .push_bind(new.ph)
                .push_bind(new.color_r as i16)
                .push_bind(new.color_g as i16)
                .push_bind(new.color_b as i16)
                .push_bind(new.health_score as i16)
                .push_bind(new.hydration_level)
                .push_bind(new.confidence_score)
                .push_bind(new.alert_level)
                .push_bind(&new.recommendations)
                .push_bind(new.reading_time)
                .push_bind(&new.device_id)
                .push_bind(new.source.as_str());
        });

        match qb.build().execute(db).await {
            Ok(_) => inserted += chunk.len(),
            Err(e) => {
                warn!(error = %e, rows = chunk.len(), "batch chunk insert failed; continuing");
                failed += chunk.len();
            }
        }
    }

    (inserted, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classified_fills_derived_fields_consistently() {
        let now = OffsetDateTime::now_utc();
        let new = NewReading::classified(
            Uuid::new_v4(),
            6.4,
            (255, 255, 200),
            now,
            Some("arduino-01".into()),
            Source::Sensor,
        );
        let c = classifier::classify(255, 255, 200);
        assert_eq!(new.health_score, c.score);
        assert_eq!(new.hydration_level, c.hydration_level().as_str());
        assert_eq!(new.alert_level, c.alert_level().as_str());
        assert_eq!(new.confidence_score, c.confidence);
        assert_eq!(new.recommendations.len(), c.recommendations().len());
    }

    #[test]
    fn source_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Sensor).unwrap(), "\"sensor\"");
        assert_eq!(Source::Calibration.as_str(), "calibration");
    }
}

//! Database schema, applied once on startup.
//!
//! Idempotent: every statement is IF NOT EXISTS, safe to run on every boot.

use anyhow::Result;
use sqlx::PgPool;

/// Create or update the database schema.
///
/// Runs in a single transaction; errors are propagated and abort startup.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id                 UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email              TEXT NOT NULL UNIQUE,
            password_hash      TEXT NOT NULL,
            full_name          TEXT,
            age                SMALLINT CHECK (age BETWEEN 0 AND 150),
            gender             TEXT,
            medical_conditions TEXT[] NOT NULL DEFAULT '{}',
            medications        TEXT[] NOT NULL DEFAULT '{}',
            created_at         TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Readings are immutable after insert. user_id is NOT NULL: orphaned
    // demo rows are not allowed in this deployment.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS health_readings (
            id               UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id          UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            ph               REAL NOT NULL CHECK (ph >= 0 AND ph <= 14),
            color_r          SMALLINT NOT NULL CHECK (color_r BETWEEN 0 AND 255),
            color_g          SMALLINT NOT NULL CHECK (color_g BETWEEN 0 AND 255),
            color_b          SMALLINT NOT NULL CHECK (color_b BETWEEN 0 AND 255),
            health_score     SMALLINT NOT NULL CHECK (health_score BETWEEN 1 AND 10),
            hydration_level  TEXT NOT NULL CHECK (hydration_level IN
                ('excellent', 'good', 'fair', 'poor', 'critical')),
            confidence_score REAL NOT NULL CHECK (confidence_score >= 0 AND confidence_score <= 1),
            alert_level      TEXT NOT NULL CHECK (alert_level IN
                ('none', 'low', 'medium', 'high', 'critical')),
            recommendations  TEXT[] NOT NULL DEFAULT '{}',
            reading_time     TIMESTAMPTZ NOT NULL DEFAULT now(),
            device_id        TEXT,
            source           TEXT NOT NULL CHECK (source IN ('sensor', 'manual', 'calibration')),
            created_at       TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Derived cache, recomputable from health_readings at any time.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS daily_summaries (
            id               UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id          UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date             DATE NOT NULL,
            reading_count    INTEGER NOT NULL DEFAULT 0,
            avg_ph           REAL NOT NULL DEFAULT 0,
            avg_health_score REAL NOT NULL DEFAULT 0,
            critical_count   INTEGER NOT NULL DEFAULT 0,
            poor_count       INTEGER NOT NULL DEFAULT 0,
            fair_count       INTEGER NOT NULL DEFAULT 0,
            good_count       INTEGER NOT NULL DEFAULT 0,
            excellent_count  INTEGER NOT NULL DEFAULT 0,
            alert_count      INTEGER NOT NULL DEFAULT 0,
            computed_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE (user_id, date)
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Calibration clusters from the original hardware pipeline. Kept for
    // schema parity with deployed databases; live scoring never reads it.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS color_clusters (
            id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            label       TEXT NOT NULL,
            centroid_r  SMALLINT NOT NULL CHECK (centroid_r BETWEEN 0 AND 255),
            centroid_g  SMALLINT NOT NULL CHECK (centroid_g BETWEEN 0 AND 255),
            centroid_b  SMALLINT NOT NULL CHECK (centroid_b BETWEEN 0 AND 255),
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_health_readings_user_time
            ON health_readings (user_id, reading_time DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_daily_summaries_user_date
            ON daily_summaries (user_id, date DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Account row. Owns readings (cascade delete) and carries the health
/// profile fields shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub age: Option<i16>,
    pub gender: Option<String>,
    pub medical_conditions: Vec<String>,
    pub medications: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, email, password_hash, full_name, age, gender, \
     medical_conditions, medications, created_at";

pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<UserProfile>> {
    let user = sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM users
        WHERE email = $1
        "#
    ))
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<UserProfile>> {
    let user = sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM users
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: Option<&'a str>,
    pub age: Option<i16>,
    pub gender: Option<&'a str>,
    pub medical_conditions: &'a [String],
    pub medications: &'a [String],
}

pub async fn create(db: &PgPool, new: NewUser<'_>) -> anyhow::Result<UserProfile> {
    let user = sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        INSERT INTO users
            (email, password_hash, full_name, age, gender, medical_conditions, medications)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.full_name)
    .bind(new.age)
    .bind(new.gender)
    .bind(new.medical_conditions)
    .bind(new.medications)
    .fetch_one(db)
    .await?;
    Ok(user)
}

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Serial sensor link. Absent unless SERIAL_PORT is set; the service is
/// fully functional without hardware attached. The device is single-user,
/// so readings are attributed to the configured account.
#[derive(Debug, Clone, Deserialize)]
pub struct SerialConfig {
    pub port: String,
    pub device_id: String,
    pub user_id: uuid::Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub serial: Option<SerialConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "prism-health".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "prism-health-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let serial = match std::env::var("SERIAL_PORT").ok() {
            Some(port) => {
                let user_id = std::env::var("SERIAL_USER_ID")
                    .map_err(|_| anyhow::anyhow!("SERIAL_PORT set but SERIAL_USER_ID missing"))?
                    .parse::<uuid::Uuid>()?;
                Some(SerialConfig {
                    port,
                    device_id: std::env::var("SERIAL_DEVICE_ID")
                        .unwrap_or_else(|_| "arduino-01".into()),
                    user_id,
                })
            }
            None => None,
        };
        Ok(Self {
            database_url,
            jwt,
            serial,
        })
    }
}

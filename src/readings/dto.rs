use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Rolling time window used by the list and analytics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Window {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl Window {
    pub fn duration(&self) -> Duration {
        match self {
            Self::Day => Duration::hours(24),
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
        }
    }

    pub fn start_from(&self, now: OffsetDateTime) -> OffsetDateTime {
        now - self.duration()
    }
}

/// Request body for POST /readings/manual.
#[derive(Debug, Deserialize)]
pub struct ManualReadingRequest {
    pub ph: f32,
    pub color_r: u8,
    pub color_g: u8,
    pub color_b: u8,
    pub device_id: Option<String>,
    /// Defaults to now when omitted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub reading_time: Option<OffsetDateTime>,
}

/// Query for GET /readings.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_window")]
    pub window: Window,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_window() -> Window {
    Window::Week
}
fn default_limit() -> i64 {
    50
}

pub const MAX_LIMIT: i64 = 500;

/// Request body for POST /readings/mock.
#[derive(Debug, Deserialize)]
pub struct MockRequest {
    pub scenario: crate::ingest::mock::Scenario,
    #[serde(default = "default_mock_count")]
    pub count: usize,
    /// Spread the generated readings back over this many hours.
    #[serde(default = "default_mock_hours")]
    pub hours: u32,
}

fn default_mock_count() -> usize {
    24
}
fn default_mock_hours() -> u32 {
    24
}

#[derive(Debug, Serialize)]
pub struct MockResponse {
    pub requested: usize,
    pub inserted: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_deserializes_from_short_names() {
        assert_eq!(serde_json::from_str::<Window>("\"24h\"").unwrap(), Window::Day);
        assert_eq!(serde_json::from_str::<Window>("\"7d\"").unwrap(), Window::Week);
        assert_eq!(serde_json::from_str::<Window>("\"30d\"").unwrap(), Window::Month);
        assert!(serde_json::from_str::<Window>("\"90d\"").is_err());
    }

    #[test]
    fn window_start_is_duration_back() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(now - Window::Day.start_from(now), Duration::hours(24));
        assert_eq!(now - Window::Month.start_from(now), Duration::days(30));
    }
}

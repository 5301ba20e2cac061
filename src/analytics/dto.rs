use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::readings::dto::Window;

/// Query for GET /analytics/summary. Either a named window or an explicit
/// start/end pair; explicit bounds win when both are present.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub window: Option<Window>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

/// Query for GET /analytics/daily.
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    7
}

pub const MAX_DAILY_DAYS: i64 = 90;

/// Request body for POST /analytics/daily/recompute. Date defaults to the
/// current UTC day.
#[derive(Debug, Deserialize)]
pub struct RecomputeRequest {
    pub date: Option<Date>,
}

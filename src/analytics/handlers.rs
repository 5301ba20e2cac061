use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    analytics::{
        dto::{DailyQuery, RecomputeRequest, SummaryQuery, MAX_DAILY_DAYS},
        repo::{self, DailySummary},
        summary::{summarize, WindowSummary},
    },
    auth::jwt::AuthUser,
    readings::{dto::Window, repo as readings_repo},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/summary", get(window_summary))
        .route("/analytics/daily", get(daily_summaries))
        .route("/analytics/daily/recompute", post(recompute_daily))
}

#[instrument(skip(state))]
pub async fn window_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<SummaryQuery>,
) -> Result<Json<WindowSummary>, (StatusCode, String)> {
    let now = OffsetDateTime::now_utc();
    let (start, end) = match (q.start, q.end) {
        (Some(start), Some(end)) => {
            if start >= end {
                return Err((StatusCode::BAD_REQUEST, "start must be before end".into()));
            }
            (start, end)
        }
        (None, None) => {
            let window = q.window.unwrap_or(Window::Day);
            (window.start_from(now), now)
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "start and end must be given together".into(),
            ));
        }
    };

    let rows = readings_repo::list_window(&state.db, user_id, start, end)
        .await
        .map_err(internal)?;
    Ok(Json(summarize(&rows)))
}

#[instrument(skip(state))]
pub async fn daily_summaries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DailyQuery>,
) -> Result<Json<Vec<DailySummary>>, (StatusCode, String)> {
    if q.days < 1 || q.days > MAX_DAILY_DAYS {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("days must be between 1 and {MAX_DAILY_DAYS}"),
        ));
    }
    let rows = repo::list_daily(&state.db, user_id, q.days)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, body))]
pub async fn recompute_daily(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RecomputeRequest>,
) -> Result<Json<DailySummary>, (StatusCode, String)> {
    let date = body.date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let start = date.midnight().assume_utc();
    let end = start + time::Duration::days(1);

    let rows = readings_repo::list_window(&state.db, user_id, start, end)
        .await
        .map_err(internal)?;
    let summary = summarize(&rows);

    let row = repo::upsert_daily(&state.db, user_id, date, &summary)
        .await
        .map_err(internal)?;
    info!(%user_id, %date, readings = summary.total_readings, "daily summary recomputed");
    Ok(Json(row))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

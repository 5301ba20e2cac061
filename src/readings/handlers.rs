use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    ingest::mock,
    readings::{
        dto::{ListQuery, ManualReadingRequest, MockRequest, MockResponse, MAX_LIMIT},
        repo::{self, NewReading, Reading, Source},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/readings", get(list_readings))
        .route("/readings/latest", get(latest_reading))
        .route("/readings/manual", post(create_manual))
        .route("/readings/mock", post(create_mock))
}

#[instrument(skip(state))]
pub async fn list_readings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Reading>>, (StatusCode, String)> {
    if q.limit < 1 || q.limit > MAX_LIMIT {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("limit must be between 1 and {MAX_LIMIT}"),
        ));
    }
    if q.offset < 0 {
        return Err((StatusCode::BAD_REQUEST, "offset must be >= 0".into()));
    }

    let since = q.window.start_from(OffsetDateTime::now_utc());
    let rows = repo::list_by_user(&state.db, user_id, since, q.limit, q.offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn latest_reading(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Reading>, (StatusCode, String)> {
    match repo::latest(&state.db, user_id).await.map_err(internal)? {
        Some(reading) => Ok(Json(reading)),
        None => Err((StatusCode::NOT_FOUND, "No readings yet".into())),
    }
}

#[instrument(skip(state, body))]
pub async fn create_manual(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ManualReadingRequest>,
) -> Result<(StatusCode, Json<Reading>), (StatusCode, String)> {
    if !(0.0..=14.0).contains(&body.ph) {
        warn!(ph = body.ph, "manual reading ph out of range");
        return Err((StatusCode::BAD_REQUEST, "ph must be between 0 and 14".into()));
    }
    // color channels are u8 by type; nothing further to check there

    let reading_time = body.reading_time.unwrap_or_else(OffsetDateTime::now_utc);
    let new = NewReading::classified(
        user_id,
        body.ph,
        (body.color_r, body.color_g, body.color_b),
        reading_time,
        body.device_id,
        Source::Manual,
    );

    let reading = match repo::insert(&state.db, &new).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, %user_id, "insert manual reading failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(%user_id, reading_id = %reading.id, score = reading.health_score, "manual reading stored");
    Ok((StatusCode::CREATED, Json(reading)))
}

#[instrument(skip(state, body))]
pub async fn create_mock(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<MockRequest>,
) -> Result<(StatusCode, Json<MockResponse>), (StatusCode, String)> {
    if body.count == 0 || body.count > 1000 {
        return Err((
            StatusCode::BAD_REQUEST,
            "count must be between 1 and 1000".into(),
        ));
    }
    if body.hours == 0 || body.hours > 24 * 90 {
        return Err((
            StatusCode::BAD_REQUEST,
            "hours must be between 1 and 2160".into(),
        ));
    }

    let (inserted, failed) = mock::run(&state.db, user_id, body.scenario, body.count, body.hours).await;
    Ok((
        StatusCode::CREATED,
        Json(MockResponse {
            requested: body.count,
            inserted,
            failed,
        }),
    ))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

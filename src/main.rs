mod analytics;
mod app;
mod auth;
mod classifier;
mod config;
mod db;
mod ingest;
mod readings;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "prism_health=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;
    db::schema::create_schema(&app_state.db).await?;

    if app_state.config.serial.is_some() {
        tokio::spawn(ingest::serial::run(app_state.clone()));
    }

    let app = app::build_app(app_state);
    app::serve(app).await
}

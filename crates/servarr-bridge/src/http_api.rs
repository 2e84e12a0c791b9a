//! HTTP transport
//!
//! A thin axum surface over the dispatch layer: health/readiness probes plus
//! one GET route per read operation and backend. Every success is
//! `{"result": <text>}`; every failure is `{"error": <message>}` with a
//! status code derived from the error kind.

use crate::context::AppContext;
use crate::dispatch::{ToolRequest, RECENT_DEFAULT_DAYS};
use crate::facade::ServiceKind;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use servarr_common::ServarrError;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

type ApiResult = std::result::Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Query parameters for the recent/calendar endpoints
#[derive(Debug, Deserialize)]
struct DaysQuery {
    days: Option<i64>,
}

/// Query parameters for the search endpoints
#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

/// Build the HTTP router with all endpoints
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Sonarr endpoints
        .route("/api/sonarr/recent", get(sonarr_recent))
        .route("/api/sonarr/calendar", get(sonarr_calendar))
        .route("/api/sonarr/search", get(sonarr_search))
        .route("/api/sonarr/status", get(sonarr_status))
        .route("/api/sonarr/queue", get(sonarr_queue))
        // Radarr endpoints
        .route("/api/radarr/recent", get(radarr_recent))
        .route("/api/radarr/calendar", get(radarr_calendar))
        .route("/api/radarr/search", get(radarr_search))
        .route("/api/radarr/status", get(radarr_status))
        .route("/api/radarr/queue", get(radarr_queue))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(ctx)
}

/// Bind and serve the HTTP transport until a shutdown signal arrives
pub async fn serve(ctx: Arc<AppContext>, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP transport listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}

fn error_response(err: ServarrError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        ServarrError::Configuration { .. } => StatusCode::SERVICE_UNAVAILABLE,
        ServarrError::Validation { .. } | ServarrError::UnknownOperation { .. } => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({"error": err.to_string()})))
}

async fn run(ctx: &AppContext, request: ToolRequest) -> ApiResult {
    match request.execute(ctx).await {
        Ok(text) => Ok(Json(json!({"result": text}))),
        Err(e) => Err(error_response(e)),
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

async fn ready(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    // The context is fully built before the listener binds, so readiness
    // only ever reports the per-backend configuration state.
    Json(json!({
        "status": "ready",
        "sonarr_configured": ctx.is_configured(ServiceKind::Sonarr),
        "radarr_configured": ctx.is_configured(ServiceKind::Radarr),
    }))
}

async fn sonarr_recent(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<DaysQuery>,
) -> ApiResult {
    run(
        &ctx,
        ToolRequest::SonarrRecent {
            days: q.days.unwrap_or(RECENT_DEFAULT_DAYS),
        },
    )
    .await
}

async fn sonarr_calendar(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<DaysQuery>,
) -> ApiResult {
    run(&ctx, ToolRequest::SonarrCalendar { days: q.days }).await
}

async fn sonarr_search(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult {
    let query = require_query(q)?;
    run(&ctx, ToolRequest::SonarrSearch { query }).await
}

async fn sonarr_status(State(ctx): State<Arc<AppContext>>) -> ApiResult {
    run(&ctx, ToolRequest::SonarrStatus).await
}

async fn sonarr_queue(State(ctx): State<Arc<AppContext>>) -> ApiResult {
    run(&ctx, ToolRequest::SonarrQueue).await
}

async fn radarr_recent(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<DaysQuery>,
) -> ApiResult {
    run(
        &ctx,
        ToolRequest::RadarrRecent {
            days: q.days.unwrap_or(RECENT_DEFAULT_DAYS),
        },
    )
    .await
}

async fn radarr_calendar(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<DaysQuery>,
) -> ApiResult {
    run(&ctx, ToolRequest::RadarrCalendar { days: q.days }).await
}

async fn radarr_search(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult {
    let query = require_query(q)?;
    run(&ctx, ToolRequest::RadarrSearch { query }).await
}

async fn radarr_status(State(ctx): State<Arc<AppContext>>) -> ApiResult {
    run(&ctx, ToolRequest::RadarrStatus).await
}

async fn radarr_queue(State(ctx): State<Arc<AppContext>>) -> ApiResult {
    run(&ctx, ToolRequest::RadarrQueue).await
}

fn require_query(q: SearchQuery) -> Result<String, (StatusCode, Json<Value>)> {
    match q.query {
        Some(query) if !query.trim().is_empty() => Ok(query),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "query parameter required"})),
        )),
    }
}

use crate::infra::AppState;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Timelike, Utc};
use raydar::engine::{
    self, AssignmentOptions, AssignmentSummary, Coordinates, CronOptions, DailyCronResult, Lead,
    RankedLead, Setter, Territory,
};
use raydar::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/assignments/auto", post(auto_assign_endpoint))
        .route("/api/v1/assignments/preview", post(preview_endpoint))
        .route("/api/v1/cron/daily", post(daily_cron_endpoint))
        .route("/api/v1/territories/match", post(territory_match_endpoint))
        .route("/api/v1/leads/rank", post(rank_leads_endpoint))
        .layer(Extension(state))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssignmentRequest {
    pub(crate) leads: Vec<Lead>,
    pub(crate) users: Vec<Setter>,
    #[serde(default)]
    pub(crate) options: AssignmentOptions,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssignmentResponse {
    pub(crate) success: bool,
    pub(crate) summary: AssignmentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) leads: Option<Vec<Lead>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) users: Option<Vec<Setter>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CronRequest {
    pub(crate) leads: Vec<Lead>,
    pub(crate) users: Vec<Setter>,
    #[serde(default)]
    pub(crate) options: CronOptions,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CronResponse {
    pub(crate) success: bool,
    #[serde(flatten)]
    pub(crate) result: DailyCronResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TerritoryMatchRequest {
    pub(crate) point: Coordinates,
    pub(crate) territories: Vec<Territory>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TerritoryMatchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) territory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) owner_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RankRequest {
    pub(crate) leads: Vec<Lead>,
    #[serde(default)]
    pub(crate) current_hour: Option<u32>,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankResponse {
    pub(crate) leads: Vec<RankedLead>,
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn auto_assign_endpoint(
    Json(payload): Json<AssignmentRequest>,
) -> Json<AssignmentResponse> {
    let now = payload.now.unwrap_or_else(Utc::now);
    let outcome = engine::auto_assign(&payload.leads, &payload.users, &payload.options, now);

    Json(AssignmentResponse {
        success: true,
        summary: outcome.summary,
        leads: outcome.leads,
        users: outcome.setters,
    })
}

pub(crate) async fn preview_endpoint(
    Json(payload): Json<AssignmentRequest>,
) -> Json<AssignmentResponse> {
    let now = payload.now.unwrap_or_else(Utc::now);
    let summary = engine::preview_assignments(&payload.leads, &payload.users, &payload.options, now);

    Json(AssignmentResponse {
        success: true,
        summary,
        leads: None,
        users: None,
    })
}

pub(crate) async fn daily_cron_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CronRequest>,
) -> Result<Json<CronResponse>, AppError> {
    authorize_cron(&state, &headers)?;

    let now = payload.now.unwrap_or_else(Utc::now);
    let result = engine::run_daily_cron(&payload.leads, &payload.users, &payload.options, now);

    Ok(Json(CronResponse {
        success: true,
        result,
    }))
}

pub(crate) async fn territory_match_endpoint(
    Json(payload): Json<TerritoryMatchRequest>,
) -> Json<TerritoryMatchResponse> {
    let matched = engine::find_territory(payload.point, &payload.territories);

    Json(TerritoryMatchResponse {
        territory_id: matched.map(|t| t.id.clone()),
        owner_id: matched.map(|t| t.owner_id.clone()),
    })
}

pub(crate) async fn rank_leads_endpoint(Json(payload): Json<RankRequest>) -> Json<RankResponse> {
    let now = payload.now.unwrap_or_else(Utc::now);
    let current_hour = payload.current_hour.unwrap_or_else(|| now.hour());
    let leads = engine::knockability::rank(&payload.leads, current_hour, now);

    Json(RankResponse { leads })
}

/// The scheduled trigger authenticates with either a bearer token or the
/// platform cron header; both carry the shared secret. An unset secret
/// leaves the endpoint open for local development.
fn authorize_cron(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(secret) = state.cron_secret.as_deref() else {
        return Ok(());
    };

    let bearer_ok = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map_or(false, |token| token == secret);
    let cron_header_ok = headers
        .get("x-cron-key")
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value == secret);

    if bearer_ok || cron_header_ok {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

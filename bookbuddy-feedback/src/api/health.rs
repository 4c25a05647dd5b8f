//! Health check endpoints
//!
//! Neither endpoint requires the admin key.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use bookbuddy_common::feedback::FeedbackCounts;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

const MODULE_NAME: &str = "bookbuddy-feedback";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Result of probing the feedback store
#[derive(Debug, Serialize)]
pub struct StoreCheck {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<FeedbackCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub store: StoreCheck,
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    #[serde(flatten)]
    pub base: HealthResponse,
    pub checks: HealthChecks,
}

fn base(status: &'static str) -> HealthResponse {
    HealthResponse {
        status,
        module: MODULE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    }
}

/// GET /api/health
pub async fn health_check() -> Json<HealthResponse> {
    Json(base("ok"))
}

/// GET /api/health/detailed
///
/// 503 when the feedback document cannot be read. The error text is a
/// category only; file paths stay in the log.
pub async fn detailed_health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let (status, store) = match state.intake.store().counts().await {
        Ok(counts) => (
            StatusCode::OK,
            StoreCheck {
                status: "ok",
                counts: Some(counts),
                error: None,
            },
        ),
        Err(e) => {
            warn!("Store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                StoreCheck {
                    status: "error",
                    counts: None,
                    error: Some("feedback store unavailable".to_string()),
                },
            )
        }
    };

    let overall = if status == StatusCode::OK { "ok" } else { "error" };
    (
        status,
        Json(DetailedHealthResponse {
            base: base(overall),
            checks: HealthChecks { store },
        }),
    )
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/health/detailed", get(detailed_health_check))
}

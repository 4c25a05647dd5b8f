//! Admin dashboard endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use bookbuddy_common::feedback::FeedbackCounts;
use serde::Serialize;

use super::AdminQuery;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    #[serde(flatten)]
    pub counts: FeedbackCounts,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub stats: DashboardStats,
}

/// GET /api/admin/dashboard?admin_key=...
///
/// Same shared secret as the feedback listing.
pub async fn admin_dashboard(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> ApiResult<Json<DashboardResponse>> {
    let counts = state.intake.dashboard(query.admin_key.as_deref()).await?;

    Ok(Json(DashboardResponse {
        status: "ok",
        message: "Feedback dashboard data",
        stats: DashboardStats {
            total: counts.total(),
            counts,
        },
    }))
}

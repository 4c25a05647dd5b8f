//! bookbuddy-feedback library - Feedback intake service
//!
//! Accepts bug reports, feature requests and general feedback from the
//! BookBuddy frontend and persists them in the file-backed store. Reading
//! submissions back requires the admin shared secret.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod intake;

pub use intake::{FeedbackIntake, Rejection, RequestMeta};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<FeedbackIntake>,
}

impl AppState {
    pub fn new(intake: FeedbackIntake) -> Self {
        Self {
            intake: Arc::new(intake),
        }
    }
}

/// Build application router
///
/// Feedback reads and the dashboard check the shared secret themselves;
/// health and build info are public.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let feedback = Router::new()
        .route(
            "/api/feedback",
            get(api::list_feedback).post(api::submit_feedback),
        )
        .route("/api/admin/dashboard", get(api::admin_dashboard));

    let public = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(feedback)
        .merge(public)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

//! HTTP API handlers for bookbuddy-feedback

pub mod admin;
pub mod buildinfo;
pub mod feedback;
pub mod health;

pub use admin::admin_dashboard;
pub use buildinfo::get_build_info;
pub use feedback::{list_feedback, submit_feedback};
pub use health::health_routes;

use serde::Deserialize;

/// `?admin_key=` query parameter on protected reads
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    pub admin_key: Option<String>,
}

//! Feedback submission and listing endpoints
//!
//! POST /api/feedback: `{ "type": "bug"|"feature"|"feedback", "responses": [...] }`
//! GET  /api/feedback?admin_key=...: full feedback document
//!
//! A submission body over [`crate::MAX_BODY_BYTES`] is answered with 413;
//! any other unreadable body counts as an empty object.

use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use bookbuddy_common::FeedbackDocument;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::AdminQuery;
use crate::error::ApiResult;
use crate::intake::{Rejection, RequestMeta};
use crate::AppState;

/// Body of a 201 response
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
}

/// POST /api/feedback
///
/// A body that is not a JSON object is treated like one with no fields.
pub async fn submit_feedback(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    let mut body = match body {
        Ok(Json(value)) => value,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Oversized feedback body: {}", rejection);
            return Err(Rejection::PayloadTooLarge);
        }
        Err(rejection) => {
            debug!("Unparseable feedback body: {}", rejection);
            Value::Null
        }
    };

    let kind = body.get_mut("type").map(Value::take);
    let responses = body.get_mut("responses").map(Value::take);

    let meta = RequestMeta {
        ip: connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    };

    let accepted = state
        .intake
        .submit(kind.as_ref(), responses, meta)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: accepted.message,
        }),
    ))
}

/// GET /api/feedback?admin_key=...
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> ApiResult<Json<FeedbackDocument>> {
    let document = state.intake.list_all(query.admin_key.as_deref()).await?;
    Ok(Json(document))
}

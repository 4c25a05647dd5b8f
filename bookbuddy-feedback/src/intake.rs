//! Feedback intake service
//!
//! Validates submissions and routes them to the [`FeedbackStore`]; gates
//! reads behind an [`Authorizer`]. Framework-free: the HTTP layer in
//! [`crate::api`] only translates requests and [`Rejection`]s.

use std::sync::Arc;

use bookbuddy_common::auth::Authorizer;
use bookbuddy_common::feedback::{FeedbackCounts, FeedbackPayload, RecordMeta};
use bookbuddy_common::{FeedbackCategory, FeedbackDocument, FeedbackRecord, FeedbackStore};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

/// Message returned with every accepted submission
pub const THANK_YOU_MESSAGE: &str = "Thank you for your feedback!";

/// Placeholder for request metadata the transport could not supply
const UNKNOWN: &str = "unknown";

/// Why a request was not served
///
/// `Display` output is the client-facing message; details stay in the log.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Rejection {
    /// Missing `type`, or `responses` missing / not an array
    #[error("invalid feedback data")]
    InvalidData,

    /// `type` is present but not one of bug, feature or feedback
    #[error("invalid feedback type")]
    InvalidType,

    /// Body exceeded the transport's size cap
    #[error("payload too large")]
    PayloadTooLarge,

    #[error("unauthorized")]
    Unauthorized,

    /// Store failure
    #[error("internal error")]
    Internal,
}

/// Transport-level facts about the submitting client
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Successful submission
#[derive(Debug, Clone)]
pub struct Accepted {
    pub message: &'static str,
    pub record: FeedbackRecord,
}

/// Validates and persists feedback; serves the protected read side
pub struct FeedbackIntake {
    store: Arc<FeedbackStore>,
    authorizer: Arc<dyn Authorizer>,
}

impl FeedbackIntake {
    pub fn new(store: Arc<FeedbackStore>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { store, authorizer }
    }

    pub fn store(&self) -> &FeedbackStore {
        &self.store
    }

    /// Accept one submission
    ///
    /// Presence of both fields is checked before the category, so a body
    /// with neither field reports `invalid feedback data`. A `type` that
    /// is present but not a known category string, including a non-string
    /// value, reports `invalid feedback type`. Rejected submissions never
    /// reach the store.
    pub async fn submit(
        &self,
        kind: Option<&Value>,
        responses: Option<Value>,
        meta: RequestMeta,
    ) -> Result<Accepted, Rejection> {
        let (kind, responses) = match (kind, responses) {
            (Some(kind), Some(Value::Array(items))) => (kind, items),
            _ => {
                warn!("Rejected feedback: missing type or non-array responses");
                return Err(Rejection::InvalidData);
            }
        };

        let category: FeedbackCategory = kind
            .as_str()
            .and_then(|k| k.parse().ok())
            .ok_or_else(|| {
                warn!("Rejected feedback: unknown type {}", kind);
                Rejection::InvalidType
            })?;

        let payload = FeedbackPayload {
            responses,
            meta: RecordMeta {
                source_address: meta.ip.unwrap_or_else(|| UNKNOWN.to_string()),
                user_agent: meta.user_agent.unwrap_or_else(|| UNKNOWN.to_string()),
            },
        };

        match self.store.append(category, payload).await {
            Ok(record) => {
                info!(id = %record.id, %category, "Feedback accepted");
                Ok(Accepted {
                    message: THANK_YOU_MESSAGE,
                    record,
                })
            }
            Err(e) => {
                error!("Failed to save {} feedback: {}", category, e);
                Err(Rejection::Internal)
            }
        }
    }

    /// Full document, for callers holding the shared secret
    pub async fn list_all(&self, credential: Option<&str>) -> Result<FeedbackDocument, Rejection> {
        self.authorize(credential)?;

        self.store.read_all().await.map_err(|e| {
            error!("Failed to read feedback: {}", e);
            Rejection::Internal
        })
    }

    /// Per-category counts, for callers holding the shared secret
    pub async fn dashboard(&self, credential: Option<&str>) -> Result<FeedbackCounts, Rejection> {
        self.authorize(credential)?;

        self.store.counts().await.map_err(|e| {
            error!("Failed to count feedback: {}", e);
            Rejection::Internal
        })
    }

    fn authorize(&self, credential: Option<&str>) -> Result<(), Rejection> {
        if self.authorizer.is_authorized(credential) {
            Ok(())
        } else {
            warn!("Unauthorized feedback read attempt");
            Err(Rejection::Unauthorized)
        }
    }
}

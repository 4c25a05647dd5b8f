//! Feedback data model
//!
//! The persisted document is a single JSON object with three fixed,
//! always-present sequences:
//!
//! ```json
//! { "bugs": [...], "features": [...], "feedback": [...] }
//! ```
//!
//! Records are append-only: there is no update or delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Category of a feedback submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Bug,
    Feature,
    Feedback,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 3] = [
        FeedbackCategory::Bug,
        FeedbackCategory::Feature,
        FeedbackCategory::Feedback,
    ];

    /// Wire name used in submissions (`bug`, `feature`, `feedback`)
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::Bug => "bug",
            FeedbackCategory::Feature => "feature",
            FeedbackCategory::Feedback => "feedback",
        }
    }
}

impl std::fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeedbackCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bug" => Ok(FeedbackCategory::Bug),
            "feature" => Ok(FeedbackCategory::Feature),
            "feedback" => Ok(FeedbackCategory::Feedback),
            other => Err(format!("unknown feedback type: {other}")),
        }
    }
}

/// Request metadata captured alongside a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub source_address: String,
    pub user_agent: String,
}

/// What the intake layer hands to the store: everything except the
/// server-assigned id, timestamp and category
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPayload {
    pub responses: Vec<Value>,
    pub meta: RecordMeta,
}

/// One immutable, server-timestamped submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub category: FeedbackCategory,
    pub responses: Vec<Value>,
    pub meta: RecordMeta,
}

impl FeedbackRecord {
    /// Stamp a payload with a fresh id and the current time
    pub fn new(category: FeedbackCategory, payload: FeedbackPayload) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            category,
            responses: payload.responses,
            meta: payload.meta,
        }
    }
}

/// The whole persisted store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackDocument {
    pub bugs: Vec<FeedbackRecord>,
    pub features: Vec<FeedbackRecord>,
    pub feedback: Vec<FeedbackRecord>,
}

impl FeedbackDocument {
    pub fn records(&self, category: FeedbackCategory) -> &[FeedbackRecord] {
        match category {
            FeedbackCategory::Bug => &self.bugs,
            FeedbackCategory::Feature => &self.features,
            FeedbackCategory::Feedback => &self.feedback,
        }
    }

    fn records_mut(&mut self, category: FeedbackCategory) -> &mut Vec<FeedbackRecord> {
        match category {
            FeedbackCategory::Bug => &mut self.bugs,
            FeedbackCategory::Feature => &mut self.features,
            FeedbackCategory::Feedback => &mut self.feedback,
        }
    }

    /// Append to the sequence named by the record's category
    pub fn push(&mut self, record: FeedbackRecord) {
        self.records_mut(record.category).push(record);
    }

    pub fn counts(&self) -> FeedbackCounts {
        FeedbackCounts {
            bugs: self.bugs.len(),
            features: self.features.len(),
            feedback: self.feedback.len(),
        }
    }
}

/// Per-category record counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackCounts {
    pub bugs: usize,
    pub features: usize,
    pub feedback: usize,
}

impl FeedbackCounts {
    pub fn total(&self) -> usize {
        self.bugs + self.features + self.feedback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(text: &str) -> FeedbackPayload {
        FeedbackPayload {
            responses: vec![json!(text)],
            meta: RecordMeta {
                source_address: "127.0.0.1".to_string(),
                user_agent: "test-agent".to_string(),
            },
        }
    }

    #[test]
    fn test_empty_document_has_all_fields() {
        let value = serde_json::to_value(FeedbackDocument::default()).unwrap();
        assert_eq!(value, json!({ "bugs": [], "features": [], "feedback": [] }));
    }

    #[test]
    fn test_document_missing_field_rejected() {
        let result = serde_json::from_str::<FeedbackDocument>(r#"{ "bugs": [], "features": [] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_document_unknown_field_rejected() {
        let result = serde_json::from_str::<FeedbackDocument>(
            r#"{ "bugs": [], "features": [], "feedback": [], "extra": [] }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_wire_shape() {
        let record = FeedbackRecord::new(FeedbackCategory::Bug, payload("crash"));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["category"], "bug");
        assert_eq!(value["responses"], json!(["crash"]));
        assert_eq!(value["meta"]["sourceAddress"], "127.0.0.1");
        assert_eq!(value["meta"]["userAgent"], "test-agent");
        assert!(value["id"].as_str().is_some_and(|id| Uuid::parse_str(id).is_ok()));
        assert!(value["timestamp"].as_str().is_some_and(|ts| ts.parse::<DateTime<Utc>>().is_ok()));
    }

    #[test]
    fn test_record_ids_unique() {
        let a = FeedbackRecord::new(FeedbackCategory::Feedback, payload("a"));
        let b = FeedbackRecord::new(FeedbackCategory::Feedback, payload("a"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_push_routes_by_category() {
        let mut doc = FeedbackDocument::default();
        doc.push(FeedbackRecord::new(FeedbackCategory::Feature, payload("dark mode")));
        doc.push(FeedbackRecord::new(FeedbackCategory::Bug, payload("crash")));
        doc.push(FeedbackRecord::new(FeedbackCategory::Bug, payload("hang")));

        let counts = doc.counts();
        assert_eq!(counts.bugs, 2);
        assert_eq!(counts.features, 1);
        assert_eq!(counts.feedback, 0);
        assert_eq!(counts.total(), 3);
        assert_eq!(doc.records(FeedbackCategory::Bug)[1].responses, vec![json!("hang")]);
    }

    #[test]
    fn test_category_parse() {
        for category in FeedbackCategory::ALL {
            assert_eq!(category.as_str().parse::<FeedbackCategory>(), Ok(category));
        }
        assert!("Bug".parse::<FeedbackCategory>().is_err());
        assert!("unknown".parse::<FeedbackCategory>().is_err());
    }
}

//! Integration tests for the file-backed feedback store
//!
//! Tests cover:
//! - Idempotent initialization (never resets existing data)
//! - Append preserves prior records and other categories
//! - Round-trip integrity in submission order
//! - Corrupted documents surface as errors
//! - Concurrent appends within one process do not lose records

use std::sync::Arc;

use bookbuddy_common::feedback::{FeedbackPayload, RecordMeta};
use bookbuddy_common::{FeedbackCategory, FeedbackStore, StorageError};
use serde_json::{json, Value};
use tempfile::TempDir;

fn payload(responses: Vec<Value>) -> FeedbackPayload {
    FeedbackPayload {
        responses,
        meta: RecordMeta {
            source_address: "192.168.1.20".to_string(),
            user_agent: "store-tests/1.0".to_string(),
        },
    }
}

async fn fresh_store(tmp: &TempDir) -> FeedbackStore {
    let store = FeedbackStore::in_dir(&tmp.path().join("data"));
    store.ensure_initialized().await.expect("init should succeed");
    store
}

#[tokio::test]
async fn test_initialization_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let store = FeedbackStore::in_dir(&tmp.path().join("nested").join("data"));

    for _ in 0..3 {
        store.ensure_initialized().await.unwrap();
    }

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw, json!({ "bugs": [], "features": [], "feedback": [] }));
}

#[tokio::test]
async fn test_initialization_never_resets_data() {
    let tmp = TempDir::new().unwrap();
    let store = fresh_store(&tmp).await;
    store
        .append(FeedbackCategory::Bug, payload(vec![json!("crash on load")]))
        .await
        .unwrap();

    // Simulates a process restart
    let reopened = FeedbackStore::new(store.path());
    reopened.ensure_initialized().await.unwrap();

    let document = reopened.read_all().await.unwrap();
    assert_eq!(document.bugs.len(), 1);
}

#[tokio::test]
async fn test_append_preserves_prior_records() {
    let tmp = TempDir::new().unwrap();
    let store = fresh_store(&tmp).await;

    for i in 0..3 {
        store
            .append(FeedbackCategory::Bug, payload(vec![json!(format!("bug {i}"))]))
            .await
            .unwrap();
    }
    store
        .append(FeedbackCategory::Feedback, payload(vec![json!("love it")]))
        .await
        .unwrap();

    let before = store.counts().await.unwrap();
    store
        .append(FeedbackCategory::Bug, payload(vec![json!("bug 3")]))
        .await
        .unwrap();
    let after = store.counts().await.unwrap();

    assert_eq!(after.bugs, before.bugs + 1);
    assert_eq!(after.features, before.features);
    assert_eq!(after.feedback, before.feedback);
}

#[tokio::test]
async fn test_round_trip_in_submission_order() {
    let tmp = TempDir::new().unwrap();
    let store = fresh_store(&tmp).await;

    let submissions = [
        (FeedbackCategory::Feature, "dark mode"),
        (FeedbackCategory::Bug, "typo in chapter 3"),
        (FeedbackCategory::Feature, "bigger font"),
        (FeedbackCategory::Feedback, "great librarian"),
        (FeedbackCategory::Feature, "export notes"),
    ];

    let mut created = Vec::new();
    for (category, text) in submissions {
        created.push(store.append(category, payload(vec![json!(text)])).await.unwrap());
    }

    let document = store.read_all().await.unwrap();
    let feature_texts: Vec<_> = document
        .features
        .iter()
        .map(|r| r.responses[0].as_str().unwrap().to_string())
        .collect();

    assert_eq!(feature_texts, vec!["dark mode", "bigger font", "export notes"]);
    assert_eq!(document.bugs, vec![created[1].clone()]);
    assert_eq!(document.feedback, vec![created[3].clone()]);
}

#[tokio::test]
async fn test_opaque_responses_preserved() {
    let tmp = TempDir::new().unwrap();
    let store = fresh_store(&tmp).await;

    let responses = vec![json!(5), json!({ "q": "favourite character", "a": "Julia" }), json!(null)];
    store
        .append(FeedbackCategory::Feedback, payload(responses.clone()))
        .await
        .unwrap();

    let document = store.read_all().await.unwrap();
    assert_eq!(document.feedback[0].responses, responses);
}

#[tokio::test]
async fn test_corrupt_document_is_error() {
    let tmp = TempDir::new().unwrap();
    let store = fresh_store(&tmp).await;
    std::fs::write(store.path(), b"{ not json").unwrap();

    let err = store.read_all().await.unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { .. }), "got {err:?}");

    // Append must not paper over the corruption with a fresh document
    let append = store
        .append(FeedbackCategory::Bug, payload(vec![json!("x")]))
        .await;
    assert!(append.is_err());
    assert_eq!(std::fs::read(store.path()).unwrap(), b"{ not json");
}

#[tokio::test]
async fn test_wrong_shape_is_error() {
    let tmp = TempDir::new().unwrap();
    let store = fresh_store(&tmp).await;
    std::fs::write(store.path(), br#"{ "bugs": [] }"#).unwrap();

    assert!(matches!(
        store.read_all().await,
        Err(StorageError::Corrupt { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_appends_all_land() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(fresh_store(&tmp).await);

    let mut handles = Vec::new();
    for i in 0..25 {
        let store = Arc::clone(&store);
        let category = FeedbackCategory::ALL[i % 3];
        handles.push(tokio::spawn(async move {
            store.append(category, payload(vec![json!(i)])).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.total(), 25);
    assert_eq!(counts.bugs, 9);
    assert_eq!(counts.features, 8);
    assert_eq!(counts.feedback, 8);
}

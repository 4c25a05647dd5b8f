//! File-backed feedback store
//!
//! Owns the single JSON document holding every feedback record. All access
//! to the backing file goes through [`FeedbackStore`].
//!
//! # Write model
//!
//! `append` is a read-modify-write of the whole document. Within one process
//! the cycle is serialized by an async mutex, so concurrent submissions
//! cannot lose each other's records. Each write lands in a `.tmp` sibling
//! first and is renamed over the document, so readers see either the old or
//! the new document, never a partial one.
//!
//! Separate processes sharing one data directory are NOT coordinated; the
//! last rename wins.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::feedback::{
    FeedbackCategory, FeedbackCounts, FeedbackDocument, FeedbackPayload, FeedbackRecord,
};

/// File name of the feedback document inside the data directory
pub const FEEDBACK_FILE_NAME: &str = "feedback.json";

/// Append-only feedback store backed by one JSON file
#[derive(Debug)]
pub struct FeedbackStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackStore {
    /// Store backed by the document at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store backed by `<data_dir>/feedback.json`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(FEEDBACK_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the data directory and an empty document if missing
    ///
    /// Idempotent: an existing document is left untouched.
    pub async fn ensure_initialized(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let exists = fs::try_exists(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        if exists {
            debug!("Feedback document already present: {}", self.path.display());
            return Ok(());
        }

        self.write_document(&FeedbackDocument::default()).await?;
        info!("Created empty feedback document: {}", self.path.display());
        Ok(())
    }

    /// Stamp `payload` with a new id and timestamp and append it under `category`
    pub async fn append(
        &self,
        category: FeedbackCategory,
        payload: FeedbackPayload,
    ) -> Result<FeedbackRecord, StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        let record = FeedbackRecord::new(category, payload);
        document.push(record.clone());
        self.write_document(&document).await?;

        debug!(id = %record.id, %category, "Appended feedback record");
        Ok(record)
    }

    /// Read and parse the whole document
    ///
    /// A missing or malformed document is an error, never an empty result.
    pub async fn read_all(&self) -> Result<FeedbackDocument, StorageError> {
        self.read_document().await
    }

    /// Per-category record counts
    pub async fn counts(&self) -> Result<FeedbackCounts, StorageError> {
        Ok(self.read_document().await?.counts())
    }

    async fn read_document(&self) -> Result<FeedbackDocument, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Caller must hold `write_lock`
    ///
    /// On failure the temp file is removed and the previous document is
    /// left as it was.
    async fn write_document(&self, document: &FeedbackDocument) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(document).map_err(StorageError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");

        let result = match fs::write(&tmp, &json).await {
            Ok(()) => fs::rename(&tmp, &self.path)
                .await
                .map_err(|e| StorageError::io(&self.path, e)),
            Err(e) => Err(StorageError::io(&tmp, e)),
        };

        if result.is_err() {
            if let Err(e) = fs::remove_file(&tmp).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not remove {}: {}", tmp.display(), e);
                }
            }
        }
        result
    }
}

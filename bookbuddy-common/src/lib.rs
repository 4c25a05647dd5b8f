//! # BookBuddy Common Library
//!
//! Shared code for the BookBuddy services and tooling:
//! - Feedback data model and the file-backed feedback store
//! - Environment contract validation (startup gate)
//! - Bootstrap configuration loading and data folder resolution
//! - Pluggable authorization for protected reads

pub mod auth;
pub mod config;
pub mod env_check;
pub mod error;
pub mod feedback;
pub mod store;

pub use error::{ConfigError, StorageError};
pub use feedback::{FeedbackCategory, FeedbackDocument, FeedbackRecord};
pub use store::FeedbackStore;

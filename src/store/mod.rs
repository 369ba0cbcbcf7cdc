//! Storage abstraction for the directory.
//!
//! The [`ContactStore`] trait covers the two round trips the directory
//! needs: a filtered, sorted listing and a lookup by record id. Backends:
//!
//! | Backend | Purpose |
//! |---------|---------|
//! | [`airtable::AirtableStore`] | Airtable REST API |
//! | [`memory::InMemoryStore`] | Local fixtures for tests and demos |
//!
//! Implementations must be `Send + Sync`; one instance is shared by every
//! request handler.

pub mod airtable;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::filter::{ContactFilter, CATEGORY_FIELD, SORT_FIELD};
use crate::models::RawRecord;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures talking to a backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("request to remote store failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("remote store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not decode.
    #[error("unable to decode remote store response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured endpoint could not be turned into a request URL.
    #[error("invalid store url: {0}")]
    InvalidUrl(String),
}

/// What a listing should return.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter: ContactFilter,
    /// Columns to return. Empty means all columns.
    pub fields: Vec<String>,
    /// Column to sort ascending by, if any.
    pub sort: Option<String>,
}

impl ListOptions {
    /// Full contact rows matching `filter`, sorted by name.
    pub fn contacts(filter: ContactFilter) -> Self {
        Self {
            filter,
            fields: Vec::new(),
            sort: Some(SORT_FIELD.to_string()),
        }
    }

    /// Only the category column of every row.
    pub fn categories() -> Self {
        Self {
            filter: ContactFilter::default(),
            fields: vec![CATEGORY_FIELD.to_string()],
            sort: None,
        }
    }
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Returns every row matching `options`, in the requested order.
    async fn list(&self, options: &ListOptions) -> Result<Vec<RawRecord>>;

    /// Looks up one row. `Ok(None)` when the store has no such record.
    async fn find(&self, id: &str) -> Result<Option<RawRecord>>;
}

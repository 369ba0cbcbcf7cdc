//! The data-access adapter.
//!
//! [`Directory`] composes a [`ContactStore`] with the formatter, local
//! pagination and category aggregation. Each call is one stateless round
//! trip to the store; nothing is cached between calls.
//!
//! Store failures are logged with their cause and surfaced as a generic
//! [`DirectoryError::FetchFailed`], so callers never see backend detail.

use std::sync::Arc;

use thiserror::Error;

use crate::categories::collect_categories;
use crate::filter::ContactFilter;
use crate::format::format_record;
use crate::models::{Contact, PageResult};
use crate::paginate::{paginate, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::store::{ContactStore, ListOptions};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// The store could not be reached or answered with an error.
    #[error("failed to fetch {0}")]
    FetchFailed(&'static str),

    /// The store has no record with this id.
    #[error("contact not found: {0}")]
    NotFound(String),
}

/// Parameters of a contact listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub search: String,
    pub category: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            category: String::new(),
        }
    }
}

#[derive(Clone)]
pub struct Directory {
    store: Arc<dyn ContactStore>,
}

impl Directory {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    /// Lists one page of contacts matching `query`, sorted by name.
    pub async fn list_contacts(&self, query: &ListQuery) -> Result<PageResult, DirectoryError> {
        let filter = ContactFilter::new(&query.search, &query.category);

        let rows = self
            .store
            .list(&ListOptions::contacts(filter.clone()))
            .await
            .map_err(|e| {
                log::error!(
                    "error fetching contacts from {} (filter {:?}): {}",
                    self.store.name(),
                    filter,
                    e
                );
                DirectoryError::FetchFailed("contacts")
            })?;

        log::debug!(
            "fetched {} contacts from {} (filter {:?})",
            rows.len(),
            self.store.name(),
            filter
        );

        let formatted: Vec<Contact> = rows.into_iter().map(format_record).collect();
        Ok(paginate(formatted, query.page, query.page_size))
    }

    /// Fetches a single contact by its store id.
    pub async fn get_contact(&self, id: &str) -> Result<Contact, DirectoryError> {
        let record = self.store.find(id).await.map_err(|e| {
            log::error!(
                "error fetching contact {} from {}: {}",
                id,
                self.store.name(),
                e
            );
            DirectoryError::FetchFailed("contact")
        })?;

        match record {
            Some(r) => Ok(format_record(r)),
            None => {
                log::info!("contact {} not found in {}", id, self.store.name());
                Err(DirectoryError::NotFound(id.to_string()))
            }
        }
    }

    /// Every distinct category tag across all contacts, sorted.
    pub async fn list_categories(&self) -> Result<Vec<String>, DirectoryError> {
        let rows = self
            .store
            .list(&ListOptions::categories())
            .await
            .map_err(|e| {
                log::error!(
                    "error fetching categories from {}: {}",
                    self.store.name(),
                    e
                );
                DirectoryError::FetchFailed("categories")
            })?;

        Ok(collect_categories(
            rows.iter().map(|r| r.fields.category.as_deref()),
        ))
    }
}

//! # Contact Directory
//!
//! A contact directory service backed by an Airtable table.
//!
//! The service lists, searches, filters and paginates contact rows, returns
//! single contacts with their photo references, and aggregates the category
//! tags used across the table.
//!
//! ## Architecture
//!
//! ```text
//!  HTTP GET ──▶ server ──▶ Directory ──▶ ContactStore ──▶ Airtable
//!                              │
//!                              ├─ format    (raw row → Contact)
//!                              ├─ paginate  (slice + metadata)
//!                              └─ categories (split/trim/dedupe/sort)
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment credentials |
//! | [`models`] | Contact, photo, page and raw record types |
//! | [`format`] | Raw record → contact mapping |
//! | [`filter`] | Search/category filter and Airtable formula rendering |
//! | [`paginate`] | Local page slicing |
//! | [`categories`] | Category facet aggregation |
//! | [`store`] | Store trait with Airtable and in-memory backends |
//! | [`directory`] | List / get / categories operations |
//! | [`server`] | JSON HTTP API |

pub mod categories;
pub mod config;
pub mod directory;
pub mod filter;
pub mod format;
pub mod models;
pub mod paginate;
pub mod server;
pub mod store;

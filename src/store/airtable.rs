//! Airtable REST backend.
//!
//! Talks to the Airtable Web API directly with `reqwest`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list | `GET {api_url}/{base_id}/{table}?filterByFormula=..&sort[0][field]=Name&pageSize=100` |
//! | find | `GET {api_url}/{base_id}/{table}/{record_id}` |
//!
//! Requests carry `Authorization: Bearer <api key>`.
//!
//! A `404` from `find` means "no such record" only when its error type says
//! so (`NOT_FOUND`, `MODEL_ID_NOT_FOUND`). Any other `404`, such as
//! `TABLE_NOT_FOUND` for a misconfigured table, is a [`StoreError::Status`].
//!
//! # Pagination
//!
//! Airtable returns at most 100 records per response, plus an `offset`
//! token when more remain. Listings follow `offset` until it is absent, so
//! large tables are never truncated. `airtable.max_records` caps the total
//! when set.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::config::AirtableConfig;
use crate::models::RawRecord;

use super::{ContactStore, ListOptions, Result, StoreError};

/// Records requested per page; Airtable's maximum.
pub const PAGE_SIZE: usize = 100;

/// Longest error body kept in a [`StoreError::Status`].
const MAX_ERROR_BODY: usize = 500;

/// Error types Airtable reports for a record id that does not exist.
const MISSING_RECORD_ERRORS: &[&str] = &["NOT_FOUND", "MODEL_ID_NOT_FOUND"];

/// A single Airtable table, with one shared HTTP client.
pub struct AirtableStore {
    client: reqwest::Client,
    api_url: String,
    base_id: String,
    table: String,
    api_key: String,
    max_records: Option<usize>,
}

/// One page of a list response.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<RawRecord>,
    #[serde(default)]
    offset: Option<String>,
}

/// Airtable error payload. The error is either a bare code
/// (`{"error": "NOT_FOUND"}`) or an object with a `type`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Code(String),
    Typed {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl ErrorDetail {
    fn kind(&self) -> &str {
        match self {
            ErrorDetail::Code(code) => code,
            ErrorDetail::Typed { kind } => kind,
        }
    }
}

/// True when a `404` body says the record itself is missing.
fn is_missing_record(body: &str) -> bool {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|r| MISSING_RECORD_ERRORS.iter().any(|k| *k == r.error.kind()))
        .unwrap_or(false)
}

impl AirtableStore {
    /// Builds the store and its HTTP client from validated configuration.
    pub fn new(config: &AirtableConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let store = Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            base_id: config.base_id.clone(),
            table: config.table.clone(),
            api_key: config.api_key.clone(),
            max_records: config.max_records,
        };

        store.table_url(None)?;
        Ok(store)
    }

    /// `{api_url}/{base_id}/{table}[/{record_id}]`, with each segment
    /// percent-encoded.
    fn table_url(&self, record_id: Option<&str>) -> Result<Url> {
        let mut url =
            Url::parse(&self.api_url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::InvalidUrl(format!("{} cannot be a base", self.api_url)))?;
            segments.pop_if_empty().push(&self.base_id).push(&self.table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Query parameters for one page of a listing.
    fn list_params(&self, options: &ListOptions, offset: Option<&str>) -> Vec<(String, String)> {
        let mut params = vec![("pageSize".to_string(), PAGE_SIZE.to_string())];

        if let Some(formula) = options.filter.to_formula() {
            params.push(("filterByFormula".to_string(), formula));
        }
        if let Some(ref field) = options.sort {
            params.push(("sort[0][field]".to_string(), field.clone()));
            params.push(("sort[0][direction]".to_string(), "asc".to_string()));
        }
        for field in &options.fields {
            params.push(("fields[]".to_string(), field.clone()));
        }
        if let Some(max) = self.max_records {
            params.push(("maxRecords".to_string(), max.to_string()));
        }
        if let Some(token) = offset {
            params.push(("offset".to_string(), token.to_string()));
        }

        params
    }
}

/// Reads a response body, turning non-success statuses into
/// [`StoreError::Status`].
async fn read_body(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    Ok(body)
}

fn status_error(status: StatusCode, body: &str) -> StoreError {
    StoreError::Status {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY).collect(),
    }
}

#[async_trait]
impl ContactStore for AirtableStore {
    fn name(&self) -> &str {
        "airtable"
    }

    async fn list(&self, options: &ListOptions) -> Result<Vec<RawRecord>> {
        let url = self.table_url(None)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let params = self.list_params(options, offset.as_deref());
            let resp = self
                .client
                .get(url.clone())
                .bearer_auth(&self.api_key)
                .query(&params)
                .send()
                .await?;

            let body = read_body(resp).await?;
            let page: ListResponse = serde_json::from_str(&body)?;
            pages += 1;
            records.extend(page.records);

            if let Some(max) = self.max_records {
                if records.len() >= max {
                    records.truncate(max);
                    break;
                }
            }

            match page.offset {
                Some(token) if !token.is_empty() => offset = Some(token),
                _ => break,
            }
        }

        log::debug!(
            "airtable: listed {} records from {} in {} page(s)",
            records.len(),
            self.table,
            pages
        );
        Ok(records)
    }

    async fn find(&self, id: &str) -> Result<Option<RawRecord>> {
        let url = self.table_url(Some(id))?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            let body = resp.text().await?;
            if is_missing_record(&body) {
                return Ok(None);
            }
            log::warn!(
                "airtable: 404 looking up {} in {} is not a missing record: {}",
                id,
                self.table,
                body
            );
            return Err(status_error(StatusCode::NOT_FOUND, &body));
        }

        let body = read_body(resp).await?;
        Ok(Some(serde_json::from_str(&body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ContactFilter;

    fn config() -> AirtableConfig {
        AirtableConfig {
            api_url: "https://api.airtable.com/v0/".to_string(),
            table: "Family Contacts".to_string(),
            base_id: "appBASE".to_string(),
            api_key: "keyXYZ".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_table_url_encodes_segments() {
        let store = AirtableStore::new(&config()).unwrap();
        assert_eq!(
            store.table_url(None).unwrap().as_str(),
            "https://api.airtable.com/v0/appBASE/Family%20Contacts"
        );
        assert_eq!(
            store.table_url(Some("rec/1")).unwrap().as_str(),
            "https://api.airtable.com/v0/appBASE/Family%20Contacts/rec%2F1"
        );
    }

    #[test]
    fn test_invalid_api_url_fails_at_construction() {
        let mut cfg = config();
        cfg.api_url = "not a url".to_string();
        assert!(matches!(
            AirtableStore::new(&cfg),
            Err(StoreError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_list_params_for_contacts() {
        let store = AirtableStore::new(&config()).unwrap();
        let opts = ListOptions::contacts(ContactFilter::new("", "Work"));
        let params = store.list_params(&opts, Some("itr123"));
        let get = |k: &str| {
            params
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("pageSize"), Some("100"));
        assert_eq!(get("sort[0][field]"), Some("Name"));
        assert_eq!(get("sort[0][direction]"), Some("asc"));
        assert_eq!(
            get("filterByFormula"),
            Some("SEARCH(LOWER(\"Work\"), LOWER({Category}))")
        );
        assert_eq!(get("offset"), Some("itr123"));
        assert_eq!(get("fields[]"), None);
        assert_eq!(get("maxRecords"), None);
    }

    #[test]
    fn test_list_params_for_categories() {
        let mut cfg = config();
        cfg.max_records = Some(250);
        let store = AirtableStore::new(&cfg).unwrap();
        let params = store.list_params(&ListOptions::categories(), None);
        assert!(params.contains(&("fields[]".to_string(), "Category".to_string())));
        assert!(params.contains(&("maxRecords".to_string(), "250".to_string())));
        assert!(!params.iter().any(|(k, _)| k == "filterByFormula" || k == "offset"));
    }

    #[test]
    fn test_missing_record_detection() {
        assert!(is_missing_record(r#"{"error":"NOT_FOUND"}"#));
        assert!(is_missing_record(
            r#"{"error":{"type":"MODEL_ID_NOT_FOUND","message":"Could not find a record"}}"#
        ));
        assert!(!is_missing_record(
            r#"{"error":{"type":"TABLE_NOT_FOUND","message":"Could not find table"}}"#
        ));
        assert!(!is_missing_record("<html>Not Found</html>"));
        assert!(!is_missing_record(""));
    }
}

//! JSON HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/contacts` | Paginated, filtered contact listing |
//! | `GET`  | `/api/contacts?getCategories=true` | All category tags |
//! | `GET`  | `/api/contacts/{id}` | A single contact |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Query parameters for `/api/contacts`
//!
//! `page` (default 1), `pageSize` (default 24), `search`, `category`,
//! `getCategories`. Missing or unusable values fall back to their defaults
//! and a repeated key keeps its first value; nothing is rejected.
//!
//! # Error Contract
//!
//! ```json
//! { "error": "Failed to fetch contacts" }
//! ```
//!
//! `405` for any method other than `GET` on the contact routes, `404` when a
//! contact id is unknown, `500` when the store fails. Messages are fixed
//! strings; backend detail only goes to the log.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::directory::{Directory, DirectoryError, ListQuery};
use crate::paginate::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::store::airtable::AirtableStore;
use crate::store::ContactStore;

/// Shared state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    directory: Directory,
}

/// Starts the HTTP server against the configured Airtable table.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = AirtableStore::new(&config.airtable)?;
    run_server_with_store(config, Arc::new(store)).await
}

/// Starts the HTTP server against any [`ContactStore`].
pub async fn run_server_with_store(
    config: &Config,
    store: Arc<dyn ContactStore>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(Directory::new(store));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("directory server listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router.
pub fn router(directory: Directory) -> Router {
    let state = AppState { directory };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/contacts",
            get(handle_contacts).fallback(method_not_allowed),
        )
        .route(
            "/api/contacts/{id}",
            get(handle_contact).fallback(method_not_allowed),
        )
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: &'static str,
}

impl AppError {
    fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

async fn method_not_allowed() -> AppError {
    AppError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/contacts ============

/// Raw query parameters. Kept as strings so bad numbers fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default)]
struct ContactsParams {
    page: Option<String>,
    page_size: Option<String>,
    search: Option<String>,
    category: Option<String>,
    get_categories: Option<String>,
}

impl ContactsParams {
    /// Picks the known keys out of the decoded query pairs. The first
    /// occurrence of a key wins; unknown keys are ignored.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "pageSize" => &mut params.page_size,
                "search" => &mut params.search,
                "category" => &mut params.category,
                "getCategories" => &mut params.get_categories,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<String>,
}

/// Parses the leading decimal digits of `raw` (`"3"`, `" 3 "`, `"3rd"` → 3).
/// Missing, non-numeric and zero values yield `default`.
fn parse_positive(raw: Option<&str>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => default,
    }
}

fn list_query(params: &ContactsParams) -> ListQuery {
    let trimmed = |v: &Option<String>| v.as_deref().unwrap_or("").trim().to_string();

    ListQuery {
        page: parse_positive(params.page.as_deref(), DEFAULT_PAGE),
        page_size: parse_positive(params.page_size.as_deref(), DEFAULT_PAGE_SIZE),
        search: trimmed(&params.search),
        category: trimmed(&params.category),
    }
}

async fn handle_contacts(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let params = ContactsParams::from_pairs(pairs);
    let fetch_failed =
        |_: DirectoryError| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch contacts");

    if params.get_categories.as_deref() == Some("true") {
        let categories = state
            .directory
            .list_categories()
            .await
            .map_err(fetch_failed)?;
        return Ok(Json(CategoriesResponse { categories }).into_response());
    }

    let query = list_query(&params);
    let page = state
        .directory
        .list_contacts(&query)
        .await
        .map_err(fetch_failed)?;

    Ok(Json(page).into_response())
}

// ============ GET /api/contacts/{id} ============

async fn handle_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "Contact ID is required",
        ));
    }

    match state.directory.get_contact(&id).await {
        Ok(contact) => Ok(Json(contact).into_response()),
        Err(DirectoryError::NotFound(_)) => Err(AppError::new(
            StatusCode::NOT_FOUND,
            "Contact not found",
        )),
        Err(DirectoryError::FetchFailed(_)) => Err(AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch contact",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive(None, 24), 24);
        assert_eq!(parse_positive(Some("3"), 1), 3);
        assert_eq!(parse_positive(Some(" 12 "), 1), 12);
        assert_eq!(parse_positive(Some("2abc"), 1), 2);
        assert_eq!(parse_positive(Some("abc"), 1), 1);
        assert_eq!(parse_positive(Some("0"), 24), 24);
        assert_eq!(parse_positive(Some("-4"), 24), 24);
        assert_eq!(parse_positive(Some(""), 7), 7);
    }

    #[test]
    fn test_list_query_defaults_and_trimming() {
        let q = list_query(&ContactsParams::default());
        assert_eq!(q, ListQuery::default());

        let q = list_query(
            &ContactsParams {
                page: Some("2".into()),
                page_size: Some("500".into()),
                search: Some("  anna ".into()),
                category: Some(" Work".into()),
                get_categories: None,
            },
        );
        assert_eq!(q.page, 2);
        assert_eq!(q.page_size, 500);
        assert_eq!(q.search, "anna");
        assert_eq!(q.category, "Work");
    }

    #[test]
    fn test_params_first_occurrence_wins() {
        let pairs = vec![
            ("category".to_string(), "Family".to_string()),
            ("category".to_string(), "Work".to_string()),
            ("pageSize".to_string(), "10".to_string()),
            ("pageSize".to_string(), "x".to_string()),
            ("utm_source".to_string(), "mail".to_string()),
        ];
        let params = ContactsParams::from_pairs(pairs);
        assert_eq!(params.category.as_deref(), Some("Family"));
        assert_eq!(params.page_size.as_deref(), Some("10"));
        assert_eq!(params.page, None);
        assert_eq!(params.get_categories, None);
    }
}

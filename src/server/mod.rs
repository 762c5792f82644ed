//! HTTP API for Pagelens
//!
//! Thin surface over the analysis core:
//! - `GET <base>/ping` - liveness check
//! - `GET <base>/page-contents?url=<absolute url>` - run one analysis
//!
//! Every request gets its own session id, so concurrent requests are fully
//! isolated from one another. Responses wrap their payload in a `results`
//! envelope.

use crate::analyzer::{build_http_client, SessionCoordinator};
use crate::config::Config;
use crate::session::SessionId;
use crate::storage::SessionStore;
use crate::PagelensError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared state for all request handlers
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn SessionStore>,
    client: Client,
}

impl AppState {
    pub fn new(config: Arc<Config>, store: Arc<dyn SessionStore>) -> Result<Self, PagelensError> {
        let client = build_http_client()?;
        Ok(Self {
            config,
            store,
            client,
        })
    }
}

/// Builds the axum router with all endpoints under the configured base path
pub fn router(state: Arc<AppState>) -> Router {
    let base = state.config.server.base_path.clone();

    Router::new()
        .route(&format!("{base}/ping"), get(ping))
        .route(&format!("{base}/page-contents"), get(page_contents))
        .with_state(state)
}

/// Binds the configured address and serves the API until shutdown
pub async fn serve(config: Config, store: Arc<dyn SessionStore>) -> Result<(), PagelensError> {
    let bind_address = config.server.bind_address.clone();
    let state = Arc::new(AppState::new(Arc::new(config), store)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Pagelens API listening on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn ping() -> Json<Value> {
    Json(json!({ "results": "pong" }))
}

#[derive(Debug, Deserialize)]
struct ContentsQuery {
    url: Option<String>,
}

/// Runs one analysis and returns the aggregated snapshot
async fn page_contents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContentsQuery>,
) -> Result<Json<Value>, ApiError> {
    let url = query.url.unwrap_or_default();

    let session = SessionId::new();
    tracing::info!("Session {} analyzing '{}'", session, url);

    let coordinator = SessionCoordinator::new(
        session,
        state.config.clone(),
        state.store.clone(),
        state.client.clone(),
    );

    coordinator.reset().map_err(PagelensError::Store)?;
    coordinator.visit(&url).await?;
    let snapshot = coordinator.snapshot().map_err(PagelensError::Store)?;

    Ok(Json(json!({ "results": snapshot })))
}

/// Maps analysis errors onto HTTP statuses
struct ApiError(PagelensError);

impl From<PagelensError> for ApiError {
    fn from(error: PagelensError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PagelensError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            PagelensError::FetchTimeout { .. } | PagelensError::RootFetch { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Request rejected: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_router_builds_with_default_config() {
        let state = Arc::new(
            AppState::new(Arc::new(Config::default()), Arc::new(MemoryStore::new())).unwrap(),
        );
        let _router = router(state);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                PagelensError::InvalidUrl {
                    url: "x".into(),
                    reason: "relative".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                PagelensError::FetchTimeout { url: "x".into() },
                StatusCode::BAD_GATEWAY,
            ),
            (
                PagelensError::RootFetch {
                    url: "x".into(),
                    message: "refused".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                PagelensError::ProbeJoin("panic".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = ApiError(error).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}

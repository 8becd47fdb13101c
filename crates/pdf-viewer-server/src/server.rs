//! HTTP shell for the viewer
//!
//! Provides /, /home, /show_pdf and /health endpoints.

use crate::types::{HealthResponse, HomeResponse, Route};
use crate::viewer::ResponseViewer;
use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use pdf_cache::{DocumentCache, DocumentView, ViewState, ViewerOptions};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Shared state for the HTTP server
pub struct ServerState {
    pub cache: DocumentCache,
    pub document_url: String,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(cache: DocumentCache, document_url: String) -> Self {
        Self {
            cache,
            document_url,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route(Route::Home.path(), get(home))
        .route(Route::ShowPdf.path(), get(show_pdf))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Landing screen
async fn home(State(state): State<SharedState>) -> Json<HomeResponse> {
    Json(HomeResponse {
        route: Route::Home,
        document_url: state.document_url.clone(),
        next: Route::ShowPdf.path(),
        routes: Route::ALL.iter().map(|r| r.path()).collect(),
    })
}

/// Fetch the configured document through the cache and render it
async fn show_pdf(State(state): State<SharedState>) -> Response {
    let mut view = DocumentView::new(ResponseViewer::default(), ViewerOptions::default());

    let rendered = match view.show(&state.cache, Some(&state.document_url)).await {
        ViewState::Loaded => {
            let from_cache = view.viewer().from_cache();
            view.viewer_mut()
                .take_body()
                .map(|body| (body, from_cache))
        }
        ViewState::Loading | ViewState::Failed => None,
    };
    view.dispose();

    match rendered {
        Some((body, from_cache)) => {
            let cache_header = if from_cache { "HIT" } else { "MISS" };
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf"),
                    (X_CACHE, cache_header),
                ],
                body,
            )
                .into_response()
        }
        None => {
            warn!(url = %state.document_url, "No document available");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Document unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: state.cache.stats(),
    })
}

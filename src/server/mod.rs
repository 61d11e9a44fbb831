// src/server/mod.rs
//! HTTP surface of the portal.
//!
//! Handlers are thin pass-throughs to the adapter held in `AppState`. The
//! adapter is built once before the router exists and never changes.

mod handlers;
mod pages;
mod response;

pub use pages::Pages;
pub use response::ErrorBody;

use crate::api::Backend;
use crate::error::AppError;
use axum::{
    extract::Request,
    http::{self, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

/// The adapter, or why it could not be built.
pub enum AdapterSlot {
    Ready(Arc<dyn Backend>),
    Unavailable { reason: String },
}

impl AdapterSlot {
    /// Keeps a construction failure as the reason every data endpoint reports.
    pub fn from_result(result: Result<Arc<dyn Backend>, AppError>) -> Self {
        match result {
            Ok(backend) => Self::Ready(backend),
            Err(AppError::Configuration(reason)) => Self::Unavailable { reason },
            Err(other) => Self::Unavailable {
                reason: other.to_string(),
            },
        }
    }
}

/// Shared application state for the HTTP API.
pub struct AppState {
    adapter: AdapterSlot,
    pages: Pages,
}

impl AppState {
    pub fn new(adapter: AdapterSlot, pages: Pages) -> Self {
        Self { adapter, pages }
    }

    /// The configured adapter, or the configuration error explaining its absence.
    pub fn backend(&self) -> Result<&Arc<dyn Backend>, AppError> {
        match &self.adapter {
            AdapterSlot::Ready(backend) => Ok(backend),
            AdapterSlot::Unavailable { reason } => Err(AppError::Configuration(reason.clone())),
        }
    }

    pub fn pages(&self) -> &Pages {
        &self.pages
    }
}

/// Create the axum Router with all portal routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Page
        .route("/", get(handlers::handle_root))
        // API
        .route(
            "/api/entries",
            get(handlers::handle_list_entries).post(handlers::handle_create_entry),
        )
        .route(
            "/api/projects",
            get(handlers::handle_list_projects).post(handlers::handle_create_project),
        )
        .route("/api/priority-task", get(handlers::handle_priority_task))
        // Health
        .route("/health", get(handlers::handle_health))
        .layer(middleware::from_fn(log_requests))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::OPTIONS])
                .allow_headers([http::header::CONTENT_TYPE]),
        )
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = started.elapsed().as_millis();
    if status.is_server_error() || status == StatusCode::UNPROCESSABLE_ENTITY {
        log::warn!("{} {} -> {} ({} ms)", method, path, status.as_u16(), elapsed);
    } else {
        log::info!("{} {} -> {} ({} ms)", method, path, status.as_u16(), elapsed);
    }
    response
}

/// Start the HTTP server on the given address.
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("HTTP server listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

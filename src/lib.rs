// src/lib.rs
//! lean-portal library: a small web portal that captures notes and projects
//! into either a Notion workspace or a generic REST backend.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `PortalConfig`, `BackendSettings`
//! - **Domain model**: `Entry`, `Project`, `PriorityTask`, `Created`
//! - **Domain types**: `ApiKey`, `BaseUrl`, `EndpointPath`, `NotionId`
//! - **Adapter**: the `Backend` trait and its two implementations
//! - **Server**: `AppState`, `create_router`, `serve`

mod api;
mod config;
mod constants;
mod error;
mod model;
mod server;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{
    BackendKind, BackendSettings, CommandLineInput, NotionDatabases, NotionSettings, PortalConfig,
    RestRoutes, RestSettings,
};
pub use crate::constants::{
    DEFAULT_ENTRY_LIMIT, ENTRY_CREATED_MESSAGE, MAX_LIST_LIMIT, NOTION_VERSION, NO_TASKS_MESSAGE,
    PROJECT_CREATED_MESSAGE,
};

// --- Domain Model ---
pub use crate::model::{Created, Entry, NewEntry, NewProject, PriorityTask, Project};

// --- Domain Types ---
pub use crate::types::{ApiKey, BaseUrl, EndpointPath, NotionId};

// --- Adapter ---
pub use crate::api::{
    client::{ApiResponse, HttpTransport},
    connect,
    parser::{normalize_created, normalize_entries, normalize_priority_task, normalize_projects},
    Backend, NotionBackend, RestBackend,
};

// --- Server ---
pub use crate::server::{create_router, serve, AdapterSlot, AppState, ErrorBody, Pages};

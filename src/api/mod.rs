// src/api/mod.rs
//! Backend adapter: the portal's only way to reach persistent storage.
//!
//! Two implementations sit behind one trait. Both speak to their backend
//! over HTTP and normalize every response into the shapes in `crate::model`,
//! so handlers never see which backend answered.

pub mod client;
pub mod notion;
pub mod parser;
mod responses;
pub mod rest;

use crate::config::{BackendKind, BackendSettings};
use crate::error::AppError;
use crate::model::{Created, Entry, NewEntry, NewProject, PriorityTask, Project};
use std::sync::Arc;
use std::time::Duration;

/// The ability to store and retrieve portal data.
///
/// Each call issues exactly one outbound request. Failures come back as
/// classified `AppError`s and are never retried.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn create_entry(&self, entry: &NewEntry) -> Result<Created, AppError>;
    /// Newest first, at most `limit` items.
    async fn get_entries(&self, limit: usize) -> Result<Vec<Entry>, AppError>;
    async fn create_project(&self, project: &NewProject) -> Result<Created, AppError>;
    async fn get_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn get_priority_task(&self) -> Result<PriorityTask, AppError>;

    /// Checks that the backend is reachable with the configured credentials.
    async fn verify(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Builds the adapter for the configured backend.
pub fn connect(settings: &BackendSettings, timeout: Duration) -> Result<Arc<dyn Backend>, AppError> {
    let backend: Arc<dyn Backend> = match settings {
        BackendSettings::Notion(notion) => Arc::new(notion::NotionBackend::new(notion, timeout)?),
        BackendSettings::Rest(rest) => Arc::new(rest::RestBackend::new(rest, timeout)?),
    };
    log::info!("Using {} backend", backend.kind());
    Ok(backend)
}

pub use client::HttpTransport;
pub use notion::NotionBackend;
pub use rest::RestBackend;

// src/api/rest.rs
//! Backend for a generic notes/projects REST API.

use super::client::HttpTransport;
use super::parser::{normalize_created, normalize_entries, normalize_priority_task, normalize_projects};
use super::Backend;
use crate::config::{BackendKind, RestRoutes, RestSettings};
use crate::constants::{ENTRY_CREATED_MESSAGE, ENTRY_TITLE_MAX_CHARS, PROJECT_CREATED_MESSAGE};
use crate::error::AppError;
use crate::model::{Created, Entry, NewEntry, NewProject, PriorityTask, Project};
use crate::types::first_chars;
use reqwest::header;
use serde::Serialize;
use std::time::Duration;

pub struct RestBackend {
    transport: HttpTransport,
    routes: RestRoutes,
}

/// Body of `POST` to the entries route. The notes API requires a title, so
/// one is derived from the content.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EntryPayload<'a> {
    pub title: String,
    pub content: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub tags: &'a [String],
}

impl<'a> From<&'a NewEntry> for EntryPayload<'a> {
    fn from(entry: &'a NewEntry) -> Self {
        Self {
            title: first_chars(entry.content(), ENTRY_TITLE_MAX_CHARS),
            content: entry.content(),
            tags: entry.tags(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ProjectPayload<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<&'a str>,
}

impl<'a> From<&'a NewProject> for ProjectPayload<'a> {
    fn from(project: &'a NewProject) -> Self {
        Self {
            name: project.name(),
            description: project.description(),
            deadline: project.deadline(),
        }
    }
}

impl RestBackend {
    pub fn new(settings: &RestSettings, timeout: Duration) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let transport = HttpTransport::new(settings.base_url.clone(), headers, timeout)?;
        Ok(Self {
            transport,
            routes: settings.routes.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Backend for RestBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Rest
    }

    async fn create_entry(&self, entry: &NewEntry) -> Result<Created, AppError> {
        let endpoint = self.routes.entries.as_str();
        let response = self
            .transport
            .post(endpoint, &EntryPayload::from(entry))
            .await?;
        self.transport
            .normalized(endpoint, normalize_created(response, ENTRY_CREATED_MESSAGE))
    }

    async fn get_entries(&self, limit: usize) -> Result<Vec<Entry>, AppError> {
        // The notes API has no paging parameter; the limit applies here.
        let endpoint = self.routes.entries.as_str();
        let response = self.transport.get(endpoint).await?;
        self.transport
            .normalized(endpoint, normalize_entries(response, limit))
    }

    async fn create_project(&self, project: &NewProject) -> Result<Created, AppError> {
        let endpoint = self.routes.projects.as_str();
        let response = self
            .transport
            .post(endpoint, &ProjectPayload::from(project))
            .await?;
        self.transport
            .normalized(endpoint, normalize_created(response, PROJECT_CREATED_MESSAGE))
    }

    async fn get_projects(&self) -> Result<Vec<Project>, AppError> {
        let endpoint = self.routes.projects.as_str();
        let response = self.transport.get(endpoint).await?;
        self.transport.normalized(endpoint, normalize_projects(response))
    }

    async fn get_priority_task(&self) -> Result<PriorityTask, AppError> {
        let endpoint = self.routes.priority_task.as_str();
        let response = self.transport.get(endpoint).await?;
        self.transport
            .normalized(endpoint, normalize_priority_task(response))
    }

    async fn verify(&self) -> Result<(), AppError> {
        self.transport.get(self.routes.projects.as_str()).await?;
        log::info!("REST backend reachable at {}", self.transport.base_url());
        Ok(())
    }
}

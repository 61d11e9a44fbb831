// src/api/notion.rs
//! Backend that talks to a Notion workspace directly.
//!
//! Entries, projects and tasks each live in their own database. Writes
//! create pages; reads are single database queries whose sorting and
//! filtering happen on Notion's side.

use super::client::HttpTransport;
use super::parser::{normalize_created, normalize_entries, normalize_priority_task, normalize_projects};
use super::Backend;
use crate::config::{BackendKind, NotionDatabases, NotionSettings};
use crate::constants::{
    notion_properties as props, ENTRY_CREATED_MESSAGE, MAX_LIST_LIMIT, NOTION_VERSION,
    PROJECT_ACTIVE_STATUS, PROJECT_CREATED_MESSAGE, TASK_COMPLETED_STATUS,
};
use crate::error::AppError;
use crate::model::{Created, Entry, NewEntry, NewProject, PriorityTask, Project};
use crate::types::{ApiKey, NotionId};
use reqwest::header;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Notion caps a single rich-text item at this many characters.
const NOTION_TEXT_CHUNK_CHARS: usize = 2000;

pub struct NotionBackend {
    transport: HttpTransport,
    databases: NotionDatabases,
}

impl NotionBackend {
    pub fn new(settings: &NotionSettings, timeout: Duration) -> Result<Self, AppError> {
        let transport = HttpTransport::new(
            settings.base_url.clone(),
            create_headers(&settings.token)?,
            timeout,
        )?;
        Ok(Self {
            transport,
            databases: settings.databases.clone(),
        })
    }

    async fn query<T, F>(&self, database: &NotionId, body: &Value, normalize: F) -> Result<T, AppError>
    where
        F: FnOnce(Value) -> Result<T, AppError>,
    {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let response = self.transport.post(&endpoint, body).await?;
        self.transport.normalized(&endpoint, normalize(response))
    }
}

/// Creates the default headers for Notion API requests.
fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
    let mut headers = header::HeaderMap::new();

    let auth_header = format!("Bearer {}", api_key.as_str());
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&auth_header).map_err(|e| {
            AppError::Configuration(format!("Invalid API token format: {}", e))
        })?,
    );

    headers.insert(
        "Notion-Version",
        header::HeaderValue::from_static(NOTION_VERSION),
    );

    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    Ok(headers)
}

#[async_trait::async_trait]
impl Backend for NotionBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Notion
    }

    async fn create_entry(&self, entry: &NewEntry) -> Result<Created, AppError> {
        let body = entry_page(&self.databases.entries, entry, &now());
        let response = self.transport.post("pages", &body).await?;
        log::info!("Captured entry in database {}", self.databases.entries);
        self.transport
            .normalized("pages", normalize_created(response, ENTRY_CREATED_MESSAGE))
    }

    async fn get_entries(&self, limit: usize) -> Result<Vec<Entry>, AppError> {
        self.query(&self.databases.entries, &entries_query(limit), |response| {
            normalize_entries(response, limit)
        })
        .await
    }

    async fn create_project(&self, project: &NewProject) -> Result<Created, AppError> {
        let body = project_page(&self.databases.projects, project, &now());
        let response = self.transport.post("pages", &body).await?;
        log::info!("Created project in database {}", self.databases.projects);
        self.transport
            .normalized("pages", normalize_created(response, PROJECT_CREATED_MESSAGE))
    }

    async fn get_projects(&self) -> Result<Vec<Project>, AppError> {
        self.query(&self.databases.projects, &projects_query(), normalize_projects)
            .await
    }

    async fn get_priority_task(&self) -> Result<PriorityTask, AppError> {
        self.query(&self.databases.tasks, &priority_task_query(), normalize_priority_task)
            .await
    }

    async fn verify(&self) -> Result<(), AppError> {
        self.transport.get("users/me").await?;
        log::info!("Notion connection verified at {}", self.transport.base_url());
        Ok(())
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Splits text into rich-text items Notion will accept.
fn text_segments(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    chars
        .chunks(NOTION_TEXT_CHUNK_CHARS)
        .map(|chunk| {
            let content: String = chunk.iter().collect();
            json!({"text": {"content": content}})
        })
        .collect()
}

fn date(start: &str) -> Value {
    json!({"date": {"start": start}})
}

/// Page payload for a new entry.
pub fn entry_page(database: &NotionId, entry: &NewEntry, created: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(
        props::CONTENT.to_string(),
        json!({"title": text_segments(entry.content())}),
    );
    properties.insert(props::CREATED.to_string(), date(created));
    if !entry.tags().is_empty() {
        let options: Vec<Value> = entry.tags().iter().map(|t| json!({"name": t})).collect();
        properties.insert(props::TAGS.to_string(), json!({"multi_select": options}));
    }

    json!({
        "parent": {"database_id": database.to_hyphenated()},
        "properties": properties,
    })
}

/// Page payload for a new project.
pub fn project_page(database: &NotionId, project: &NewProject, created: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(
        props::NAME.to_string(),
        json!({"title": text_segments(project.name())}),
    );
    properties.insert(
        props::DESCRIPTION.to_string(),
        json!({"rich_text": text_segments(project.description())}),
    );
    properties.insert(
        props::STATUS.to_string(),
        json!({"select": {"name": PROJECT_ACTIVE_STATUS}}),
    );
    properties.insert(props::CREATED.to_string(), date(created));
    if let Some(deadline) = project.deadline() {
        properties.insert(props::DEADLINE.to_string(), date(deadline));
    }

    json!({
        "parent": {"database_id": database.to_hyphenated()},
        "properties": properties,
    })
}

/// Newest entries first.
pub fn entries_query(limit: usize) -> Value {
    json!({
        "sorts": [{"property": props::CREATED, "direction": "descending"}],
        "page_size": limit.clamp(1, MAX_LIST_LIMIT),
    })
}

pub fn projects_query() -> Value {
    json!({
        "sorts": [{"property": props::CREATED, "direction": "descending"}],
        "page_size": MAX_LIST_LIMIT,
    })
}

/// Highest priority first, oldest first among equals, completed tasks excluded.
pub fn priority_task_query() -> Value {
    json!({
        "filter": {
            "property": props::STATUS,
            "select": {"does_not_equal": TASK_COMPLETED_STATUS}
        },
        "sorts": [
            {"property": props::PRIORITY, "direction": "descending"},
            {"property": props::CREATED, "direction": "ascending"}
        ],
        "page_size": 1,
    })
}

// src/config.rs
use crate::constants::{
    NOTION_API_BASE_URL, REQUEST_TIMEOUT_SECS, REST_ENTRIES_PATH, REST_PRIORITY_TASK_PATH,
    REST_PROJECTS_PATH,
};
use crate::error::AppError;
use crate::types::{ApiKey, BaseUrl, EndpointPath, NotionId};
use clap::{Parser, ValueEnum};
use std::fmt;
use std::time::Duration;

pub const ENV_BACKEND: &str = "PORTAL_BACKEND";
pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
pub const ENV_REST_ENTRIES_PATH: &str = "REST_ENTRIES_PATH";
pub const ENV_REST_PROJECTS_PATH: &str = "REST_PROJECTS_PATH";
pub const ENV_REST_PRIORITY_TASK_PATH: &str = "REST_PRIORITY_TASK_PATH";
pub const ENV_NOTION_TOKEN: &str = "NOTION_TOKEN";
pub const ENV_NOTION_API_KEY: &str = "NOTION_API_KEY";
pub const ENV_NOTION_API_BASE_URL: &str = "NOTION_API_BASE_URL";
pub const ENV_NOTION_ENTRIES_DB: &str = "NOTION_ENTRIES_DB";
pub const ENV_NOTION_PROJECTS_DB: &str = "NOTION_PROJECTS_DB";
pub const ENV_NOTION_TASKS_DB: &str = "NOTION_TASKS_DB";

/// Which kind of backend the adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Direct Notion workspace integration
    Notion,
    /// Generic notes/projects REST API
    Rest,
}

impl BackendKind {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "notion" => Some(Self::Notion),
            "rest" | "api" | "http" => Some(Self::Rest),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notion => write!(f, "notion"),
            Self::Rest => write!(f, "rest"),
        }
    }
}

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Backend to persist through (defaults to $PORTAL_BACKEND, then 'rest')
    #[arg(short, long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Timeout for each outbound request, in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Check the backend connection at startup; a failed check marks it unavailable
    #[arg(long, default_value_t = false)]
    pub verify_backend: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub bind_addr: String,
    pub backend: BackendKind,
    pub request_timeout: Duration,
    pub verify_backend: bool,
}

impl PortalConfig {
    /// Resolves the server configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(cli: CommandLineInput, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if cli.timeout_secs == 0 {
            return Err(AppError::Validation(
                "--timeout-secs must be at least 1".to_string(),
            ));
        }

        let backend = match (cli.backend, lookup(ENV_BACKEND)) {
            (Some(kind), _) => kind,
            (None, Some(name)) => BackendKind::from_name(&name).ok_or_else(|| {
                AppError::Validation(format!(
                    "{} must be 'notion' or 'rest', got '{}'",
                    ENV_BACKEND, name
                ))
            })?,
            (None, None) => BackendKind::Rest,
        };

        Ok(PortalConfig {
            bind_addr: format!("{}:{}", cli.host, cli.port),
            backend,
            request_timeout: Duration::from_secs(cli.timeout_secs),
            verify_backend: cli.verify_backend,
        })
    }
}

/// Everything needed to construct the adapter for one backend.
#[derive(Debug, Clone)]
pub enum BackendSettings {
    Notion(NotionSettings),
    Rest(RestSettings),
}

#[derive(Debug, Clone)]
pub struct NotionSettings {
    pub token: ApiKey,
    pub base_url: BaseUrl,
    pub databases: NotionDatabases,
}

/// The Notion databases the portal reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionDatabases {
    pub entries: NotionId,
    pub projects: NotionId,
    pub tasks: NotionId,
}

#[derive(Debug, Clone)]
pub struct RestSettings {
    pub base_url: BaseUrl,
    pub routes: RestRoutes,
}

/// Where each operation lives on a generic REST backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRoutes {
    pub entries: EndpointPath,
    pub projects: EndpointPath,
    pub priority_task: EndpointPath,
}

impl RestRoutes {
    /// The routes of the reference notes API.
    pub fn standard() -> Self {
        Self {
            entries: EndpointPath::from_static(REST_ENTRIES_PATH),
            projects: EndpointPath::from_static(REST_PROJECTS_PATH),
            priority_task: EndpointPath::from_static(REST_PRIORITY_TASK_PATH),
        }
    }
}

impl BackendSettings {
    /// Reads backend settings from the process environment.
    pub fn from_env(kind: BackendKind) -> Result<Self, AppError> {
        Self::from_lookup(kind, |key| std::env::var(key).ok())
    }

    /// Reads backend settings through `lookup`. Any missing or invalid
    /// required value is a configuration error.
    pub fn from_lookup<F>(kind: BackendKind, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        match kind {
            BackendKind::Rest => Self::rest_from(&read),
            BackendKind::Notion => Self::notion_from(&read),
        }
    }

    fn rest_from(read: &dyn Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base_url = required(read, ENV_API_BASE_URL)?;
        let base_url = BaseUrl::parse(&base_url).map_err(|e| invalid(ENV_API_BASE_URL, e))?;

        let standard = RestRoutes::standard();
        let route = |key: &str, fallback: EndpointPath| match read(key) {
            Some(path) => EndpointPath::new(path).map_err(|e| invalid(key, e)),
            None => Ok(fallback),
        };

        Ok(Self::Rest(RestSettings {
            base_url,
            routes: RestRoutes {
                entries: route(ENV_REST_ENTRIES_PATH, standard.entries)?,
                projects: route(ENV_REST_PROJECTS_PATH, standard.projects)?,
                priority_task: route(ENV_REST_PRIORITY_TASK_PATH, standard.priority_task)?,
            },
        }))
    }

    fn notion_from(read: &dyn Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let token = read(ENV_NOTION_TOKEN)
            .or_else(|| read(ENV_NOTION_API_KEY))
            .ok_or_else(|| missing(ENV_NOTION_TOKEN))?;
        let token = ApiKey::new(token).map_err(|e| invalid(ENV_NOTION_TOKEN, e))?;

        let base_url = match read(ENV_NOTION_API_BASE_URL) {
            Some(url) => BaseUrl::parse(&url).map_err(|e| invalid(ENV_NOTION_API_BASE_URL, e))?,
            None => BaseUrl::parse(NOTION_API_BASE_URL)
                .map_err(|e| invalid(ENV_NOTION_API_BASE_URL, e))?,
        };

        let database = |key: &str| -> Result<NotionId, AppError> {
            let raw = required(read, key)?;
            NotionId::parse(&raw).map_err(|e| invalid(key, e))
        };

        Ok(Self::Notion(NotionSettings {
            token,
            base_url,
            databases: NotionDatabases {
                entries: database(ENV_NOTION_ENTRIES_DB)?,
                projects: database(ENV_NOTION_PROJECTS_DB)?,
                tasks: database(ENV_NOTION_TASKS_DB)?,
            },
        }))
    }
}

fn required(read: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    read(key).ok_or_else(|| missing(key))
}

fn missing(key: &str) -> AppError {
    AppError::Configuration(format!("{} environment variable is not set.", key))
}

fn invalid(key: &str, cause: impl fmt::Display) -> AppError {
    AppError::Configuration(format!("{} is invalid: {}", key, cause))
}

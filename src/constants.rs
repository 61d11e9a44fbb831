// src/constants.rs
//! Domain constants that define the operational boundaries of the portal.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! them top to bottom tells you how the adapter talks to its backend and
//! what the front end can rely on.

// ---------------------------------------------------------------------------
// Outbound request boundaries
// ---------------------------------------------------------------------------

/// How long a single outbound request may take before it is abandoned.
///
/// There is exactly one attempt per inbound request; when this elapses the
/// caller sees a gateway timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum characters shown when previewing upstream error bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// How many characters of an entry's content become its title.
pub const ENTRY_TITLE_MAX_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Listing boundaries
// ---------------------------------------------------------------------------

/// Number of entries returned when the caller does not ask for a limit.
pub const DEFAULT_ENTRY_LIMIT: usize = 50;

/// Upper bound for any listing. Matches the Notion API's page size maximum.
pub const MAX_LIST_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Placeholders and fixed messages
// ---------------------------------------------------------------------------

pub const NO_CONTENT_PLACEHOLDER: &str = "No content available";

pub const UNTITLED_PLACEHOLDER: &str = "Untitled";

/// Sentinel message returned when the backend has no open task.
pub const NO_TASKS_MESSAGE: &str = "No tasks available. Create a project to get started!";

pub const ENTRY_CREATED_MESSAGE: &str = "Entry captured";

pub const PROJECT_CREATED_MESSAGE: &str = "Project created";

// ---------------------------------------------------------------------------
// Notion API
// ---------------------------------------------------------------------------

pub const NOTION_VERSION: &str = "2022-06-28";

pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Property names of the databases the portal reads and writes.
pub mod notion_properties {
    pub const CONTENT: &str = "Content";
    pub const TAGS: &str = "Tags";
    pub const CREATED: &str = "Created";
    pub const NAME: &str = "Name";
    pub const DESCRIPTION: &str = "Description";
    pub const STATUS: &str = "Status";
    pub const DEADLINE: &str = "Deadline";
    pub const PRIORITY: &str = "Priority";
}

/// Status given to freshly created projects.
pub const PROJECT_ACTIVE_STATUS: &str = "Active";

/// Tasks with this status never qualify as the priority task.
pub const TASK_COMPLETED_STATUS: &str = "Completed";

// ---------------------------------------------------------------------------
// Generic REST backend
// ---------------------------------------------------------------------------

pub const REST_ENTRIES_PATH: &str = "/api/notes";

pub const REST_PROJECTS_PATH: &str = "/api/projects";

pub const REST_PRIORITY_TASK_PATH: &str = "/api/priority-task";

//! The fixed data contract between the adapter and the front end.
//!
//! Whatever backend is configured, callers only ever see these shapes.

use crate::constants::NO_TASKS_MESSAGE;
use crate::types::ValidationError;
use serde::{Deserialize, Serialize};

/// A captured free-form note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: String,
}

/// A project as listed on the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub deadline: Option<String>,
}

/// The single most urgent open task, or a sentinel when there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorityTask {
    Task {
        id: String,
        name: String,
        description: String,
    },
    Idle {
        message: String,
    },
}

impl PriorityTask {
    /// The sentinel used when the backend has nothing open.
    pub fn none_available() -> Self {
        Self::Idle {
            message: NO_TASKS_MESSAGE.to_string(),
        }
    }
}

/// Acknowledgement of a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
    pub message: String,
}

/// A validated entry waiting to be captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    content: String,
    tags: Vec<String>,
}

impl NewEntry {
    /// Blank content is rejected; blank tags are dropped.
    pub fn new(content: impl Into<String>, tags: Vec<String>) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyField("content"));
        }

        let tags = tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self { content, tags })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// A validated project waiting to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    name: String,
    description: String,
    deadline: Option<String>,
}

impl NewProject {
    /// An empty deadline string means "no deadline". Any other deadline is
    /// forwarded as given; the backend decides what it accepts.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        deadline: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }

        let deadline = deadline
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            name,
            description: description.into(),
            deadline,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn deadline(&self) -> Option<&str> {
        self.deadline.as_deref()
    }
}

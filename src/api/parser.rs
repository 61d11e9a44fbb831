// src/api/parser.rs
//! Normalization from raw backend payloads to the portal's fixed contract.
//!
//! One function per entity type. Each is a pure mapping from a decoded
//! `RawRecord` (either dialect) to the internal shape, so both backends
//! produce byte-identical JSON for the browser.

use super::responses::{
    FlatRecord, ListEnvelope, NotionPage, RawCreated, RawPriority, RawRecord, TagValue,
};
use crate::constants::{notion_properties as props, NO_CONTENT_PLACEHOLDER, UNTITLED_PLACEHOLDER};
use crate::error::AppError;
use crate::model::{Created, Entry, PriorityTask, Project};
use serde_json::Value;

/// Normalizes an entry listing, keeping at most `limit` entries.
pub fn normalize_entries(body: Value, limit: usize) -> Result<Vec<Entry>, AppError> {
    Ok(decode_listing(body, "entry")?
        .into_iter()
        .filter_map(|record| with_diagnostic(normalize_entry(record), "entry"))
        .take(limit)
        .collect())
}

/// Normalizes a project listing.
pub fn normalize_projects(body: Value) -> Result<Vec<Project>, AppError> {
    Ok(decode_listing(body, "project")?
        .into_iter()
        .filter_map(|record| with_diagnostic(normalize_project(record), "project"))
        .collect())
}

/// Normalizes whatever a priority-task endpoint answered with.
///
/// A listing yields its first usable record; `null`, an empty listing, or a
/// listing with nothing usable yields the "no tasks" sentinel.
pub fn normalize_priority_task(body: Value) -> Result<PriorityTask, AppError> {
    let raw: RawPriority = serde_json::from_value(body).map_err(|e| {
        AppError::MalformedResponse(format!("unrecognized priority task payload: {}", e))
    })?;

    match raw {
        RawPriority::Listing(listing) => Ok(listing
            .into_items()
            .into_iter()
            .filter_map(|item| decode_record(item, "task"))
            .find_map(|record| with_diagnostic(normalize_task(record), "task"))
            .unwrap_or_else(PriorityTask::none_available)),
        RawPriority::Record(record) => Ok(with_diagnostic(normalize_task(record), "task")
            .unwrap_or_else(PriorityTask::none_available)),
        RawPriority::Sentinel { message } => Ok(PriorityTask::Idle { message }),
        RawPriority::Nothing => Ok(PriorityTask::none_available()),
    }
}

/// Normalizes a write acknowledgement, preferring the upstream message.
pub fn normalize_created(body: Value, default_message: &str) -> Result<Created, AppError> {
    let raw: RawCreated = serde_json::from_value(body).map_err(|e| {
        AppError::MalformedResponse(format!("missing id in write response: {}", e))
    })?;

    let id = raw.id.into_string().ok_or_else(|| {
        AppError::MalformedResponse("blank id in write response".to_string())
    })?;

    Ok(Created {
        id,
        message: present(raw.message).unwrap_or_else(|| default_message.to_string()),
    })
}

/// Maps one record to an entry. `None` when the record has no usable id.
pub fn normalize_entry(record: RawRecord) -> Option<Entry> {
    match record {
        RawRecord::Notion(page) => {
            let content = page
                .property(props::CONTENT)
                .and_then(|p| p.plain_text())
                .and_then(|text| present(Some(text)));
            let created_at = page
                .property(props::CREATED)
                .and_then(|p| p.date_start())
                .or_else(|| page.created_time.clone());
            let tags = page
                .property(props::TAGS)
                .map(|p| p.option_names())
                .unwrap_or_default();

            Some(Entry {
                id: page.id.into_string()?,
                content: content.unwrap_or_else(|| NO_CONTENT_PLACEHOLDER.to_string()),
                tags,
                created_at: created_at.unwrap_or_default(),
            })
        }
        RawRecord::Flat(FlatRecord {
            id,
            content,
            title,
            tags,
            created_at,
            last_edited_time,
            created_time,
            ..
        }) => Some(Entry {
            id: id.into_string()?,
            content: present(content)
                .or_else(|| present(title))
                .unwrap_or_else(|| NO_CONTENT_PLACEHOLDER.to_string()),
            tags: tags
                .unwrap_or_default()
                .into_iter()
                .map(TagValue::into_name)
                .collect(),
            created_at: present(created_at)
                .or_else(|| present(last_edited_time))
                .or_else(|| present(created_time))
                .unwrap_or_default(),
        }),
    }
}

/// Maps one record to a project. `None` when the record has no usable id.
pub fn normalize_project(record: RawRecord) -> Option<Project> {
    match record {
        RawRecord::Notion(page) => {
            let (name, description) = notion_name_and_description(&page);
            let deadline = page
                .property(props::DEADLINE)
                .and_then(|p| p.date_start())
                .and_then(|d| present(Some(d)));

            Some(Project {
                id: page.id.into_string()?,
                name,
                description,
                deadline,
            })
        }
        RawRecord::Flat(FlatRecord {
            id,
            name,
            title,
            description,
            deadline,
            due_date,
            ..
        }) => Some(Project {
            id: id.into_string()?,
            name: present(name)
                .or_else(|| present(title))
                .unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string()),
            description: description.unwrap_or_default(),
            deadline: present(deadline).or_else(|| present(due_date)),
        }),
    }
}

/// Maps one record to a priority task. `None` when the record has no usable id.
pub fn normalize_task(record: RawRecord) -> Option<PriorityTask> {
    match record {
        RawRecord::Notion(page) => {
            let (name, description) = notion_name_and_description(&page);
            Some(PriorityTask::Task {
                id: page.id.into_string()?,
                name,
                description,
            })
        }
        RawRecord::Flat(FlatRecord {
            id,
            name,
            title,
            description,
            ..
        }) => Some(PriorityTask::Task {
            id: id.into_string()?,
            name: present(name)
                .or_else(|| present(title))
                .unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string()),
            description: description.unwrap_or_default(),
        }),
    }
}

fn notion_name_and_description(page: &NotionPage) -> (String, String) {
    let name = page
        .property(props::NAME)
        .and_then(|p| p.plain_text())
        .and_then(|text| present(Some(text)))
        .unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string());
    let description = page
        .property(props::DESCRIPTION)
        .and_then(|p| p.plain_text())
        .unwrap_or_default();
    (name, description)
}

/// Decodes a list payload into records, skipping items that match no dialect.
fn decode_listing(body: Value, kind: &str) -> Result<Vec<RawRecord>, AppError> {
    let listing: ListEnvelope = serde_json::from_value(body).map_err(|e| {
        AppError::MalformedResponse(format!("expected a list of {} records: {}", kind, e))
    })?;

    Ok(listing
        .into_items()
        .into_iter()
        .filter_map(|item| decode_record(item, kind))
        .collect())
}

fn decode_record(item: Value, kind: &str) -> Option<RawRecord> {
    match serde_json::from_value::<RawRecord>(item) {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("Skipping malformed {} record: {}", kind, e);
            None
        }
    }
}

fn with_diagnostic<T>(normalized: Option<T>, kind: &str) -> Option<T> {
    if normalized.is_none() {
        log::warn!("Skipping {} record without a usable id", kind);
    }
    normalized
}

/// Treats blank strings as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NO_TASKS_MESSAGE;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn notion_text(kind: &str, text: &str) -> Value {
        let mut property = json!({"id": "x", "type": kind});
        property[kind] = json!([{
            "type": "text",
            "text": {"content": text, "link": null},
            "plain_text": text,
            "href": null
        }]);
        property
    }

    #[test]
    fn flat_entry_maps_last_edited_time_to_created_at() {
        let entries =
            normalize_entries(json!([{"id": "1", "content": "X", "last_edited_time": "T"}]), 50)
                .unwrap();

        assert_eq!(
            entries,
            vec![Entry {
                id: "1".into(),
                content: "X".into(),
                tags: vec![],
                created_at: "T".into(),
            }]
        );
    }

    #[test]
    fn flat_entry_falls_back_to_title() {
        let entries = normalize_entries(json!([{"id": "1", "title": "X"}]), 50).unwrap();
        assert_eq!(entries[0].content, "X");
        assert_eq!(entries[0].created_at, "");
    }

    #[test]
    fn flat_entry_without_text_gets_placeholder() {
        let entries = normalize_entries(json!([{"id": 7, "content": ""}]), 50).unwrap();
        assert_eq!(entries[0].id, "7");
        assert_eq!(entries[0].content, NO_CONTENT_PLACEHOLDER);
    }

    #[test]
    fn malformed_items_are_dropped_never_added() {
        let body = json!({"data": [
            {"id": "1", "content": "ok"},
            "not an object",
            {"content": "no id"},
            {"id": "  ", "content": "blank id"},
            {"id": "2", "content": 42},
            {"id": "3", "title": "fine"}
        ]});

        let entries = normalize_entries(body, 50).unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(entries[1].content, NO_CONTENT_PLACEHOLDER);
    }

    #[test]
    fn wrong_typed_fields_fall_back_to_placeholders() {
        let entries = normalize_entries(
            json!([{"id": "1", "content": "hello", "created_at": 1700000000, "tags": ["a", 3, {"name": "b"}]}]),
            50,
        )
        .unwrap();
        assert_eq!(
            entries,
            vec![Entry {
                id: "1".into(),
                content: "hello".into(),
                tags: vec!["a".into(), "b".into()],
                created_at: "".into(),
            }]
        );

        let projects =
            normalize_projects(json!([{"id": "p1", "name": "Alpha", "description": 5, "deadline": false}]))
                .unwrap();
        assert_eq!(
            projects,
            vec![Project {
                id: "p1".into(),
                name: "Alpha".into(),
                description: String::new(),
                deadline: None,
            }]
        );
    }

    #[test]
    fn priority_task_with_odd_fields_still_resolves() {
        let task = normalize_priority_task(
            json!({"id": "t1", "name": "Ship", "description": null, "tags": "urgent"}),
        )
        .unwrap();
        assert_eq!(
            task,
            PriorityTask::Task {
                id: "t1".into(),
                name: "Ship".into(),
                description: String::new(),
            }
        );
    }

    #[test]
    fn entry_limit_is_applied() {
        let items: Vec<_> = (0..10).map(|i| json!({"id": i, "content": "c"})).collect();
        assert_eq!(normalize_entries(Value::Array(items), 3).unwrap().len(), 3);
    }

    #[test]
    fn non_list_payload_is_malformed() {
        let err = normalize_entries(json!({"unexpected": true}), 50).unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn notion_entry_reads_typed_properties() {
        let page = json!({
            "object": "page",
            "id": "216cd412-8533-8087-a989-cf37889137c3",
            "created_time": "2024-05-01T08:00:00.000Z",
            "properties": {
                "Content": notion_text("title", "Buy milk"),
                "Created": {"id": "c", "type": "date", "date": {"start": "2024-05-02T09:00:00Z", "end": null}},
                "Tags": {"id": "t", "type": "multi_select", "multi_select": [
                    {"id": "a", "name": "home", "color": "red"},
                    {"id": "b", "name": "errand", "color": "blue"}
                ]}
            }
        });

        let entries = normalize_entries(json!({"object": "list", "results": [page]}), 50).unwrap();
        assert_eq!(
            entries,
            vec![Entry {
                id: "216cd412-8533-8087-a989-cf37889137c3".into(),
                content: "Buy milk".into(),
                tags: vec!["home".into(), "errand".into()],
                created_at: "2024-05-02T09:00:00Z".into(),
            }]
        );
    }

    #[test]
    fn notion_entry_with_empty_properties_uses_defaults() {
        let page = json!({
            "id": "p1",
            "created_time": "2024-05-01T08:00:00.000Z",
            "properties": {
                "Content": {"id": "title", "type": "title", "title": []},
                "Created": {"id": "c", "type": "date", "date": null},
                "Tags": {"id": "t", "type": "rollup", "rollup": {}}
            }
        });

        let entry = normalize_entries(json!({"results": [page]}), 50).unwrap().remove(0);
        assert_eq!(entry.content, NO_CONTENT_PLACEHOLDER);
        assert_eq!(entry.created_at, "2024-05-01T08:00:00.000Z");
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn notion_multi_segment_titles_are_joined() {
        let page = json!({
            "id": "p1",
            "properties": {
                "Content": {"type": "title", "title": [
                    {"plain_text": "Hello, "},
                    {"text": {"content": "world"}}
                ]}
            }
        });
        let entry = normalize_entries(json!([page]), 50).unwrap().remove(0);
        assert_eq!(entry.content, "Hello, world");
    }

    #[test]
    fn both_dialects_produce_the_same_project_shape() {
        let flat = json!([{"id": "p1", "name": "Alpha", "description": "Desc", "deadline": "2024-12-31"}]);
        let notion = json!({"results": [{
            "id": "p1",
            "properties": {
                "Name": notion_text("title", "Alpha"),
                "Description": notion_text("rich_text", "Desc"),
                "Deadline": {"type": "date", "date": {"start": "2024-12-31"}}
            }
        }]});

        let expected = vec![Project {
            id: "p1".into(),
            name: "Alpha".into(),
            description: "Desc".into(),
            deadline: Some("2024-12-31".into()),
        }];
        assert_eq!(normalize_projects(flat).unwrap(), expected);
        assert_eq!(normalize_projects(notion).unwrap(), expected);
    }

    #[test]
    fn project_defaults() {
        let projects = normalize_projects(json!([{"id": "p", "title": "", "deadline": ""}])).unwrap();
        assert_eq!(
            projects[0],
            Project {
                id: "p".into(),
                name: UNTITLED_PLACEHOLDER.into(),
                description: String::new(),
                deadline: None,
            }
        );
    }

    #[test]
    fn priority_task_shapes() {
        assert_eq!(
            normalize_priority_task(json!({"id": "task1", "name": "Important Task", "description": "Do this first"}))
                .unwrap(),
            PriorityTask::Task {
                id: "task1".into(),
                name: "Important Task".into(),
                description: "Do this first".into(),
            }
        );
        assert_eq!(
            normalize_priority_task(json!({"message": "No tasks available"})).unwrap(),
            PriorityTask::Idle {
                message: "No tasks available".into()
            }
        );
        assert_eq!(
            normalize_priority_task(Value::Null).unwrap(),
            PriorityTask::Idle {
                message: NO_TASKS_MESSAGE.into()
            }
        );
        assert_eq!(
            normalize_priority_task(json!({"object": "list", "results": [], "has_more": false}))
                .unwrap(),
            PriorityTask::none_available()
        );
        assert!(normalize_priority_task(json!(42)).is_err());
    }

    #[test]
    fn priority_task_from_notion_query_takes_first_result() {
        let body = json!({"object": "list", "results": [
            {"id": "t1", "properties": {"Name": notion_text("title", "First")}},
            {"id": "t2", "properties": {"Name": notion_text("title", "Second")}}
        ]});

        match normalize_priority_task(body).unwrap() {
            PriorityTask::Task { id, name, description } => {
                assert_eq!(id, "t1");
                assert_eq!(name, "First");
                assert_eq!(description, "");
            }
            other => panic!("expected a task, got {:?}", other),
        }
    }

    #[test]
    fn created_prefers_upstream_message() {
        let created =
            normalize_created(json!({"id": "new_id", "message": "Note added successfully"}), "Entry captured")
                .unwrap();
        assert_eq!(created.message, "Note added successfully");

        let created = normalize_created(json!({"object": "page", "id": "abc"}), "Entry captured").unwrap();
        assert_eq!(
            created,
            Created {
                id: "abc".into(),
                message: "Entry captured".into()
            }
        );

        assert!(normalize_created(json!({"message": "no id"}), "x").is_err());
        assert!(normalize_created(json!({"id": ""}), "x").is_err());
    }
}

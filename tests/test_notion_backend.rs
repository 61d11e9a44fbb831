//! Notion backend against a local stand-in for the Notion API.

mod common;

use axum::http::StatusCode;
use common::{json_upstream, recording_upstream};
use lean_portal::{
    ApiKey, AppError, Backend, BaseUrl, Entry, NewEntry, NewProject, NotionBackend,
    NotionDatabases, NotionErrorCode, NotionId, NotionSettings, PriorityTask, Project,
    ENTRY_CREATED_MESSAGE, NOTION_VERSION, PROJECT_CREATED_MESSAGE,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;

const TOKEN: &str = "secret_abcdefghijklmnopqrstuvwxyz0123";
const ENTRIES_DB: &str = "11111111-2222-3333-4444-555555555555";
const PROJECTS_DB: &str = "66666666777788889999aaaaaaaaaaaa";
const TASKS_DB: &str = "bbbbbbbbccccddddeeeeffffffffffff";

fn backend(base: &str) -> NotionBackend {
    let settings = NotionSettings {
        token: ApiKey::new(TOKEN).unwrap(),
        base_url: BaseUrl::parse(base).unwrap(),
        databases: NotionDatabases {
            entries: NotionId::parse(ENTRIES_DB).unwrap(),
            projects: NotionId::parse(PROJECTS_DB).unwrap(),
            tasks: NotionId::parse(TASKS_DB).unwrap(),
        },
    };
    NotionBackend::new(&settings, Duration::from_secs(5)).unwrap()
}

fn rich_text(kind: &str, text: &str) -> Value {
    let mut property = json!({"id": "p", "type": kind});
    property[kind] = json!([{
        "type": "text",
        "text": {"content": text, "link": null},
        "plain_text": text,
        "href": null
    }]);
    property
}

fn query_result(pages: Vec<Value>) -> Value {
    json!({"object": "list", "results": pages, "next_cursor": null, "has_more": false})
}

#[tokio::test]
async fn test_requests_carry_notion_headers() {
    let (base, recorder) = json_upstream(StatusCode::OK, query_result(vec![])).await;

    backend(&base).get_projects().await.unwrap();

    let request = recorder.single();
    assert_eq!(request.header("authorization"), Some(format!("Bearer {}", TOKEN).as_str()));
    assert_eq!(request.header("notion-version"), Some(NOTION_VERSION));
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_create_entry_posts_a_page() {
    let (base, recorder) = json_upstream(
        StatusCode::OK,
        json!({"object": "page", "id": "page-1", "properties": {}}),
    )
    .await;
    let entry = NewEntry::new("Buy milk", vec!["home".to_string()]).unwrap();

    let created = backend(&base).create_entry(&entry).await.unwrap();

    assert_eq!(created.id, "page-1");
    assert_eq!(created.message, ENTRY_CREATED_MESSAGE);

    let request = recorder.single();
    assert_eq!(request.method.as_str(), "POST");
    assert_eq!(request.path, "/pages");
    assert_eq!(request.body["parent"]["database_id"], ENTRIES_DB);
    assert_eq!(
        request.body["properties"]["Content"]["title"][0]["text"]["content"],
        "Buy milk"
    );
    assert_eq!(
        request.body["properties"]["Tags"]["multi_select"],
        json!([{"name": "home"}])
    );
    let created_at = request.body["properties"]["Created"]["date"]["start"]
        .as_str()
        .unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
}

#[tokio::test]
async fn test_create_project_marks_it_active() {
    let (base, recorder) = json_upstream(StatusCode::OK, json!({"id": "proj-1"})).await;
    let project = NewProject::new("Alpha", "First", Some("2025-06-30".to_string())).unwrap();

    let created = backend(&base).create_project(&project).await.unwrap();

    assert_eq!(created.message, PROJECT_CREATED_MESSAGE);
    let body = recorder.single().body;
    assert_eq!(body["parent"]["database_id"], "66666666-7777-8888-9999-aaaaaaaaaaaa");
    assert_eq!(body["properties"]["Status"]["select"]["name"], "Active");
    assert_eq!(body["properties"]["Deadline"]["date"]["start"], "2025-06-30");
    assert_eq!(
        body["properties"]["Description"]["rich_text"][0]["text"]["content"],
        "First"
    );
}

#[tokio::test]
async fn test_get_entries_queries_newest_first() {
    let page = json!({
        "object": "page",
        "id": "e1",
        "created_time": "2024-04-30T09:00:00.000Z",
        "properties": {
            "Content": rich_text("title", "Remember the milk"),
            "Created": {"id": "c", "type": "date", "date": {"start": "2024-05-01T10:00:00.000Z", "end": null}},
            "Tags": {"id": "t", "type": "multi_select", "multi_select": [
                {"id": "1", "name": "home", "color": "red"},
                {"id": "2", "name": "errand", "color": "blue"}
            ]}
        }
    });
    let (base, recorder) = json_upstream(StatusCode::OK, query_result(vec![page])).await;

    let entries = backend(&base).get_entries(20).await.unwrap();

    assert_eq!(
        entries,
        vec![Entry {
            id: "e1".into(),
            content: "Remember the milk".into(),
            tags: vec!["home".into(), "errand".into()],
            created_at: "2024-05-01T10:00:00.000Z".into(),
        }]
    );

    let request = recorder.single();
    assert_eq!(
        request.path,
        "/databases/11111111-2222-3333-4444-555555555555/query"
    );
    assert_eq!(
        request.body,
        json!({
            "sorts": [{"property": "Created", "direction": "descending"}],
            "page_size": 20
        })
    );
}

#[tokio::test]
async fn test_get_projects_reads_notion_properties() {
    let page = json!({
        "object": "page",
        "id": "p1",
        "properties": {
            "Name": rich_text("title", "Alpha"),
            "Description": rich_text("rich_text", "First project"),
            "Deadline": {"id": "d", "type": "date", "date": null}
        }
    });
    let (base, recorder) = json_upstream(StatusCode::OK, query_result(vec![page])).await;

    let projects = backend(&base).get_projects().await.unwrap();

    assert_eq!(
        projects,
        vec![Project {
            id: "p1".into(),
            name: "Alpha".into(),
            description: "First project".into(),
            deadline: None,
        }]
    );
    assert_eq!(recorder.single().body["page_size"], 100);
}

#[tokio::test]
async fn test_priority_task_filters_completed() {
    let task = json!({
        "object": "page",
        "id": "t1",
        "properties": {
            "Name": rich_text("title", "Write report"),
            "Description": rich_text("rich_text", "Quarterly numbers"),
            "Priority": {"id": "n", "type": "number", "number": 3}
        }
    });
    let (base, recorder) = json_upstream(StatusCode::OK, query_result(vec![task])).await;

    let found = backend(&base).get_priority_task().await.unwrap();

    assert_eq!(
        found,
        PriorityTask::Task {
            id: "t1".into(),
            name: "Write report".into(),
            description: "Quarterly numbers".into(),
        }
    );

    let request = recorder.single();
    assert_eq!(
        request.path,
        "/databases/bbbbbbbb-cccc-dddd-eeee-ffffffffffff/query"
    );
    assert_eq!(
        request.body["filter"],
        json!({"property": "Status", "select": {"does_not_equal": "Completed"}})
    );
    assert_eq!(
        request.body["sorts"],
        json!([
            {"property": "Priority", "direction": "descending"},
            {"property": "Created", "direction": "ascending"}
        ])
    );
    assert_eq!(request.body["page_size"], 1);
}

#[tokio::test]
async fn test_empty_task_query_is_idle() {
    let (base, _) = json_upstream(StatusCode::OK, query_result(vec![])).await;

    let found = backend(&base).get_priority_task().await.unwrap();

    assert_eq!(found, PriorityTask::none_available());
}

#[tokio::test]
async fn test_notion_error_codes_are_recognised() {
    let body = json!({
        "object": "error",
        "status": 404,
        "code": "object_not_found",
        "message": "Could not find database"
    });
    let (base, _) = recording_upstream(StatusCode::NOT_FOUND, "application/json", body.to_string())
        .await;

    let err = backend(&base).get_entries(10).await.unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert!(err.detail().contains("404 Not Found"));
    assert!(err.detail().contains("Could not find database"));
    match err {
        AppError::Upstream { code, .. } => assert_eq!(code, Some(NotionErrorCode::ObjectNotFound)),
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_verify_checks_the_token() {
    let (base, recorder) = json_upstream(StatusCode::OK, json!({"object": "user", "id": "u"})).await;

    backend(&base).verify().await.unwrap();

    let request = recorder.single();
    assert_eq!(request.method.as_str(), "GET");
    assert_eq!(request.path, "/users/me");

    let (base, _) = recording_upstream(
        StatusCode::UNAUTHORIZED,
        "application/json",
        r#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#,
    )
    .await;
    let err = backend(&base).verify().await.unwrap_err();
    assert_eq!(err.status_code(), 401);
}

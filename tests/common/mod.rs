//! Shared test utilities: a throwaway upstream server bound to a local port.
#![allow(dead_code)]

use axum::{
    body::Bytes,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One request as the fake upstream saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<RecordedRequest>>>);

impl Recorder {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.0.lock().unwrap().clone()
    }

    pub fn single(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests[0].clone()
    }
}

/// Serves `router` on 127.0.0.1 and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Fake upstream crashed");
    });
    format!("http://{}", addr)
}

/// An upstream that records every request and answers each with the same reply.
pub async fn recording_upstream(
    status: StatusCode,
    content_type: &'static str,
    reply: impl Into<String>,
) -> (String, Recorder) {
    let recorder = Recorder::default();
    let captured = recorder.clone();
    let reply: String = reply.into();

    let router = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let captured = captured.clone();
            let reply = reply.clone();
            async move {
                let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
                captured.0.lock().unwrap().push(RecordedRequest {
                    method,
                    path: uri.path().to_string(),
                    headers,
                    body,
                });
                (status, [(header::CONTENT_TYPE, content_type)], reply)
            }
        },
    );

    (spawn_upstream(router).await, recorder)
}

/// Shorthand for a recording upstream answering with JSON.
pub async fn json_upstream(status: StatusCode, reply: Value) -> (String, Recorder) {
    recording_upstream(status, "application/json", reply.to_string()).await
}

/// A base URL nothing is listening on.
pub async fn refused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{}", addr)
}

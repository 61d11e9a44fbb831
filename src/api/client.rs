// src/api/client.rs
//! Thin HTTP transport shared by both backends.
//!
//! Sends exactly one request per call, bounded by the client timeout, and
//! turns every outcome into either a JSON value or a classified `AppError`.
//! No parsing of entity shapes happens here.

use crate::error::AppError;
use crate::types::BaseUrl;
use reqwest::{header::HeaderMap, Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// A reqwest client bound to one backend base URL.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: BaseUrl,
}

impl HttpTransport {
    /// Creates a transport with the given default headers and per-request timeout.
    pub fn new(base_url: BaseUrl, headers: HeaderMap, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("could not build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Passes a normalization result through, logging a failure against the
    /// URL of the endpoint that produced the body.
    pub fn normalized<T>(&self, endpoint: &str, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(err) = &result {
            log::error!("Unusable response from {}: {}", self.base_url.join(endpoint), err);
        }
        result
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get(&self, endpoint: &str) -> Result<Value, AppError> {
        let url = self.base_url.join(endpoint);
        log::debug!("GET {}", url);
        let request = self.client.get(&url);
        self.dispatch(url, request).await
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Value, AppError> {
        let url = self.base_url.join(endpoint);
        log::debug!("POST {}", url);
        let request = self.client.post(&url).json(body);
        self.dispatch(url, request).await
    }

    async fn dispatch(&self, url: String, request: RequestBuilder) -> Result<Value, AppError> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::from_transport(&url, e))?;
        let result = extract_response_text(response)
            .await
            .map_err(|e| AppError::from_transport(&url, e))?;
        interpret_response(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> reqwest::Result<ApiResponse<String>> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

/// Turns a raw response into JSON, or into an upstream/malformed error.
///
/// An empty successful body reads as `null`.
pub fn interpret_response(result: ApiResponse<String>) -> Result<Value, AppError> {
    if !result.status.is_success() {
        return Err(AppError::upstream(&result.url, result.status, &result.data));
    }

    if result.data.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", result.url, e);
        AppError::MalformedResponse(format!("body is not JSON: {}", e))
    })
}

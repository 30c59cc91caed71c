//! Ad-hoc HTTP probing of deployed applications
//!
//! Unlike the platform client this talks to arbitrary caller-named URLs, with
//! no authentication. A non-2xx answer is a normal result; only transport
//! failures and undecodable JSON bodies are errors.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::platform::api::Deployment;

/// HTTP methods the probe accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl ProbeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMethod::Get => "GET",
            ProbeMethod::Post => "POST",
            ProbeMethod::Put => "PUT",
            ProbeMethod::Delete => "DELETE",
            ProbeMethod::Patch => "PATCH",
        }
    }

    /// Whether a request body is sent with this method
    pub fn carries_body(&self) -> bool {
        matches!(self, ProbeMethod::Post | ProbeMethod::Put | ProbeMethod::Patch)
    }

    fn to_reqwest(self) -> Method {
        match self {
            ProbeMethod::Get => Method::GET,
            ProbeMethod::Post => Method::POST,
            ProbeMethod::Put => Method::PUT,
            ProbeMethod::Delete => Method::DELETE,
            ProbeMethod::Patch => Method::PATCH,
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for one probe request
#[derive(Debug, Clone, Default)]
pub struct ProbeRequest {
    pub method: ProbeMethod,
    /// JSON body; ignored for GET and DELETE
    pub body: Option<Value>,
    /// Extra headers; they override the default `Content-Type`
    pub headers: BTreeMap<String, String>,
}

impl ProbeRequest {
    /// POST with a JSON body
    pub fn post(body: Value) -> Self {
        Self {
            method: ProbeMethod::Post,
            body: Some(body),
            headers: BTreeMap::new(),
        }
    }
}

/// What the probed endpoint answered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResponse {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON when the response declares a JSON content type, else text
    pub body: Value,
    /// Time until the response headers arrived
    pub latency_ms: u64,
}

impl ProbeResponse {
    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }
}

/// True for 200 through 299
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Invalid JSON response body: {0}")]
    InvalidBody(String),
}

/// HTTP prober for deployed endpoints
#[derive(Debug, Clone)]
pub struct EndpointProbe {
    http_client: Client,
}

impl EndpointProbe {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("luncurkan-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http_client })
    }

    /// Send one request to `url` and describe the response
    pub async fn probe(&self, url: &str, request: &ProbeRequest) -> Result<ProbeResponse, ProbeError> {
        let headers = build_headers(&request.headers)?;
        let mut builder = self
            .http_client
            .request(request.method.to_reqwest(), url)
            .headers(headers);

        if let Some(body) = request_body(request) {
            builder = builder.body(body);
        }

        let started = Instant::now();
        let response = builder.send().await?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let status = response.status();
        let headers = collect_headers(response.headers());
        let is_json = headers
            .get(CONTENT_TYPE.as_str())
            .is_some_and(|ct| ct.contains("application/json"));

        let body = if is_json {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(|e| ProbeError::InvalidBody(e.to_string()))?
        } else {
            Value::String(response.text().await?)
        };

        log::debug!(
            "{} {} -> {} in {}ms",
            request.method,
            url,
            status.as_u16(),
            latency_ms
        );

        Ok(ProbeResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
            latency_ms,
        })
    }
}

fn build_headers(extra: &BTreeMap<String, String>) -> Result<HeaderMap, ProbeError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ProbeError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ProbeError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Lowercased names; repeated headers are joined with ", "
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    collected
}

/// Serialized body for methods that carry one
///
/// Empty-ish bodies (`null`, `false`, `0`, `""`) are not sent.
fn request_body(request: &ProbeRequest) -> Option<String> {
    if !request.method.carries_body() {
        return None;
    }
    let body = request.body.as_ref()?;
    let empty = match body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    (!empty).then(|| body.to_string())
}

/// Public base URL of a deployment
///
/// Prefers the deployed URL, then the external endpoint URL, then the first
/// bound domain over HTTPS.
pub fn resolve_deployment_url(deployment: &Deployment) -> Option<String> {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    non_empty(&deployment.deployed_url)
        .or_else(|| {
            deployment
                .endpoints
                .as_ref()
                .and_then(|e| non_empty(&e.external_url))
        })
        .or_else(|| {
            deployment
                .endpoints
                .as_ref()
                .and_then(|e| e.domains.as_ref())
                .and_then(|domains| domains.first())
                .filter(|d| !d.is_empty())
                .map(|d| format!("https://{}", d))
        })
}

/// Append `path` to `base` without doubling the slash between them
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), path)
    } else {
        format!("{}{}", base, path)
    }
}

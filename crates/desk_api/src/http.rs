use std::time::Duration;

use desk_core::error::{codes, AppError};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    /// JSON GET.
    pub fn get(url: &str) -> Self {
        HttpRequest {
            method: Method::Get,
            url: url.to_string(),
            query: Vec::new(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    /// JSON PUT.
    pub fn put_json(url: &str, body: Value) -> Self {
        HttpRequest {
            method: Method::Put,
            url: url.to_string(),
            query: Vec::new(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Attach `Authorization` when a token is configured.
    pub fn bearer(self, authorization: Option<String>) -> Self {
        match authorization {
            Some(value) => self.header("Authorization", &value),
            None => self,
        }
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Result<Value, AppError> {
        serde_json::from_str(&self.body).map_err(|e| {
            AppError::new(codes::PAYLOAD_DECODE, "Failed to decode response body")
                .with_details(e.to_string())
        })
    }
}

/// Outbound HTTP seam. Implementations return every received response, success or not;
/// only failures to get a response at all are errors.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AppError>;
}

/// Map a non-success status to an error. 404 gets its own code so read paths can serve
/// "not found" placeholders.
pub fn require_success(resp: HttpResponse, url: &str) -> Result<HttpResponse, AppError> {
    if resp.is_success() {
        return Ok(resp);
    }
    let details = format!("url={url}; status={} {}", resp.status, resp.status_text);
    if resp.status == 404 {
        return Err(AppError::new(codes::HTTP_NOT_FOUND, "Backend returned not found")
            .with_details(details));
    }
    Err(AppError::new(codes::HTTP_STATUS, "Backend request failed")
        .with_details(details)
        .with_retryable(resp.status >= 500))
}

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds the whole request; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        let mut req = self.agent.request(request.method.as_str(), &request.url);
        for (key, value) in &request.query {
            req = req.query(key, value);
        }
        for (name, value) in &request.headers {
            req = req.set(name, value);
        }

        let result = match &request.body {
            Some(body) => req.send_string(&body.to_string()),
            None => req.call(),
        };

        // ureq reports 4xx/5xx as errors; callers want those as plain responses.
        let resp = match result {
            Ok(r) => r,
            Err(ureq::Error::Status(_, r)) => r,
            Err(e) => {
                return Err(
                    AppError::new(codes::HTTP_TRANSPORT, "Failed to reach backend")
                        .with_details(format!(
                            "method={}; url={}; err={e}",
                            request.method.as_str(),
                            request.url
                        ))
                        .with_retryable(true),
                )
            }
        };

        let status = resp.status();
        let status_text = resp.status_text().to_string();
        let body = resp.into_string().map_err(|e| {
            AppError::new(codes::PAYLOAD_DECODE, "Failed to read response body")
                .with_details(e.to_string())
        })?;

        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            status,
            "backend response"
        );

        Ok(HttpResponse {
            status,
            status_text,
            body,
        })
    }
}

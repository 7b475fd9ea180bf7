#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use desk_api::http::{HttpRequest, HttpResponse, Method, Transport};
use desk_api::Desk;
use desk_core::cache::{Clock, ManualClock};
use desk_core::config::DeskConfig;
use desk_core::error::{codes, AppError};
use serde_json::Value;

pub const BASE: &str = "http://desk.test";

#[derive(Debug, Clone)]
enum Reply {
    Respond(HttpResponse),
    Unreachable,
}

/// Transport double: canned replies per (method, url), with every request recorded.
/// The last reply queued for a route repeats once earlier ones are used up.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    fn push(&self, method: Method, url: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn json(&self, method: Method, url: &str, status: u16, body: Value) {
        self.text(method, url, status, &body.to_string());
    }

    pub fn text(&self, method: Method, url: &str, status: u16, body: &str) {
        let status_text = match status {
            200 => "OK",
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Status",
        };
        self.push(
            method,
            url,
            Reply::Respond(HttpResponse {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            }),
        );
    }

    pub fn unreachable(&self, method: Method, url: &str) {
        self.push(method, url, Reply::Unreachable);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            let queue = routes.get_mut(&(request.method, request.url.clone()));
            match queue {
                Some(q) if q.len() > 1 => q.pop_front(),
                Some(q) => q.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Respond(resp)) => Ok(resp),
            Some(Reply::Unreachable) | None => Err(AppError::new(
                codes::HTTP_TRANSPORT,
                "connection refused",
            )
            .with_details(request.url.clone())
            .with_retryable(true)),
        }
    }
}

pub fn config() -> DeskConfig {
    DeskConfig {
        api_base_url: BASE.to_string(),
        api_key: "token-123".to_string(),
        ..DeskConfig::default()
    }
}

pub fn desk_with(
    config: DeskConfig,
    transport: &Arc<ScriptedTransport>,
    clock: &Arc<ManualClock>,
) -> Desk {
    desk_core::logging::init_test();
    let transport: Arc<dyn Transport> = transport.clone();
    let clock: Arc<dyn Clock> = clock.clone();
    Desk::with_parts(config, transport, clock)
}

pub fn desk(transport: &Arc<ScriptedTransport>, clock: &Arc<ManualClock>) -> Desk {
    desk_with(config(), transport, clock)
}

pub fn incidents_url() -> String {
    format!("{BASE}/incidents")
}

pub fn affected_url(number: &str) -> String {
    format!("{BASE}/incidents/{number}/affected-users")
}

pub fn search_url() -> String {
    format!("{BASE}/search/users")
}

pub fn assignee_url(number: &str) -> String {
    format!("{BASE}/incidents/{number}/assignee")
}

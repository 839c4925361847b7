//! Scripted transport used by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use assured_domain::request::AUTHORIZATION;
use assured_domain::{ApiRequest, ApiResponse};
use serde_json::Value;
use tokio::sync::Barrier;

use crate::auth::REFRESH_PATH;
use crate::ports::{HttpTransport, TransportError};

enum Reply {
    Respond(ApiResponse),
    Fail(TransportError),
}

#[derive(Default)]
struct Script {
    queued: HashMap<String, VecDeque<Reply>>,
    protected: HashMap<String, (String, Value)>,
    sent: Vec<ApiRequest>,
}

/// In-memory stand-in for the API.
///
/// Replies come from a per-path queue first. Paths registered with
/// [`ScriptedTransport::protect`] then answer 200 for the expected bearer
/// token and 401 otherwise. Anything else is a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
    refresh_delay: Option<Duration>,
    gate: Option<(usize, Barrier)>,
    gated: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every refresh reply.
    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = Some(delay);
        self
    }

    /// Holds the first `n` non-refresh requests until all `n` arrived.
    pub fn with_gate(mut self, n: usize) -> Self {
        self.gate = Some((n, Barrier::new(n)));
        self
    }

    pub fn on(&self, path: &str, response: ApiResponse) {
        self.push(path, Reply::Respond(response));
    }

    pub fn fail(&self, path: &str, error: TransportError) {
        self.push(path, Reply::Fail(error));
    }

    pub fn on_refresh(&self, response: ApiResponse) {
        self.on(REFRESH_PATH, response);
    }

    pub fn fail_refresh(&self) {
        self.fail(
            REFRESH_PATH,
            TransportError::ConnectionFailed("connection reset".to_string()),
        );
    }

    /// Answers `path` with `body` when called with `Bearer <token>`.
    pub fn protect(&self, path: &str, token: &str, body: Value) {
        self.script
            .lock()
            .unwrap()
            .protected
            .insert(path.to_string(), (token.to_string(), body));
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().sent.len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.script.lock().unwrap().sent.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Authorization header of each request sent to `path`, in order.
    pub fn authorizations(&self, path: &str) -> Vec<Option<String>> {
        self.requests_to(path)
            .iter()
            .map(|r| r.headers.get(AUTHORIZATION).map(str::to_string))
            .collect()
    }

    fn push(&self, path: &str, reply: Reply) {
        self.script
            .lock()
            .unwrap()
            .queued
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    fn resolve(&self, request: &ApiRequest) -> Reply {
        let mut script = self.script.lock().unwrap();
        script.sent.push(request.clone());

        if let Some(reply) = script
            .queued
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }

        match script.protected.get(&request.path) {
            Some((token, body)) => {
                let expected = format!("Bearer {token}");
                if request.headers.get(AUTHORIZATION) == Some(expected.as_str()) {
                    Reply::Respond(ApiResponse::new(200).with_json(body))
                } else {
                    Reply::Respond(ApiResponse::new(401).with_json(
                        &serde_json::json!({"detail": "Given token not valid for any token type"}),
                    ))
                }
            }
            None => Reply::Respond(ApiResponse::new(404)),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let reply = self.resolve(request);

        if request.path == REFRESH_PATH {
            if let Some(delay) = self.refresh_delay {
                tokio::time::sleep(delay).await;
            }
        } else if let Some((n, barrier)) = &self.gate {
            if self.gated.fetch_add(1, Ordering::SeqCst) < *n {
                barrier.wait().await;
            }
        }

        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(error) => Err(error),
        }
    }
}

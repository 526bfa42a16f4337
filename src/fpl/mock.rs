//! In-memory upstream for tests.
//!
//! Responses are registered per path. Registering several responses for
//! one path plays them back in order and then repeats the last one, which
//! is enough to script "fail once, then succeed".

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::FplApi;
use crate::fetch::FetchError;

#[derive(Debug, Clone)]
enum MockResponse {
    Json(Value),
    Status(u16),
    NotFound,
}

#[derive(Default)]
pub struct MockFplApi {
    responses: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    calls: Mutex<Vec<String>>,
}

impl MockFplApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, path: &str, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn with_json(self, path: &str, value: Value) -> Self {
        self.push(path, MockResponse::Json(value))
    }

    /// Respond with a non-success HTTP status.
    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.push(path, MockResponse::Status(status))
    }

    pub fn with_not_found(self, path: &str) -> Self {
        self.push(path, MockResponse::NotFound)
    }

    /// Number of requests made for `path`.
    pub fn call_count(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

#[async_trait]
impl FplApi for MockFplApi {
    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        self.calls.lock().unwrap().push(path.to_string());

        let response = {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(path) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match response {
            Some(MockResponse::Json(v)) => Ok(v),
            Some(MockResponse::Status(status)) => Err(FetchError::HttpStatus {
                status,
                message: "mock".to_string(),
            }),
            Some(MockResponse::NotFound) | None => Err(FetchError::NotFound(path.to_string())),
        }
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::HttpClient;

/// `HttpClient` serving canned bodies; unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct FakeHttpClient {
    bodies: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.bodies.lock().unwrap().insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for FakeHttpClient {
    fn get_text(&self, url: &str) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::Http(format!("GET {} failed: connection refused", url)))
    }
}

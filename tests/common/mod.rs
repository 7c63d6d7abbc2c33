use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use contact_crawler::crawler::fetcher::{FetchTransport, TransportError};

/// Serves a fixed url → (status, body) map; unknown URLs get a 404. Records
/// every request in order.
pub struct ScriptedTransport {
    pages: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), (200, body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, code: u16) -> Self {
        self.pages.insert(url.to_string(), (code, String::new()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl FetchTransport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        _timeout: Duration,
    ) -> Result<(u16, String), TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some((code, body)) => Ok((*code, body.clone())),
            None => Ok((404, String::new())),
        }
    }
}

/// Fails with a connection error for the first `failures` attempts, then
/// serves the given body. Records the instant of every attempt.
pub struct TransientTransport {
    failures: usize,
    body: String,
    attempts: Mutex<Vec<Instant>>,
}

#[allow(dead_code)]
impl TransientTransport {
    pub fn new(failures: usize, body: &str) -> Self {
        Self {
            failures,
            body: body.to_string(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn always_failing() -> Self {
        Self::new(usize::MAX, "")
    }

    pub fn attempt_times(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

#[async_trait]
impl FetchTransport for TransientTransport {
    async fn get(
        &self,
        _url: &str,
        _timeout: Duration,
    ) -> Result<(u16, String), TransportError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(Instant::now());
            attempts.len()
        };
        if attempt <= self.failures {
            Err(TransportError::Connection("connection refused".to_string()))
        } else {
            Ok((200, self.body.clone()))
        }
    }
}

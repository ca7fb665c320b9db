//! In-memory [`HttpClient`] for unit tests

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::http::{ApiResponse, HttpClient, Method};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

/// Answers requests from a fixed route table and records every call.
///
/// Unknown routes answer 404 with an `itemNotFound` fault.
#[derive(Debug, Default)]
pub struct FakeHttpClient {
    routes: Mutex<Vec<(Method, String, ApiResponse)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: Method, url: &str, status: u16, body: Option<Value>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((method, url.to_string(), ApiResponse::new(status, body)));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was issued")
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            url: url.to_string(),
            body: body.cloned(),
        });

        let routes = self.routes.lock().unwrap();
        let response = routes
            .iter()
            .find(|(m, u, _)| *m == method && u == url)
            .map(|(_, _, response)| response.clone())
            .unwrap_or_else(|| {
                ApiResponse::new(
                    404,
                    Some(json!({"itemNotFound": {"message": format!("{} not found", url), "code": 404}})),
                )
            });

        Ok(response)
    }
}

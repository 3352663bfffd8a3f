// svckit/src/http/mock.rs
//
// Recording in-memory transport for unit tests
//

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::Method;
use std::sync::Arc;

use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::errors::{ClientError, Result};

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync;

#[derive(Clone)]
pub struct MockTransport {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn json(status: u16, value: serde_json::Value) -> Result<ApiResponse> {
        Ok(ApiResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: Bytes::from(value.to_string()),
        })
    }

    pub fn text(status: u16, text: &str) -> Result<ApiResponse> {
        Ok(ApiResponse {
            status,
            content_type: Some("text/plain".to_string()),
            body: Bytes::from(text.to_string()),
        })
    }

    pub fn bytes(content_type: &str, data: &[u8]) -> Result<ApiResponse> {
        Ok(ApiResponse {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: Bytes::copy_from_slice(data),
        })
    }

    pub fn empty(status: u16) -> Result<ApiResponse> {
        Ok(ApiResponse {
            status,
            content_type: None,
            body: Bytes::new(),
        })
    }

    pub fn network_down() -> Result<ApiResponse> {
        Err(ClientError::Network("connection refused".to_string()))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn last(&self) -> Option<ApiRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = (self.handler)(&request);
        self.requests.lock().push(request);
        response
    }
}

// svckit/src/http/client.rs
//
// API client wrapper: bearer token from the session on every request,
// forced logout + redirect to login on 401. No retries.
//

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use super::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
use crate::config::ClientConfig;
use crate::errors::{ClientError, Result};
use crate::metrics;
use crate::navigation::Navigator;
use crate::storage::Session;
use crate::types::ImageBlob;

pub const API_PREFIX: &str = "/api";

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Session,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Session, navigator: Navigator) -> Self {
        Self {
            transport,
            session,
            navigator,
        }
    }

    pub fn from_config(config: &ClientConfig, session: Session, navigator: Navigator) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.api.base_url, config.api.timeout())?;
        Ok(Self::new(Arc::new(transport), session, navigator))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Send a request under `/api`, returning the raw response on 2xx
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        request.path = format!("{}{}", API_PREFIX, request.path);
        if let Some(token) = self.session.token() {
            request.set_header("Authorization", format!("Bearer {}", token));
        }
        request.set_header("X-Request-Id", Uuid::new_v4().to_string());

        let method = request.method.to_string();
        let path = request.path.clone();
        let start = Instant::now();

        let result = self.transport.send(request).await;
        let elapsed = start.elapsed().as_secs_f64();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_request(&method, None, elapsed);
                warn!("{} {} failed: {}", method, path, e);
                return Err(e);
            }
        };

        metrics::record_request(&method, Some(response.status), elapsed);
        debug!("{} {} -> {} in {:.3}s", method, path, response.status, elapsed);

        if response.status == 401 {
            warn!("Unauthorized request to {} - clearing session", path);
            if let Err(e) = self.session.clear_credentials() {
                warn!("Failed to clear session: {}", e);
            }
            self.navigator.redirect_to_login();
            return Err(ClientError::Unauthorized);
        }

        if !response.is_success() {
            return Err(ClientError::Http {
                status: response.status,
                message: error_message(&response),
            });
        }

        Ok(response)
    }

    /// Send and decode a JSON body
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(request).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Send and discard whatever body comes back
    pub async fn send(&self, request: ApiRequest) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }

    pub async fn fetch_blob(&self, request: ApiRequest) -> Result<ImageBlob> {
        let response = self.execute(request).await?;
        Ok(ImageBlob {
            content_type: response
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            data: response.body,
        })
    }
}

fn error_message(response: &ApiResponse) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&response.body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let text = String::from_utf8_lossy(&response.body);
    let text = text.trim();
    if text.is_empty() {
        format!("request failed with status {}", response.status)
    } else {
        text.chars().take(200).collect()
    }
}

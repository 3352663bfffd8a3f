// svckit/src/services/contact.rs
//
// Contact form submission (`POST /contact`)
//

use std::sync::Arc;
use tracing::info;

use crate::errors::Result;
use crate::http::{ApiClient, ApiRequest};
use crate::types::ContactRequest;

#[derive(Clone)]
pub struct ContactService {
    client: Arc<ApiClient>,
}

impl ContactService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// The server answers with a plain-text acknowledgement
    pub async fn send_contact(&self, request: &ContactRequest) -> Result<String> {
        let response = self.client.execute(ApiRequest::post("/contact").json(request)?).await?;
        info!("Contact message sent ({:?})", request.kind);
        Ok(String::from_utf8_lossy(&response.body).trim().to_string())
    }
}

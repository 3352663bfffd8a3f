use std::sync::Arc;
use tracing::info;

use crate::errors::Result;
use crate::http::{ApiClient, ApiRequest};
use crate::types::{LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest, SignupRequest};

#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<MessageResponse> {
        self.client.fetch(ApiRequest::post("/auth/signup").json(request)?).await
    }

    /// Log in and persist the returned token and username
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.client.fetch(ApiRequest::post("/auth/login").json(&body)?).await?;
        self.client.session().store_login(&response.token, &response.username)?;
        info!("Logged in as {}", response.username);
        Ok(response)
    }

    pub fn logout(&self) -> Result<()> {
        self.client.session().clear_credentials()?;
        self.client.navigator().redirect_to_login();
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let request = ApiRequest::post("/password/forgot").json(&serde_json::json!({ "email": email }))?;
        self.client.fetch(request).await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<MessageResponse> {
        self.client.fetch(ApiRequest::post("/password/reset").json(request)?).await
    }
}

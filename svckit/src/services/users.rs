use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::errors::Result;
use crate::http::{ApiClient, ApiRequest, FilePart};
use crate::types::{MessageResponse, PasswordChange, ProfileUpdate, Role, User};

#[derive(Clone)]
pub struct UserService {
    client: Arc<ApiClient>,
}

impl UserService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_current_user(&self) -> Result<User> {
        self.client.fetch(ApiRequest::get("/user/me")).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.client.fetch(ApiRequest::put("/user/me").json(update)?).await
    }

    pub async fn update_password(&self, current_password: &str, new_password: &str) -> Result<()> {
        let body = PasswordChange {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.client.send(ApiRequest::put("/user/password").json(&body)?).await
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>> {
        self.client.fetch(ApiRequest::get("/user/all")).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.client.fetch(ApiRequest::get(format!("/user/{}", username))).await
    }

    /// The body is a bare JSON array of role names, never an object
    pub async fn update_user_roles(&self, username: &str, roles: &BTreeSet<Role>) -> Result<()> {
        let roles: Vec<Role> = roles.iter().copied().collect();
        let request = ApiRequest::put(format!("/user/{}/roles", username)).json(&roles)?;
        self.client.send(request).await?;
        info!("Updated roles for {}: {:?}", username, roles);
        Ok(())
    }

    pub async fn delete_user(&self, username: &str) -> Result<()> {
        self.client.send(ApiRequest::delete(format!("/user/{}", username))).await
    }

    pub async fn upload_profile_picture(&self, file: FilePart) -> Result<MessageResponse> {
        let request = ApiRequest::post("/user/profile-picture").multipart(file);
        self.client.fetch(request).await
    }
}

// services/biznest-dash/src/profile.rs
//
// Current user's profile: edit buffer, password change, profile picture
//

use std::path::Path;
use tracing::{info, warn};

use svckit::http::FilePart;
use svckit::types::{PasswordChange, ProfileUpdate, User};
use svckit::validation::validate_password_change;
use svckit::BizNest;

pub const LOAD_ERROR: &str = "Failed to load profile data. Please try again later.";
pub const SAVE_ERROR: &str = "Failed to update profile. Please try again.";
pub const PASSWORD_ERROR: &str = "Failed to update password. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub display_name: String,
    pub email: String,
    pub bio: String,
    pub location: String,
    pub website: String,
}

impl ProfileForm {
    fn from_user(user: &User) -> Self {
        Self {
            display_name: user.display_name.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
            bio: user.bio.clone().unwrap_or_default(),
            location: user.location.clone().unwrap_or_default(),
            website: user.website.clone().unwrap_or_default(),
        }
    }

    fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            display_name: Some(self.display_name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            bio: Some(self.bio.clone()),
            location: Some(self.location.trim().to_string()),
            website: Some(self.website.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

pub struct ProfileView {
    app: BizNest,
    pub user: Option<User>,
    pub form: ProfileForm,
    pub password: PasswordForm,
    pub editing: bool,
    pub error: Option<String>,
    pub password_error: Option<String>,
    pub notice: Option<String>,
}

impl ProfileView {
    pub fn new(app: BizNest) -> Self {
        Self {
            app,
            user: None,
            form: ProfileForm::default(),
            password: PasswordForm::default(),
            editing: false,
            error: None,
            password_error: None,
            notice: None,
        }
    }

    pub async fn load(&mut self) -> bool {
        match self.app.users.get_current_user().await {
            Ok(user) => {
                self.form = ProfileForm::from_user(&user);
                self.user = Some(user);
                self.error = None;
                true
            }
            Err(e) => {
                warn!("Error loading profile: {}", e);
                self.error = Some(LOAD_ERROR.to_string());
                false
            }
        }
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
        self.notice = None;
    }

    /// Discard the buffer and go back to the loaded profile
    pub fn cancel_editing(&mut self) {
        if let Some(user) = &self.user {
            self.form = ProfileForm::from_user(user);
        }
        self.editing = false;
    }

    pub async fn save(&mut self) -> bool {
        self.notice = None;
        match self.app.users.update_profile(&self.form.to_update()).await {
            Ok(user) => {
                info!("Profile updated for {}", user.username);
                self.form = ProfileForm::from_user(&user);
                self.user = Some(user);
                self.editing = false;
                self.error = None;
                self.notice = Some("Profile updated successfully".to_string());
                true
            }
            Err(e) => {
                warn!("Error updating profile: {}", e);
                self.error = Some(SAVE_ERROR.to_string());
                false
            }
        }
    }

    /// Validated before any request; the form clears only on success
    pub async fn change_password(&mut self) -> bool {
        self.password_error = None;
        self.notice = None;

        let form = &self.password;
        let change = PasswordChange {
            current_password: form.current.clone(),
            new_password: form.new.clone(),
        };
        if let Err(e) = validate_password_change(&change, &form.confirm) {
            self.password_error = Some(e.user_message());
            return false;
        }

        match self.app.users.update_password(&change.current_password, &change.new_password).await {
            Ok(()) => {
                info!("Password changed");
                self.password = PasswordForm::default();
                self.notice = Some("Password updated successfully".to_string());
                true
            }
            Err(e) => {
                warn!("Error updating password: {}", e);
                let message = match e.status() {
                    Some(400) => e.user_message(),
                    _ => PASSWORD_ERROR.to_string(),
                };
                self.password_error = Some(message);
                false
            }
        }
    }

    pub async fn upload_picture(&mut self, path: &Path) -> bool {
        self.notice = None;
        let file = match FilePart::from_path(path) {
            Ok(file) => file,
            Err(e) => {
                self.error = Some(e.user_message());
                return false;
            }
        };
        match self.app.users.upload_profile_picture(file).await {
            Ok(response) => {
                self.notice = Some(response.message);
                self.load().await
            }
            Err(e) => {
                warn!("Failed to upload profile picture: {}", e);
                self.error = Some(e.user_message());
                false
            }
        }
    }
}

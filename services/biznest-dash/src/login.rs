// services/biznest-dash/src/login.rs
//
// Login, signup and password recovery forms
//

use tracing::{info, warn};

use svckit::navigation::Route;
use svckit::types::{LoginRequest, ResetPasswordRequest, SignupRequest};
use svckit::validation::{validate_email, validate_login, validate_reset, validate_signup};
use svckit::{BizNest, ClientError};

pub const REGISTERED: &str = "Registration successful! Please login.";
pub const GENERIC_ERROR: &str = "An error occurred. Please check your credentials and try again.";
pub const BAD_CREDENTIALS: &str = "Error: Invalid username or password.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Login,
    Signup,
    ForgotPassword,
    ResetPassword,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub otp: String,
}

pub struct LoginView {
    app: BizNest,
    pub mode: LoginMode,
    pub form: LoginForm,
    pub error: Option<String>,
    pub notice: Option<String>,
}

fn failure_message(err: &ClientError) -> String {
    match err {
        ClientError::Validation { message, .. } => message.clone(),
        ClientError::Unauthorized => BAD_CREDENTIALS.to_string(),
        ClientError::Http { message, .. } if !message.is_empty() => message.clone(),
        _ => GENERIC_ERROR.to_string(),
    }
}

impl LoginView {
    pub fn new(app: BizNest) -> Self {
        Self {
            app,
            mode: LoginMode::Login,
            form: LoginForm::default(),
            error: None,
            notice: None,
        }
    }

    pub fn switch_mode(&mut self, mode: LoginMode) {
        self.mode = mode;
        self.error = None;
        self.notice = None;
    }

    pub async fn submit(&mut self) -> bool {
        self.error = None;
        self.notice = None;

        let result = match self.mode {
            LoginMode::Login => self.login().await,
            LoginMode::Signup => self.signup().await,
            LoginMode::ForgotPassword => self.forgot_password().await,
            LoginMode::ResetPassword => self.reset_password().await,
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("{:?} form failed: {}", self.mode, e);
                self.error = Some(failure_message(&e));
                false
            }
        }
    }

    /// Stores the session, mirrors the server role into the admin flag
    /// and goes home
    async fn login(&mut self) -> svckit::Result<()> {
        validate_login(&LoginRequest {
            username: self.form.username.clone(),
            password: self.form.password.clone(),
        })?;
        let response = self
            .app
            .auth
            .login(self.form.username.trim(), &self.form.password)
            .await?;

        let user = self.app.users.get_current_user().await?;
        self.app.session.set_admin(user.is_admin())?;
        info!("{} signed in (admin: {})", response.username, user.is_admin());

        self.form = LoginForm::default();
        self.app.navigator.navigate(Route::Home);
        Ok(())
    }

    async fn signup(&mut self) -> svckit::Result<()> {
        let request = SignupRequest {
            username: self.form.username.trim().to_string(),
            email: self.form.email.trim().to_string(),
            password: self.form.password.clone(),
        };
        validate_signup(&request, &self.form.confirm_password)?;
        self.app.auth.signup(&request).await?;

        self.mode = LoginMode::Login;
        self.form.email.clear();
        self.form.confirm_password.clear();
        self.notice = Some(REGISTERED.to_string());
        Ok(())
    }

    async fn forgot_password(&mut self) -> svckit::Result<()> {
        validate_email(&self.form.email)?;
        let response = self.app.auth.forgot_password(self.form.email.trim()).await?;
        self.mode = LoginMode::ResetPassword;
        self.notice = Some(response.message);
        Ok(())
    }

    async fn reset_password(&mut self) -> svckit::Result<()> {
        let request = ResetPasswordRequest {
            email: self.form.email.trim().to_string(),
            otp: self.form.otp.trim().to_string(),
            new_password: self.form.password.clone(),
        };
        validate_reset(&request)?;
        let response = self.app.auth.reset_password(&request).await?;

        self.mode = LoginMode::Login;
        self.form.password.clear();
        self.form.otp.clear();
        self.notice = Some(response.message);
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.app.auth.logout() {
            warn!("Logout failed to clear session: {}", e);
        }
        self.form = LoginForm::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        let validation = ClientError::validation("username", "User Name can not be empty");
        assert_eq!(failure_message(&validation), "User Name can not be empty");
        assert_eq!(failure_message(&ClientError::Unauthorized), BAD_CREDENTIALS);

        let taken = ClientError::Http {
            status: 400,
            message: "Error: Username is already taken!".into(),
        };
        assert_eq!(failure_message(&taken), "Error: Username is already taken!");
        assert_eq!(failure_message(&ClientError::Network("down".into())), GENERIC_ERROR);
    }
}

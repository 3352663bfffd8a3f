// services/biznest-dash/src/gate.rs
//
// Admin gate in front of the dashboard
//

use tracing::{info, warn};

use svckit::config::AdminGateMode;
use svckit::services::{AuthService, UserService};
use svckit::storage::Session;
use svckit::BizNest;

pub const DEMO_ADMIN_USERNAME: &str = "BIZNEST.CREATOR";
pub const DEMO_ADMIN_PASSWORD: &str = "password123";
pub const GATE_ERROR: &str = "Invalid admin credentials";

pub struct AdminGate {
    mode: AdminGateMode,
    session: Session,
    auth: AuthService,
    users: UserService,
    unlocked: bool,
    error: Option<String>,
}

impl AdminGate {
    /// The gate starts open when the session already carries the admin flag
    pub fn new(mode: AdminGateMode, session: Session, auth: AuthService, users: UserService) -> Self {
        let unlocked = session.is_admin();
        Self {
            mode,
            session,
            auth,
            users,
            unlocked,
            error: None,
        }
    }

    pub fn from_context(app: &BizNest) -> Self {
        Self::new(
            app.config.admin_gate.mode,
            app.session.clone(),
            app.auth.clone(),
            app.users.clone(),
        )
    }

    pub fn mode(&self) -> AdminGateMode {
        self.mode
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check the submitted pair. Returns whether the gate is now open.
    pub async fn unlock(&mut self, username: &str, password: &str) -> bool {
        self.error = None;

        let granted = match self.mode {
            AdminGateMode::DemoCredentials => {
                username == DEMO_ADMIN_USERNAME && password == DEMO_ADMIN_PASSWORD
            }
            AdminGateMode::ServerRole => self.check_server_role(username, password).await,
        };

        if !granted {
            warn!("Admin gate rejected {}", username);
            self.error = Some(GATE_ERROR.to_string());
            return false;
        }

        if let Err(e) = self.session.set_admin(true) {
            warn!("Failed to persist admin flag: {}", e);
        }
        info!("Admin gate unlocked for {}", username);
        self.unlocked = true;
        true
    }

    async fn check_server_role(&self, username: &str, password: &str) -> bool {
        if let Err(e) = self.auth.login(username, password).await {
            warn!("Admin login failed: {}", e);
            return false;
        }
        match self.users.get_current_user().await {
            Ok(user) => user.is_admin(),
            Err(e) => {
                warn!("Could not load admin user: {}", e);
                false
            }
        }
    }

    /// Close the gate and drop the persisted flag
    pub fn lock(&mut self) {
        if let Err(e) = self.session.set_admin(false) {
            warn!("Failed to clear admin flag: {}", e);
        }
        self.unlocked = false;
    }
}

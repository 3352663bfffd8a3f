// services/biznest-dash/src/contact.rs
//
// Contact form: general inquiries or business listing requests
//

use tracing::{info, warn};

use svckit::types::{ContactKind, ContactRequest};
use svckit::validation::validate_contact;
use svckit::{BizNest, ClientError};

pub const SENT: &str = "Message sent! We will get back to you soon.";
pub const SEND_ERROR: &str = "Failed to send message. Please try again later.";
pub const NETWORK_ERROR: &str = "Error sending message.";

pub struct ContactView {
    app: BizNest,
    pub form: ContactRequest,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl ContactView {
    pub fn new(app: BizNest) -> Self {
        Self {
            app,
            form: ContactRequest::default(),
            error: None,
            notice: None,
        }
    }

    pub fn kind(&self) -> ContactKind {
        self.form.kind
    }

    pub fn toggle_kind(&mut self) {
        self.form.kind = self.form.kind.toggle();
    }

    /// The form clears on success but keeps the selected inbox
    pub async fn submit(&mut self) -> bool {
        self.error = None;
        self.notice = None;

        if let Err(e) = validate_contact(&self.form) {
            self.error = Some(e.user_message());
            return false;
        }
        let request = ContactRequest {
            full_name: self.form.full_name.trim().to_string(),
            email: self.form.email.trim().to_string(),
            message: self.form.message.trim().to_string(),
            kind: self.form.kind,
        };

        match self.app.contact.send_contact(&request).await {
            Ok(reply) => {
                info!("Contact form accepted: {}", reply);
                self.form = ContactRequest {
                    kind: request.kind,
                    ..ContactRequest::default()
                };
                self.notice = Some(SENT.to_string());
                true
            }
            Err(e) => {
                warn!("Contact form failed: {}", e);
                let message = match e {
                    ClientError::Network(_) | ClientError::Timeout(_) => NETWORK_ERROR,
                    _ => SEND_ERROR,
                };
                self.error = Some(message.to_string());
                false
            }
        }
    }
}

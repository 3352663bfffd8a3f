// svckit/src/validation.rs
//
// Form checks run before any request leaves the client. Field rules are
// derived on the request types; cross-field rules live here.
//

use validator::Validate;

use crate::errors::{field_failure, ClientError, Result};
use crate::types::{
    CategoryDraft, ContactRequest, ListingDraft, LoginRequest, PasswordChange, ResetPasswordRequest, ReviewDraft,
    SignupRequest,
};

/// Runs the derived rules, reporting the first failing field in form order
fn check<T: Validate>(value: &T, order: &[&str]) -> Result<()> {
    let errors = match value.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };
    let failures = errors.field_errors();
    for name in order {
        if let Some((field, kinds)) = failures.iter().find(|(field, _)| field.to_string() == *name) {
            return Err(field_failure(&field.to_string(), kinds));
        }
    }
    Err(errors.into())
}

#[derive(Validate)]
struct EmailField {
    #[validate(email(message = "Please enter a valid email address"))]
    email: String,
}

pub fn validate_email(email: &str) -> Result<()> {
    check(&EmailField { email: email.trim().to_string() }, &["email"])
}

pub fn validate_confirmation(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(ClientError::validation("confirmPassword", "Passwords don't match"));
    }
    Ok(())
}

pub fn validate_login(request: &LoginRequest) -> Result<()> {
    let trimmed = LoginRequest {
        username: request.username.trim().to_string(),
        password: request.password.clone(),
    };
    check(&trimmed, &["username", "password"])
}

pub fn validate_signup(request: &SignupRequest, confirmation: &str) -> Result<()> {
    let trimmed = SignupRequest {
        username: request.username.trim().to_string(),
        email: request.email.trim().to_string(),
        password: request.password.clone(),
    };
    check(&trimmed, &["username", "email", "password"])?;
    validate_confirmation(&request.password, confirmation)
}

pub fn validate_reset(request: &ResetPasswordRequest) -> Result<()> {
    let trimmed = ResetPasswordRequest {
        email: request.email.trim().to_string(),
        otp: request.otp.trim().to_string(),
        new_password: request.new_password.clone(),
    };
    check(&trimmed, &["email", "otp", "new_password"])
}

pub fn validate_password_change(change: &PasswordChange, confirmation: &str) -> Result<()> {
    check(change, &["current_password"])?;
    if change.new_password != confirmation {
        return Err(ClientError::validation("confirmPassword", "New passwords don't match"));
    }
    check(change, &["new_password"])?;
    if change.new_password == change.current_password {
        return Err(ClientError::validation(
            "newPassword",
            "New password must differ from the current one",
        ));
    }
    Ok(())
}

pub fn validate_review(draft: &ReviewDraft) -> Result<()> {
    let trimmed = ReviewDraft {
        rating: draft.rating,
        comment: draft.comment.trim().to_string(),
    };
    check(&trimmed, &["rating", "comment"])
}

pub fn validate_listing(draft: &ListingDraft) -> Result<()> {
    let trimmed = ListingDraft {
        name: draft.name.trim().to_string(),
        ..draft.clone()
    };
    check(&trimmed, &["name", "category_id"])
}

pub fn validate_category(draft: &CategoryDraft) -> Result<()> {
    let trimmed = CategoryDraft {
        name: draft.name.trim().to_string(),
        description: draft.description.clone(),
    };
    check(&trimmed, &["name"])
}

pub fn validate_contact(request: &ContactRequest) -> Result<()> {
    let trimmed = ContactRequest {
        full_name: request.full_name.trim().to_string(),
        email: request.email.trim().to_string(),
        message: request.message.trim().to_string(),
        kind: request.kind,
    };
    check(&trimmed, &["full_name", "email", "message"])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(err: ClientError) -> String {
        match err {
            ClientError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn change(current: &str, new: &str) -> PasswordChange {
        PasswordChange {
            current_password: current.to_string(),
            new_password: new.to_string(),
        }
    }

    #[test]
    fn test_login_rules() {
        assert_eq!(field(validate_login(&login("  ", "password123")).unwrap_err()), "username");
        assert_eq!(field(validate_login(&login("alice", "short")).unwrap_err()), "password");
        assert!(validate_login(&login("alice", "12345678")).is_ok());
    }

    #[test]
    fn test_first_failing_field_wins() {
        let err = validate_login(&login("", "short")).unwrap_err();
        assert_eq!(field(err), "username");
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email(" a@b.co ").is_ok());
        assert!(validate_email("plainaddress").is_err());
        assert!(validate_email("@b.co").is_err());
        assert!(validate_email("a@@b.co").is_err());
        assert!(validate_email("a b@c.co").is_err());
        assert_eq!(
            validate_email("nope").unwrap_err().user_message(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn test_signup_confirmation() {
        let request = SignupRequest {
            username: "bob".into(),
            email: "bob@x.io".into(),
            password: "password123".into(),
        };
        let err = validate_signup(&request, "password124").unwrap_err();
        assert_eq!(field(err), "confirmPassword");
        assert!(validate_signup(&request, "password123").is_ok());
    }

    #[test]
    fn test_reset_requires_code() {
        let request = ResetPasswordRequest {
            email: "bob@x.io".into(),
            otp: "   ".into(),
            new_password: "password123".into(),
        };
        assert_eq!(field(validate_reset(&request).unwrap_err()), "otp");
    }

    #[test]
    fn test_password_change_rules() {
        assert_eq!(field(validate_password_change(&change("", "newpass123"), "newpass123").unwrap_err()), "currentPassword");
        assert_eq!(field(validate_password_change(&change("old", "newpass123"), "other").unwrap_err()), "confirmPassword");
        assert_eq!(field(validate_password_change(&change("old", "short"), "short").unwrap_err()), "newPassword");
        assert_eq!(field(validate_password_change(&change("samepass1", "samepass1"), "samepass1").unwrap_err()), "newPassword");
        assert!(validate_password_change(&change("oldpass12", "newpass123"), "newpass123").is_ok());
    }

    #[test]
    fn test_review_rating_bounds() {
        let mut draft = ReviewDraft { rating: 0, comment: "meh".into() };
        assert_eq!(field(validate_review(&draft).unwrap_err()), "rating");
        draft.rating = 6;
        assert_eq!(field(validate_review(&draft).unwrap_err()), "rating");
        draft.rating = 4;
        assert!(validate_review(&draft).is_ok());
        draft.comment = "  ".into();
        assert_eq!(field(validate_review(&draft).unwrap_err()), "comment");
    }

    #[test]
    fn test_listing_needs_category() {
        let mut draft = ListingDraft { name: "Bean There".into(), ..Default::default() };
        let err = validate_listing(&draft).unwrap_err();
        assert_eq!(err.user_message(), "Please choose a category");
        assert_eq!(field(err), "categoryId");
        draft.category_id = Some(3);
        assert!(validate_listing(&draft).is_ok());
    }

    #[test]
    fn test_contact_rules() {
        let mut request = ContactRequest {
            full_name: " ".into(),
            email: "asha@biznest.local".into(),
            message: "Hi".into(),
            ..Default::default()
        };
        assert_eq!(field(validate_contact(&request).unwrap_err()), "fullName");
        request.full_name = "Asha".into();
        request.email = "asha".into();
        assert_eq!(field(validate_contact(&request).unwrap_err()), "email");
        request.email = "asha@biznest.local".into();
        assert!(validate_contact(&request).is_ok());
    }
}

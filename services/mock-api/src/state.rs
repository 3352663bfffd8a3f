// services/mock-api/src/state.rs
//
// In-memory BizNest backend. All mutations go through a single lock; the
// HTTP layer never holds it across an await.
//

use bytes::Bytes;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};
use uuid::Uuid;

use svckit::types::{
    AnalyticsSnapshot, Category, CategoryDraft, CategoryRef, CategoryStats, ContactRequest, Listing, ListingDraft,
    ListingStatus, LoginRequest, LoginResponse, MessageResponse, Page, PasswordChange,
    ProfileUpdate, ResetPasswordRequest, Review, ReviewDraft, Role, SignupRequest, User,
};

use svckit::validation::validate_contact;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Clone)]
struct StoredReview {
    review: Review,
    user_id: i64,
}

#[derive(Default)]
struct Data {
    accounts: BTreeMap<String, Account>,
    categories: BTreeMap<i64, Category>,
    listings: BTreeMap<i64, Listing>,
    reviews: BTreeMap<i64, StoredReview>,
    images: HashMap<i64, StoredImage>,
    pictures: HashMap<String, StoredImage>,
    tokens: HashMap<String, String>,
    otps: HashMap<String, String>,
    contact_messages: Vec<ContactRequest>,
    next_id: i64,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn account(&self, username: &str) -> ApiResult<&Account> {
        self.accounts
            .get(username)
            .ok_or_else(|| ApiError::not_found("User", username))
    }

    fn account_mut(&mut self, username: &str) -> ApiResult<&mut Account> {
        self.accounts
            .get_mut(username)
            .ok_or_else(|| ApiError::not_found("User", username))
    }

    fn user_by_id(&self, id: i64) -> Option<&User> {
        self.accounts
            .values()
            .map(|a| &a.user)
            .find(|u| u.id == Some(id))
    }

    fn category_ref(&self, id: i64) -> ApiResult<CategoryRef> {
        self.categories
            .get(&id)
            .map(|c| CategoryRef {
                id: Some(c.id),
                name: c.name.clone(),
            })
            .ok_or_else(|| ApiError::bad_request(format!("Category not found: {}", id)))
    }

    fn listing_reviews(&self, listing_id: i64) -> impl Iterator<Item = &StoredReview> {
        self.reviews
            .values()
            .filter(move |r| r.review.listing_id == Some(listing_id))
    }
}

/// Spring-style page over an already filtered list
pub fn paginate<T: Clone>(items: &[T], page: u32, size: u32) -> Page<T> {
    let size = if size == 0 { 10 } else { size };
    let total = items.len() as u64;
    let total_pages = ((total + size as u64 - 1) / size as u64) as u32;
    let start = (page as usize).saturating_mul(size as usize);
    let content = items
        .iter()
        .skip(start)
        .take(size as usize)
        .cloned()
        .collect();
    Page {
        content,
        total_elements: total,
        number: page,
        size,
        total_pages,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn require_text(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} must not be blank", field)));
    }
    Ok(())
}

fn check_review(draft: &ReviewDraft) -> ApiResult<()> {
    if !(1..=5).contains(&draft.rating) {
        return Err(ApiError::bad_request("Rating must be between 1 and 5"));
    }
    require_text(&draft.comment, "comment")
}

#[derive(Default)]
pub struct MockBackend {
    data: RwLock<Data>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Accounts and auth
    // -----------------------------------------------------------------

    /// Register an account directly, bypassing signup rules
    pub fn add_account(&self, username: &str, email: &str, password: &str, roles: &[Role]) -> User {
        let mut data = self.data.write();
        let id = data.next_id();
        let user = User {
            id: Some(id),
            username: username.to_string(),
            display_name: Some(username.to_string()),
            email: Some(email.to_string()),
            roles: roles.iter().copied().collect(),
            created_at: Some(Utc::now().naive_utc()),
            bio: None,
            location: None,
            website: None,
            profile_picture: None,
        };
        data.accounts.insert(
            username.to_string(),
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        user
    }

    pub fn signup(&self, request: &SignupRequest) -> ApiResult<MessageResponse> {
        require_text(&request.username, "username")?;
        require_text(&request.email, "email")?;
        require_text(&request.password, "password")?;
        {
            let data = self.data.read();
            if data.accounts.contains_key(&request.username) {
                return Err(ApiError::bad_request("Error: Username is already taken!"));
            }
            let email_taken = data
                .accounts
                .values()
                .any(|a| a.user.email.as_deref() == Some(request.email.as_str()));
            if email_taken {
                return Err(ApiError::bad_request("Error: Email is already in use!"));
            }
        }
        self.add_account(&request.username, &request.email, &request.password, &[Role::User]);
        info!("Registered user {}", request.username);
        Ok(MessageResponse {
            message: "User registered successfully!".to_string(),
        })
    }

    pub fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let mut data = self.data.write();
        let valid = data
            .accounts
            .get(&request.username)
            .map(|a| a.password == request.password)
            .unwrap_or(false);
        if !valid {
            return Err(ApiError::InvalidCredentials);
        }
        let token = Uuid::new_v4().simple().to_string();
        data.tokens.insert(token.clone(), request.username.clone());
        debug!("Issued token for {}", request.username);
        Ok(LoginResponse {
            token,
            username: request.username.clone(),
        })
    }

    /// Resolve a bearer token to its user
    pub fn authenticate(&self, token: &str) -> ApiResult<User> {
        let data = self.data.read();
        let username = data.tokens.get(token).ok_or(ApiError::Unauthorized)?;
        data.accounts
            .get(username)
            .map(|a| a.user.clone())
            .ok_or(ApiError::Unauthorized)
    }

    /// Invalidate every issued token
    pub fn revoke_tokens(&self) {
        self.data.write().tokens.clear();
    }

    pub fn forgot_password(&self, email: &str) -> ApiResult<MessageResponse> {
        let mut data = self.data.write();
        let known = data
            .accounts
            .values()
            .any(|a| a.user.email.as_deref() == Some(email));
        if !known {
            return Err(ApiError::NotFound(format!("No account registered for {}", email)));
        }
        let otp = format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000);
        info!("Password reset OTP for {}: {}", email, otp);
        data.otps.insert(email.to_string(), otp);
        Ok(MessageResponse {
            message: "OTP sent to your email.".to_string(),
        })
    }

    /// Stands in for the mail relay: messages are kept for inspection
    pub fn submit_contact(&self, request: ContactRequest) -> ApiResult<()> {
        validate_contact(&request).map_err(|e| ApiError::bad_request(e.user_message()))?;
        info!("Contact message ({:?}) from {}", request.kind, request.email);
        self.data.write().contact_messages.push(request);
        Ok(())
    }

    pub fn contact_messages(&self) -> Vec<ContactRequest> {
        self.data.read().contact_messages.clone()
    }

    /// Outstanding reset code for an email, if any
    pub fn otp_for(&self, email: &str) -> Option<String> {
        self.data.read().otps.get(email).cloned()
    }

    pub fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<MessageResponse> {
        require_text(&request.new_password, "newPassword")?;
        let mut data = self.data.write();
        if data.otps.get(&request.email) != Some(&request.otp) {
            return Err(ApiError::bad_request("Invalid or expired OTP"));
        }
        data.otps.remove(&request.email);
        let account = data
            .accounts
            .values_mut()
            .find(|a| a.user.email.as_deref() == Some(request.email.as_str()))
            .ok_or_else(|| ApiError::not_found("User", &request.email))?;
        account.password = request.new_password.clone();
        Ok(MessageResponse {
            message: "Password reset successful.".to_string(),
        })
    }

    // -----------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------

    pub fn user(&self, username: &str) -> ApiResult<User> {
        Ok(self.data.read().account(username)?.user.clone())
    }

    pub fn all_users(&self) -> Vec<User> {
        self.data
            .read()
            .accounts
            .values()
            .map(|a| a.user.clone())
            .collect()
    }

    pub fn update_profile(&self, username: &str, update: &ProfileUpdate) -> ApiResult<User> {
        let mut data = self.data.write();
        let user = &mut data.account_mut(username)?.user;
        if let Some(display_name) = &update.display_name {
            user.display_name = Some(display_name.clone());
        }
        if let Some(email) = &update.email {
            user.email = Some(email.clone());
        }
        if let Some(bio) = &update.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(location) = &update.location {
            user.location = Some(location.clone());
        }
        if let Some(website) = &update.website {
            user.website = Some(website.clone());
        }
        Ok(user.clone())
    }

    pub fn change_password(&self, username: &str, change: &PasswordChange) -> ApiResult<MessageResponse> {
        let mut data = self.data.write();
        let account = data.account_mut(username)?;
        if account.password != change.current_password {
            return Err(ApiError::bad_request("Current password is incorrect"));
        }
        require_text(&change.new_password, "newPassword")?;
        account.password = change.new_password.clone();
        Ok(MessageResponse {
            message: "Password updated successfully".to_string(),
        })
    }

    pub fn set_roles(&self, username: &str, roles: &[Role]) -> ApiResult<MessageResponse> {
        if roles.is_empty() {
            return Err(ApiError::bad_request("At least one role is required"));
        }
        let mut data = self.data.write();
        let account = data.account_mut(username)?;
        account.user.roles = roles.iter().copied().collect::<BTreeSet<_>>();
        info!("Roles for {} set to {:?}", username, account.user.roles);
        Ok(MessageResponse {
            message: format!("Roles updated successfully for user: {}", username),
        })
    }

    /// Remove a non-admin account along with its sessions and reviews
    pub fn delete_user(&self, username: &str) -> ApiResult<()> {
        let mut data = self.data.write();
        let deletable = data
            .accounts
            .get(username)
            .map(|a| !a.user.is_admin())
            .unwrap_or(false);
        if !deletable {
            return Err(ApiError::bad_request(
                "Cannot delete user. User may be an admin or not found.",
            ));
        }
        let account = data
            .accounts
            .remove(username)
            .ok_or_else(|| ApiError::not_found("User", username))?;
        data.tokens.retain(|_, owner| owner != username);
        data.pictures.remove(username);
        if let Some(id) = account.user.id {
            data.reviews.retain(|_, r| r.user_id != id);
        }
        Ok(())
    }

    pub fn set_profile_picture(&self, username: &str, image: StoredImage) -> ApiResult<MessageResponse> {
        let mut data = self.data.write();
        data.account_mut(username)?.user.profile_picture =
            Some(format!("/api/user/{}/profile-picture", username));
        data.pictures.insert(username.to_string(), image);
        Ok(MessageResponse {
            message: "Profile picture uploaded successfully".to_string(),
        })
    }

    pub fn profile_picture(&self, username: &str) -> ApiResult<StoredImage> {
        self.data
            .read()
            .pictures
            .get(username)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Profile picture", username))
    }

    // -----------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------

    pub fn categories(&self) -> Vec<Category> {
        self.data.read().categories.values().cloned().collect()
    }

    pub fn category(&self, id: i64) -> ApiResult<Category> {
        self.data
            .read()
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Category", id))
    }

    pub fn create_category(&self, draft: &CategoryDraft) -> ApiResult<Category> {
        require_text(&draft.name, "name")?;
        let mut data = self.data.write();
        let duplicate = data
            .categories
            .values()
            .any(|c| c.name.eq_ignore_ascii_case(draft.name.trim()));
        if duplicate {
            return Err(ApiError::bad_request(format!("Category already exists: {}", draft.name)));
        }
        let id = data.next_id();
        let category = Category {
            id,
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
        };
        data.categories.insert(id, category.clone());
        Ok(category)
    }

    /// Rename propagates to every listing carrying the category
    pub fn update_category(&self, id: i64, draft: &CategoryDraft) -> ApiResult<Category> {
        require_text(&draft.name, "name")?;
        let mut data = self.data.write();
        let category = data
            .categories
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("Category", id))?;
        category.name = draft.name.trim().to_string();
        category.description = draft.description.clone();
        let updated = category.clone();
        for listing in data.listings.values_mut() {
            if let Some(category) = listing.category.as_mut().filter(|c| c.id == Some(id)) {
                category.name = updated.name.clone();
            }
        }
        Ok(updated)
    }

    pub fn delete_category(&self, id: i64) -> ApiResult<()> {
        let mut data = self.data.write();
        if !data.categories.contains_key(&id) {
            return Err(ApiError::not_found("Category", id));
        }
        let in_use = data
            .listings
            .values()
            .filter(|l| l.category.as_ref().and_then(|c| c.id) == Some(id))
            .count();
        if in_use > 0 {
            return Err(ApiError::Conflict(format!(
                "Category is still used by {} listings",
                in_use
            )));
        }
        data.categories.remove(&id);
        Ok(())
    }

    /// Listing count for every category, zero included
    pub fn category_stats(&self) -> CategoryStats {
        let data = self.data.read();
        let mut stats: CategoryStats = data
            .categories
            .values()
            .map(|c| (c.name.clone(), 0))
            .collect();
        for name in data.listings.values().filter_map(|l| l.category_name()) {
            *stats.entry(name.to_string()).or_insert(0) += 1;
        }
        stats
    }

    // -----------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------

    pub fn listings_page(&self, page: u32, size: u32) -> Page<Listing> {
        let data = self.data.read();
        let all: Vec<Listing> = data.listings.values().cloned().collect();
        paginate(&all, page, size)
    }

    pub fn listing(&self, id: i64) -> ApiResult<Listing> {
        self.data
            .read()
            .listings
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Listing", id))
    }

    pub fn create_listing(
        &self,
        draft: &ListingDraft,
        category_id: Option<i64>,
        owner_id: Option<i64>,
    ) -> ApiResult<Listing> {
        require_text(&draft.name, "name")?;
        let category_id = category_id.ok_or_else(|| ApiError::bad_request("categoryId is required"))?;
        let mut data = self.data.write();
        let category = data.category_ref(category_id)?;
        if let Some(owner) = owner_id {
            if data.user_by_id(owner).is_none() {
                return Err(ApiError::bad_request(format!("Owner not found: {}", owner)));
            }
        }
        let id = data.next_id();
        let listing = Listing {
            id,
            name: draft.name.trim().to_string(),
            category: Some(category),
            location: draft.location.clone(),
            address: draft.address.clone(),
            phone: draft.phone.clone(),
            business_hours: draft.business_hours.clone(),
            rating: draft.rating,
            status: draft.status,
            owner: owner_id,
            description: draft.description.clone(),
            image_url: None,
        };
        data.listings.insert(id, listing.clone());
        info!("Created listing {} ({})", id, listing.name);
        Ok(listing)
    }

    pub fn update_listing(
        &self,
        id: i64,
        draft: &ListingDraft,
        category_id: Option<i64>,
        owner_id: Option<i64>,
    ) -> ApiResult<Listing> {
        require_text(&draft.name, "name")?;
        let mut data = self.data.write();
        let category = category_id.map(|c| data.category_ref(c)).transpose()?;
        let listing = data
            .listings
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("Listing", id))?;
        listing.name = draft.name.trim().to_string();
        listing.location = draft.location.clone();
        listing.address = draft.address.clone();
        listing.phone = draft.phone.clone();
        listing.business_hours = draft.business_hours.clone();
        listing.status = draft.status;
        listing.description = draft.description.clone();
        if draft.rating.is_some() {
            listing.rating = draft.rating;
        }
        if category.is_some() {
            listing.category = category;
        }
        if owner_id.is_some() {
            listing.owner = owner_id;
        }
        Ok(listing.clone())
    }

    /// Delete a listing with its image and reviews
    pub fn delete_listing(&self, id: i64) -> ApiResult<()> {
        let mut data = self.data.write();
        data.listings
            .remove(&id)
            .ok_or_else(|| ApiError::not_found("Listing", id))?;
        data.images.remove(&id);
        data.reviews.retain(|_, r| r.review.listing_id != Some(id));
        info!("Deleted listing {}", id);
        Ok(())
    }

    /// Case-insensitive substring match on name, category and location;
    /// blank filters match everything
    pub fn search_listings(&self, name: &str, category: &str, location: &str, page: u32, size: u32) -> Page<Listing> {
        let data = self.data.read();
        let matches: Vec<Listing> = data
            .listings
            .values()
            .filter(|l| contains_ci(&l.name, name.trim()))
            .filter(|l| contains_ci(l.category_name().unwrap_or_default(), category.trim()))
            .filter(|l| contains_ci(&l.location, location.trim()))
            .cloned()
            .collect();
        paginate(&matches, page, size)
    }

    pub fn listings_by_category(&self, category_id: i64) -> Vec<Listing> {
        self.data
            .read()
            .listings
            .values()
            .filter(|l| l.category.as_ref().and_then(|c| c.id) == Some(category_id))
            .cloned()
            .collect()
    }

    pub fn listings_by_owner(&self, owner_id: i64) -> Vec<Listing> {
        self.data
            .read()
            .listings
            .values()
            .filter(|l| l.owner == Some(owner_id))
            .cloned()
            .collect()
    }

    pub fn set_listing_image(&self, id: i64, image: StoredImage) -> ApiResult<()> {
        let mut data = self.data.write();
        let listing = data
            .listings
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("Listing", id))?;
        listing.image_url = Some(format!("/api/listings/{}/image", id));
        data.images.insert(id, image);
        Ok(())
    }

    pub fn listing_image(&self, id: i64) -> ApiResult<StoredImage> {
        self.data
            .read()
            .images
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Image for listing", id))
    }

    // -----------------------------------------------------------------
    // Reviews
    // -----------------------------------------------------------------

    pub fn create_review(&self, draft: &ReviewDraft, user_id: i64, listing_id: i64) -> ApiResult<Review> {
        check_review(draft)?;
        let mut data = self.data.write();
        let username = data
            .user_by_id(user_id)
            .map(|u| u.username.clone())
            .ok_or_else(|| ApiError::bad_request(format!("User not found: {}", user_id)))?;
        let business_name = data
            .listings
            .get(&listing_id)
            .map(|l| l.name.clone())
            .ok_or_else(|| ApiError::bad_request(format!("Business listing not found: {}", listing_id)))?;
        if data.listing_reviews(listing_id).any(|r| r.user_id == user_id) {
            return Err(ApiError::bad_request("User has already reviewed this business"));
        }

        let id = data.next_id();
        let now = Utc::now().naive_utc();
        let review = Review {
            id,
            rating: draft.rating,
            comment: draft.comment.trim().to_string(),
            username,
            business_name: Some(business_name),
            listing_id: Some(listing_id),
            business_response: None,
            response_date: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        data.reviews.insert(
            id,
            StoredReview {
                review: review.clone(),
                user_id,
            },
        );
        info!("Review {} created for listing {}", id, listing_id);
        Ok(review)
    }

    pub fn review(&self, id: i64) -> ApiResult<Review> {
        self.data
            .read()
            .reviews
            .get(&id)
            .map(|r| r.review.clone())
            .ok_or_else(|| ApiError::not_found("Review", id))
    }

    pub fn update_review(&self, id: i64, draft: &ReviewDraft) -> ApiResult<Review> {
        check_review(draft)?;
        let mut data = self.data.write();
        let stored = data
            .reviews
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("Review", id))?;
        stored.review.rating = draft.rating;
        stored.review.comment = draft.comment.trim().to_string();
        stored.review.updated_at = Some(Utc::now().naive_utc());
        Ok(stored.review.clone())
    }

    pub fn add_response(&self, id: i64, response: &str) -> ApiResult<Review> {
        let mut data = self.data.write();
        let stored = data
            .reviews
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("Review", id))?;
        stored.review.business_response = Some(response.to_string());
        stored.review.response_date = Some(Utc::now().naive_utc());
        Ok(stored.review.clone())
    }

    pub fn delete_review(&self, id: i64) -> ApiResult<()> {
        self.data
            .write()
            .reviews
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found("Review", id))
    }

    pub fn reviews_by_listing(&self, listing_id: i64) -> ApiResult<Vec<Review>> {
        let data = self.data.read();
        if !data.listings.contains_key(&listing_id) {
            return Err(ApiError::not_found("Business listing", listing_id));
        }
        Ok(data.listing_reviews(listing_id).map(|r| r.review.clone()).collect())
    }

    pub fn reviews_by_user(&self, user_id: i64) -> ApiResult<Vec<Review>> {
        let data = self.data.read();
        if data.user_by_id(user_id).is_none() {
            return Err(ApiError::not_found("User", user_id));
        }
        Ok(data
            .reviews
            .values()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.review.clone())
            .collect())
    }

    /// Rounded to one decimal, 0.0 without reviews
    pub fn average_rating(&self, listing_id: i64) -> ApiResult<f64> {
        let reviews = self.reviews_by_listing(listing_id)?;
        if reviews.is_empty() {
            return Ok(0.0);
        }
        let sum: u32 = reviews.iter().map(|r| r.rating as u32).sum();
        Ok(round1(sum as f64 / reviews.len() as f64))
    }

    pub fn review_count(&self, listing_id: i64) -> ApiResult<u64> {
        Ok(self.reviews_by_listing(listing_id)?.len() as u64)
    }

    pub fn reviews_by_response(&self, answered: bool) -> Vec<Review> {
        self.data
            .read()
            .reviews
            .values()
            .filter(|r| r.review.has_response() == answered)
            .map(|r| r.review.clone())
            .collect()
    }

    pub fn has_reviewed(&self, user_id: i64, listing_id: i64) -> bool {
        self.data
            .read()
            .listing_reviews(listing_id)
            .any(|r| r.user_id == user_id)
    }

    // -----------------------------------------------------------------
    // Dashboard
    // -----------------------------------------------------------------

    pub fn analytics(&self) -> AnalyticsSnapshot {
        let data = self.data.read();
        let count_status = |status: ListingStatus| {
            data.listings.values().filter(|l| l.status == status).count() as u64
        };
        let ratings: Vec<f64> = data.reviews.values().map(|r| r.review.rating as f64).collect();
        let average = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().sum::<f64>() / ratings.len() as f64
        };
        AnalyticsSnapshot {
            total_listings: data.listings.len() as u64,
            active_listings: count_status(ListingStatus::Approved),
            pending_listings: count_status(ListingStatus::Pending),
            total_users: data.accounts.len() as u64,
            total_reviews: data.reviews.len() as u64,
            pending_reviews: data.reviews.values().filter(|r| !r.review.has_response()).count() as u64,
            average_rating: round1(average),
            listings_trend: "N/A".to_string(),
            users_trend: "N/A".to_string(),
            reviews_trend: "N/A".to_string(),
            rating_trend: "N/A".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, status: ListingStatus) -> ListingDraft {
        ListingDraft {
            name: name.to_string(),
            status,
            ..ListingDraft::default()
        }
    }

    #[test]
    fn test_paginate_bounds() {
        let items: Vec<u32> = (0..23).collect();
        let page = paginate(&items, 2, 10);
        assert_eq!(page.content, vec![20, 21, 22]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 23);

        let past_end = paginate(&items, 7, 10);
        assert!(past_end.content.is_empty());
        assert_eq!(past_end.number, 7);

        assert_eq!(paginate::<u32>(&[], 0, 10).total_pages, 0);
    }

    #[test]
    fn test_one_review_per_user_and_listing() {
        let backend = MockBackend::new();
        let user = backend.add_account("ann", "ann@x.io", "password123", &[Role::User]);
        let cafes = backend
            .create_category(&CategoryDraft { name: "Cafes".into(), description: String::new() })
            .unwrap();
        let listing = backend
            .create_listing(&draft("Bean There", ListingStatus::Approved), Some(cafes.id), None)
            .unwrap();
        let uid = user.id.unwrap();
        let review = ReviewDraft { rating: 4, comment: "good".into() };

        backend.create_review(&review, uid, listing.id).unwrap();
        assert!(backend.has_reviewed(uid, listing.id));
        let err = backend.create_review(&review, uid, listing.id).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_category_rename_and_delete_rules() {
        let backend = MockBackend::new();
        let cafes = backend
            .create_category(&CategoryDraft { name: "Cafes".into(), description: String::new() })
            .unwrap();
        let listing = backend
            .create_listing(&draft("Bean There", ListingStatus::Approved), Some(cafes.id), None)
            .unwrap();

        backend
            .update_category(cafes.id, &CategoryDraft { name: "Coffee".into(), description: String::new() })
            .unwrap();
        assert_eq!(backend.listing(listing.id).unwrap().category_name(), Some("Coffee"));

        assert!(matches!(backend.delete_category(cafes.id), Err(ApiError::Conflict(_))));
        backend.delete_listing(listing.id).unwrap();
        backend.delete_category(cafes.id).unwrap();
        assert!(backend.category_stats().is_empty());
    }

    #[test]
    fn test_analytics_counts() {
        let backend = MockBackend::new();
        let user = backend.add_account("ann", "ann@x.io", "password123", &[Role::User]);
        let cat = backend
            .create_category(&CategoryDraft { name: "Gyms".into(), description: String::new() })
            .unwrap();
        let a = backend.create_listing(&draft("A", ListingStatus::Approved), Some(cat.id), None).unwrap();
        backend.create_listing(&draft("B", ListingStatus::Pending), Some(cat.id), None).unwrap();
        let review = backend
            .create_review(&ReviewDraft { rating: 4, comment: "ok".into() }, user.id.unwrap(), a.id)
            .unwrap();

        let snapshot = backend.analytics();
        assert_eq!(snapshot.total_listings, 2);
        assert_eq!(snapshot.active_listings, 1);
        assert_eq!(snapshot.pending_listings, 1);
        assert_eq!(snapshot.pending_reviews, 1);
        assert_eq!(snapshot.average_rating, 4.0);
        assert_eq!(snapshot.rating_trend, "N/A");

        backend.add_response(review.id, "thanks").unwrap();
        assert_eq!(backend.analytics().pending_reviews, 0);
        assert_eq!(backend.reviews_by_response(true).len(), 1);
    }
}

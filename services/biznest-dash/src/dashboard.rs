// services/biznest-dash/src/dashboard.rs
//
// Admin dashboard: six views behind the admin gate, modal forms for
// listings, categories, review responses and user roles, and
// confirm-gated deletes
//

use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use svckit::navigation::Route;
use svckit::types::{
    AnalyticsSnapshot, Category, CategoryDraft, Listing, ListingDraft, ListingStatus, Review, Role,
    User,
};
use svckit::validation::{validate_category, validate_listing};
use svckit::{BizNest, ClientError};

use crate::gate::AdminGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Listings,
    Categories,
    Analytics,
    Reviews,
    Users,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::Listings,
        View::Categories,
        View::Analytics,
        View::Reviews,
        View::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Listings => "listings",
            View::Categories => "categories",
            View::Analytics => "analytics",
            View::Reviews => "reviews",
            View::Users => "users",
        }
    }

    pub fn parse(tab: &str) -> Option<View> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(tab.trim()))
    }
}

// ---------------------------------------------------------------------------
// Form buffers
// ---------------------------------------------------------------------------

const DEFAULT_PHONE: &str = "+1 (555) 123-4567";
const DEFAULT_HOURS: &str = "9:00 AM - 5:00 PM";
const DEFAULT_RATING: f64 = 4.5;

#[derive(Debug, Clone, PartialEq)]
pub struct ListingForm {
    pub name: String,
    pub category_id: Option<i64>,
    pub location: String,
    pub status: ListingStatus,
    pub description: String,
    pub rating: f64,
    pub address: String,
    pub phone: String,
    pub business_hours: String,
}

impl Default for ListingForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            category_id: None,
            location: String::new(),
            status: ListingStatus::Approved,
            description: String::new(),
            rating: DEFAULT_RATING,
            address: String::new(),
            phone: String::new(),
            business_hours: String::new(),
        }
    }
}

impl ListingForm {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            name: listing.name.clone(),
            category_id: listing.category.as_ref().and_then(|c| c.id),
            location: listing.location.clone(),
            status: listing.status,
            description: listing.description.clone(),
            rating: listing.rating.unwrap_or(DEFAULT_RATING),
            address: listing.address.clone(),
            phone: listing.phone.clone(),
            business_hours: listing.business_hours.clone(),
        }
    }

    /// Blank contact fields get placeholder values
    pub fn to_draft(&self, owner_id: Option<i64>) -> ListingDraft {
        let or_default = |value: &str, default: String| {
            if value.trim().is_empty() {
                default
            } else {
                value.trim().to_string()
            }
        };
        ListingDraft {
            name: self.name.trim().to_string(),
            category_id: self.category_id,
            owner_id,
            location: self.location.trim().to_string(),
            status: self.status,
            description: self.description.clone(),
            address: or_default(&self.address, format!("{} Address", self.location.trim())),
            phone: or_default(&self.phone, DEFAULT_PHONE.to_string()),
            business_hours: or_default(&self.business_hours, DEFAULT_HOURS.to_string()),
            rating: Some(self.rating),
        }
    }
}

// ---------------------------------------------------------------------------
// Review filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Week,
    Month,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilters {
    pub business: Option<String>,
    pub rating: Option<u8>,
    pub window: DateWindow,
}

impl ReviewFilters {
    pub fn matches(&self, review: &Review, now: NaiveDateTime) -> bool {
        if let Some(business) = &self.business {
            if review.business_name.as_deref() != Some(business.as_str()) {
                return false;
            }
        }
        if let Some(rating) = self.rating {
            if review.rating != rating {
                return false;
            }
        }
        let Some(created) = review.created_at else {
            return self.window == DateWindow::All;
        };
        match self.window {
            DateWindow::All => true,
            DateWindow::Today => created.date() == now.date(),
            DateWindow::Week => created >= now - Duration::days(7),
            DateWindow::Month => created >= now - Duration::days(30),
        }
    }
}

/// Listing search over the loaded page: name, category or location
pub fn search_listings(listings: &[Listing], query: &str) -> Vec<Listing> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return listings.to_vec();
    }
    listings
        .iter()
        .filter(|l| {
            l.name.to_lowercase().contains(&query)
                || l.category_name().map_or(false, |c| c.to_lowercase().contains(&query))
                || l.location.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// Distinct business names across reviews, for the business filter
pub fn review_businesses(reviews: &[Review]) -> Vec<String> {
    reviews
        .iter()
        .filter_map(|r| r.business_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Modals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Listing(i64),
    Category(i64),
    Review(i64),
    User(String),
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        match self {
            PendingDelete::Listing(_) => "Are you sure you want to delete this listing?".to_string(),
            PendingDelete::Category(_) => "Are you sure you want to delete this category?".to_string(),
            PendingDelete::Review(_) => "Are you sure you want to delete this review?".to_string(),
            PendingDelete::User(username) => format!("Are you sure you want to delete user {}?", username),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    None,
    ListingForm { editing: Option<i64> },
    CategoryForm { editing: Option<i64> },
    Response { review_id: i64 },
    Roles { username: String },
    Confirm(PendingDelete),
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct Dashboard {
    app: BizNest,
    gate: AdminGate,
    view: View,
    modal: Modal,
    pub listing_form: ListingForm,
    pub category_form: CategoryDraft,
    pub response_text: String,
    pub role_selection: BTreeSet<Role>,
    pub search_query: String,
    pub review_filters: ReviewFilters,
    analytics: Option<AnalyticsSnapshot>,
    users: Vec<User>,
    alert: Option<String>,
}

impl Dashboard {
    /// Reads the `tab` route parameter once. Without a logged-in user the
    /// navigator is sent to login.
    pub async fn mount(app: BizNest) -> Self {
        let tab = match app.navigator.current() {
            Route::Dashboard { tab } => tab,
            _ => None,
        };
        let view = tab.as_deref().and_then(View::parse).unwrap_or(View::Dashboard);

        if !app.session.is_logged_in() {
            app.navigator.navigate(Route::Login);
        }

        let mut dashboard = Self {
            gate: AdminGate::from_context(&app),
            app,
            view,
            modal: Modal::None,
            listing_form: ListingForm::default(),
            category_form: CategoryDraft::default(),
            response_text: String::new(),
            role_selection: BTreeSet::new(),
            search_query: String::new(),
            review_filters: ReviewFilters::default(),
            analytics: None,
            users: Vec::new(),
            alert: None,
        };
        if dashboard.gate.is_unlocked() {
            dashboard.refresh_view().await;
        }
        dashboard
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    pub fn analytics(&self) -> Option<&AnalyticsSnapshot> {
        self.analytics.as_ref()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub async fn unlock(&mut self, username: &str, password: &str) -> bool {
        let unlocked = self.gate.unlock(username, password).await;
        if unlocked {
            self.refresh_view().await;
        }
        unlocked
    }

    pub async fn set_view(&mut self, view: View) {
        self.view = view;
        self.modal = Modal::None;
        if self.gate.is_unlocked() {
            self.refresh_view().await;
        }
    }

    /// Re-fetch exactly what the active view shows
    pub async fn refresh_view(&mut self) {
        debug!("Refreshing dashboard view {}", self.view.as_str());
        match self.view {
            View::Dashboard => self.refresh_analytics().await,
            View::Listings => {
                let (page, size) = {
                    let state = self.app.listings.snapshot().await;
                    (state.page, state.size)
                };
                tokio::join!(
                    self.app.listings.fetch_listings(page, size),
                    self.app.listings.fetch_categories(),
                );
            }
            View::Categories => {
                tokio::join!(
                    self.app.listings.fetch_categories(),
                    self.app.listings.fetch_category_stats(),
                );
            }
            View::Analytics => {
                let (analytics, _) = tokio::join!(
                    self.app.dashboard.get_dashboard_analytics(),
                    self.app.listings.fetch_category_stats(),
                );
                self.store_analytics(analytics);
            }
            View::Reviews => self.app.reviews.refresh_reviews().await,
            View::Users => self.refresh_users().await,
        }
    }

    async fn refresh_analytics(&mut self) {
        let analytics = self.app.dashboard.get_dashboard_analytics().await;
        self.store_analytics(analytics);
    }

    fn store_analytics(&mut self, analytics: svckit::Result<AnalyticsSnapshot>) {
        match analytics {
            Ok(snapshot) => self.analytics = Some(snapshot),
            Err(e) => warn!("Failed to fetch analytics: {}", e),
        }
    }

    async fn refresh_users(&mut self) {
        match self.app.users.get_all_users().await {
            Ok(users) => self.users = users,
            Err(e) => warn!("Failed to fetch users: {}", e),
        }
    }

    fn fail(&mut self, action: &str, err: ClientError) -> bool {
        warn!("{} failed: {}", action, err);
        self.alert = Some(format!("{} failed: {}", action, err.user_message()));
        false
    }

    /// Close the active modal and drop its buffer
    pub fn close_modal(&mut self) {
        match std::mem::replace(&mut self.modal, Modal::None) {
            Modal::ListingForm { .. } => self.listing_form = ListingForm::default(),
            Modal::CategoryForm { .. } => self.category_form = CategoryDraft::default(),
            Modal::Response { .. } => self.response_text.clear(),
            Modal::Roles { .. } => self.role_selection.clear(),
            Modal::Confirm(_) | Modal::None => {}
        }
    }

    // -----------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------

    pub async fn visible_listings(&self) -> Vec<Listing> {
        let state = self.app.listings.snapshot().await;
        search_listings(&state.listings, &self.search_query)
    }

    pub fn open_new_listing(&mut self) {
        self.listing_form = ListingForm::default();
        self.modal = Modal::ListingForm { editing: None };
    }

    pub fn open_edit_listing(&mut self, listing: &Listing) {
        self.listing_form = ListingForm::from_listing(listing);
        self.modal = Modal::ListingForm {
            editing: Some(listing.id),
        };
    }

    pub async fn submit_listing(&mut self) -> bool {
        let Modal::ListingForm { editing } = self.modal else {
            return false;
        };
        let owner_id = match editing {
            Some(_) => None,
            None => self.current_user_id().await,
        };
        let draft = self.listing_form.to_draft(owner_id);
        if let Err(e) = validate_listing(&draft) {
            return self.fail("Saving listing", e);
        }

        let result = match editing {
            Some(id) => self.app.listings.update_listing(id, &draft).await,
            None => self.app.listings.add_listing(&draft).await,
        };
        match result {
            Ok(listing) => {
                info!("Saved listing {} ({})", listing.id, listing.name);
                self.close_modal();
                self.refresh_analytics().await;
                true
            }
            Err(e) => self.fail("Saving listing", e),
        }
    }

    async fn current_user_id(&self) -> Option<i64> {
        match self.app.users.get_current_user().await {
            Ok(user) => user.id,
            Err(e) => {
                debug!("Listing owner unknown: {}", e);
                None
            }
        }
    }

    // -----------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------

    pub fn open_new_category(&mut self) {
        self.category_form = CategoryDraft::default();
        self.modal = Modal::CategoryForm { editing: None };
    }

    pub fn open_edit_category(&mut self, category: &Category) {
        self.category_form = CategoryDraft {
            name: category.name.clone(),
            description: category.description.clone(),
        };
        self.modal = Modal::CategoryForm {
            editing: Some(category.id),
        };
    }

    pub async fn submit_category(&mut self) -> bool {
        let Modal::CategoryForm { editing } = self.modal else {
            return false;
        };
        if let Err(e) = validate_category(&self.category_form) {
            return self.fail("Saving category", e);
        }
        let result = match editing {
            Some(id) => self.app.listings.update_category(id, &self.category_form).await,
            None => self.app.listings.create_category(&self.category_form).await,
        };
        match result {
            Ok(category) => {
                info!("Saved category {}", category.name);
                self.close_modal();
                true
            }
            Err(e) => self.fail("Saving category", e),
        }
    }

    // -----------------------------------------------------------------
    // Reviews
    // -----------------------------------------------------------------

    pub async fn filtered_reviews(&self, now: NaiveDateTime) -> Vec<Review> {
        let state = self.app.reviews.snapshot().await;
        state
            .reviews
            .into_iter()
            .filter(|r| self.review_filters.matches(r, now))
            .collect()
    }

    pub fn open_response(&mut self, review_id: i64) {
        self.response_text.clear();
        self.modal = Modal::Response { review_id };
    }

    pub async fn submit_response(&mut self) -> bool {
        let Modal::Response { review_id } = self.modal else {
            return false;
        };
        if self.response_text.trim().is_empty() {
            return self.fail(
                "Responding to review",
                ClientError::validation("response", "Response cannot be empty"),
            );
        }
        match self.app.reviews.add_response(review_id, self.response_text.trim()).await {
            Ok(_) => {
                self.close_modal();
                self.refresh_analytics().await;
                true
            }
            Err(e) => self.fail("Responding to review", e),
        }
    }

    // -----------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------

    pub fn open_roles(&mut self, user: &User) {
        self.role_selection = user.roles.clone();
        self.modal = Modal::Roles {
            username: user.username.clone(),
        };
    }

    pub fn toggle_role(&mut self, role: Role) {
        if !self.role_selection.remove(&role) {
            self.role_selection.insert(role);
        }
    }

    pub async fn submit_roles(&mut self) -> bool {
        let Modal::Roles { username } = self.modal.clone() else {
            return false;
        };
        if self.role_selection.is_empty() {
            return self.fail(
                "Updating roles",
                ClientError::validation("roles", "Select at least one role"),
            );
        }
        match self.app.users.update_user_roles(&username, &self.role_selection).await {
            Ok(()) => {
                info!("Roles updated for {}", username);
                self.close_modal();
                self.refresh_users().await;
                self.refresh_analytics().await;
                true
            }
            Err(e) => self.fail("Updating roles", e),
        }
    }

    // -----------------------------------------------------------------
    // Deletes
    // -----------------------------------------------------------------

    /// Deletes always pass through a confirmation step
    pub fn request_delete(&mut self, target: PendingDelete) {
        self.modal = Modal::Confirm(target);
    }

    pub async fn confirm_delete(&mut self) -> bool {
        let Modal::Confirm(target) = self.modal.clone() else {
            return false;
        };
        let result = match &target {
            PendingDelete::Listing(id) => self.app.listings.delete_listing(*id).await,
            PendingDelete::Category(id) => self.app.listings.delete_category(*id).await,
            PendingDelete::Review(id) => self.app.reviews.delete_review(*id).await,
            PendingDelete::User(username) => self.app.users.delete_user(username).await,
        };
        if let Err(e) = result {
            self.modal = Modal::None;
            return self.fail("Delete", e);
        }

        info!("Deleted {:?}", target);
        self.modal = Modal::None;
        match target {
            PendingDelete::Category(_) => {}
            PendingDelete::User(_) => {
                self.refresh_users().await;
                self.refresh_analytics().await;
            }
            PendingDelete::Listing(_) | PendingDelete::Review(_) => self.refresh_analytics().await,
        }
        true
    }
}

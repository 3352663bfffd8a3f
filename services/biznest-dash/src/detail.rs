// services/biznest-dash/src/detail.rs
//
// Listing detail: listing, its reviews and average, and a review form that
// creates a first review or edits the caller's existing one
//

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use svckit::images::ObjectUrl;
use svckit::types::{ImageBlob, Listing, Review, ReviewDraft, User};
use svckit::validation::validate_review;
use svckit::{BizNest, Result};

pub const LOAD_ERROR: &str = "Failed to load listing";
pub const SUBMIT_ERROR: &str = "Failed to submit review. Please try again.";
pub const LOGIN_REQUIRED: &str = "Please log in to leave a review";

/// Cleared on unmount; results arriving afterwards are dropped
#[derive(Clone)]
pub struct MountGuard(Arc<AtomicBool>);

impl MountGuard {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn release(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFormMode {
    Create,
    Edit { review_id: i64 },
}

/// Everything the detail view loads on mount
#[derive(Debug, Clone)]
pub struct DetailSnapshot {
    pub listing: Listing,
    pub reviews: Vec<Review>,
    pub average: String,
    pub user: Option<User>,
    pub has_reviewed: bool,
    pub image: Option<ImageBlob>,
}

/// Fetch the listing and its review context. Only the listing itself is
/// required; the user lookup is skipped when nobody is logged in.
pub async fn fetch_detail(app: &BizNest, listing_id: i64) -> Result<DetailSnapshot> {
    let listing = app.listing_api.get_listing(listing_id).await?;
    let reviews = app.reviews.get_reviews_by_listing(listing_id).await?;
    let average = app.reviews.get_average_rating_by_listing(listing_id).await;

    let mut user = None;
    let mut has_reviewed = false;
    if app.session.token().is_some() {
        match app.users.get_current_user().await {
            Ok(current) => {
                if let Some(user_id) = current.id {
                    has_reviewed = app
                        .reviews
                        .has_user_reviewed_business(user_id, listing_id)
                        .await
                        .unwrap_or_else(|e| {
                            warn!("Review check failed: {}", e);
                            false
                        });
                }
                user = Some(current);
            }
            Err(e) => debug!("No current user for detail view: {}", e),
        }
    }

    let image = match app.listing_api.get_listing_image(listing_id).await {
        Ok(blob) => Some(blob),
        Err(e) => {
            debug!("No image for listing {}: {}", listing_id, e);
            None
        }
    };

    Ok(DetailSnapshot {
        listing,
        reviews,
        average,
        user,
        has_reviewed,
        image,
    })
}

pub struct DetailView {
    app: BizNest,
    listing_id: i64,
    guard: MountGuard,
    pending: Option<JoinHandle<Option<Result<DetailSnapshot>>>>,
    pub listing: Option<Listing>,
    pub reviews: Vec<Review>,
    pub average: String,
    pub user: Option<User>,
    pub has_reviewed: bool,
    pub form: ReviewDraft,
    mode: ReviewFormMode,
    image: Option<ObjectUrl>,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl DetailView {
    pub fn new(app: BizNest, listing_id: i64) -> Self {
        Self {
            app,
            listing_id,
            guard: MountGuard::new(),
            pending: None,
            listing: None,
            reviews: Vec::new(),
            average: "0.0".to_string(),
            user: None,
            has_reviewed: false,
            form: ReviewDraft::default(),
            mode: ReviewFormMode::Create,
            image: None,
            loading: true,
            error: None,
            notice: None,
        }
    }

    pub fn listing_id(&self) -> i64 {
        self.listing_id
    }

    pub fn guard(&self) -> MountGuard {
        self.guard.clone()
    }

    pub fn mode(&self) -> ReviewFormMode {
        self.mode
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().map(ObjectUrl::as_str)
    }

    /// Fetch in the foreground and install the result
    pub async fn load(&mut self) -> bool {
        self.start_load();
        self.wait_load().await
    }

    /// Spawn the fetch; `poll_load` installs it once it finishes
    pub fn start_load(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        let app = self.app.clone();
        let guard = self.guard();
        let listing_id = self.listing_id;
        self.loading = true;
        self.pending = Some(tokio::spawn(async move {
            let result = fetch_detail(&app, listing_id).await;
            if !guard.is_mounted() {
                debug!("Detail view for listing {} gone before fetch finished", listing_id);
                return None;
            }
            Some(result)
        }));
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Non-blocking: installs the background result if it is ready
    pub async fn poll_load(&mut self) -> bool {
        match &self.pending {
            Some(handle) if handle.is_finished() => self.wait_load().await,
            _ => false,
        }
    }

    /// Wait for the background fetch. False when nothing was installed.
    pub async fn wait_load(&mut self) -> bool {
        let Some(handle) = self.pending.take() else {
            return false;
        };
        match handle.await {
            Ok(Some(result)) => {
                let guard = self.guard();
                self.apply(&guard, result)
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Detail fetch task failed: {}", e);
                self.loading = false;
                self.error = Some(LOAD_ERROR.to_string());
                true
            }
        }
    }

    /// Install a fetch result. Returns false when the view was unmounted
    /// while the fetch was in flight.
    pub fn apply(&mut self, guard: &MountGuard, result: Result<DetailSnapshot>) -> bool {
        if !guard.is_mounted() {
            debug!("Dropping late detail result for listing {}", self.listing_id);
            return false;
        }
        self.loading = false;

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Error fetching listing {}: {}", self.listing_id, e);
                self.error = Some(LOAD_ERROR.to_string());
                return true;
            }
        };

        self.error = None;
        self.listing = Some(snapshot.listing);
        self.reviews = snapshot.reviews;
        self.average = snapshot.average;
        self.has_reviewed = snapshot.has_reviewed;
        self.image = snapshot.image.map(|blob| self.app.blobs.create_object_url(blob));
        self.user = snapshot.user;
        self.select_form();
        true
    }

    /// Edit in place when the caller already reviewed this listing
    fn select_form(&mut self) {
        let existing = match (&self.user, self.has_reviewed) {
            (Some(user), true) => self.reviews.iter().find(|r| r.username == user.username),
            _ => None,
        };
        match existing {
            Some(review) => {
                self.mode = ReviewFormMode::Edit { review_id: review.id };
                self.form = ReviewDraft {
                    rating: review.rating,
                    comment: review.comment.clone(),
                };
            }
            None => {
                self.mode = ReviewFormMode::Create;
                self.form = ReviewDraft::default();
            }
        }
    }

    /// Restore the form to the stored review, or blank for a new one
    pub fn cancel_edit(&mut self) {
        self.select_form();
    }

    pub async fn submit_review(&mut self) -> bool {
        self.error = None;
        self.notice = None;

        if let Err(e) = validate_review(&self.form) {
            self.error = Some(e.user_message());
            return false;
        }
        let Some(user_id) = self.user.as_ref().and_then(|u| u.id) else {
            self.error = Some(LOGIN_REQUIRED.to_string());
            return false;
        };

        let result = match self.mode {
            ReviewFormMode::Create => self.create_review(user_id).await,
            ReviewFormMode::Edit { review_id } => self.update_review(review_id).await,
        };
        if let Err(e) = result {
            warn!("Error submitting review: {}", e);
            self.error = Some(SUBMIT_ERROR.to_string());
            return false;
        }

        self.average = self
            .app
            .reviews
            .get_average_rating_by_listing(self.listing_id)
            .await;
        true
    }

    async fn create_review(&mut self, user_id: i64) -> Result<()> {
        let review = self
            .app
            .reviews
            .add_review(&self.form, user_id, self.listing_id)
            .await?;
        info!("Review {} submitted for listing {}", review.id, self.listing_id);
        self.mode = ReviewFormMode::Edit { review_id: review.id };
        self.has_reviewed = true;
        self.reviews.insert(0, review);
        self.notice = Some("Review submitted successfully!".to_string());
        Ok(())
    }

    /// A failed list refresh after a successful update patches the local copy
    async fn update_review(&mut self, review_id: i64) -> Result<()> {
        let updated = self.app.reviews.update_review(review_id, &self.form).await?;
        self.notice = Some("Review updated successfully!".to_string());
        match self.app.reviews.get_reviews_by_listing(self.listing_id).await {
            Ok(reviews) => self.reviews = reviews,
            Err(e) => {
                warn!("Review list refresh failed after update: {}", e);
                if let Some(slot) = self.reviews.iter_mut().find(|r| r.id == review_id) {
                    *slot = updated;
                }
            }
        }
        Ok(())
    }

    /// Drops the image URL and silences in-flight loads
    pub fn unmount(&mut self) {
        self.guard.release();
        self.image = None;
    }
}

impl Drop for DetailView {
    fn drop(&mut self) {
        self.guard.release();
    }
}

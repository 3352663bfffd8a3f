// svckit/src/stores/reviews.rs
//
// Reviews store: the union of the "with response" and "without response"
// partitions, patched in place after each successful mutation.
//

use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use crate::errors::Result;
use crate::services::ReviewService;
use crate::types::{Review, ReviewDraft};

pub const REVIEWS_LOAD_ERROR: &str = "Failed to load reviews.";

#[derive(Debug, Clone, Default)]
pub struct ReviewsState {
    pub reviews: Vec<Review>,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
}

pub struct ReviewsStore {
    service: ReviewService,
    state: RwLock<ReviewsState>,
    generation: watch::Sender<u64>,
}

impl ReviewsStore {
    pub fn new(service: ReviewService) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            service,
            state: RwLock::new(ReviewsState::default()),
            generation,
        }
    }

    pub async fn snapshot(&self) -> ReviewsState {
        self.state.read().await.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    fn bump(&self, state: &mut ReviewsState) {
        state.generation += 1;
        self.generation.send_replace(state.generation);
    }

    /// Re-run the two-partition fetch and replace the local collection
    pub async fn refresh_reviews(&self) {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
            self.bump(&mut state);
        }

        let result = tokio::try_join!(
            self.service.get_reviews_with_response(),
            self.service.get_reviews_without_response(),
        );

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok((mut answered, unanswered)) => {
                answered.extend(unanswered);
                state.reviews = answered;
            }
            Err(e) => {
                warn!("Failed to fetch reviews: {}", e);
                state.error = Some(REVIEWS_LOAD_ERROR.to_string());
            }
        }
        self.bump(&mut state);
    }

    pub async fn add_review(&self, draft: &ReviewDraft, user_id: i64, listing_id: i64) -> Result<Review> {
        let mut review = self.service.create_review(draft, user_id, listing_id).await?;
        review.listing_id.get_or_insert(listing_id);
        info!("Added review {} for listing {}", review.id, listing_id);

        let mut state = self.state.write().await;
        state.reviews.push(review.clone());
        self.bump(&mut state);
        Ok(review)
    }

    pub async fn update_review(&self, id: i64, draft: &ReviewDraft) -> Result<Review> {
        let review = self.service.update_review(id, draft).await?;
        info!("Updated review {}", id);
        Ok(self.replace_local(review).await)
    }

    pub async fn add_response(&self, id: i64, response: &str) -> Result<Review> {
        let review = self.service.add_business_response(id, response).await?;
        info!("Added business response to review {}", id);
        Ok(self.replace_local(review).await)
    }

    pub async fn delete_review(&self, id: i64) -> Result<()> {
        self.service.delete_review(id).await?;
        info!("Deleted review {}", id);

        let mut state = self.state.write().await;
        state.reviews.retain(|r| r.id != id);
        self.bump(&mut state);
        Ok(())
    }

    /// Swap the server's copy into the local array. Fields the response
    /// omits (listing id) are carried over from the local copy.
    async fn replace_local(&self, mut review: Review) -> Review {
        let mut state = self.state.write().await;
        match state.reviews.iter_mut().find(|r| r.id == review.id) {
            Some(existing) => {
                if review.listing_id.is_none() {
                    review.listing_id = existing.listing_id;
                }
                *existing = review.clone();
            }
            None => state.reviews.push(review.clone()),
        }
        self.bump(&mut state);
        review
    }

    /// Reviews for a listing, straight from the server
    pub async fn get_reviews_by_listing(&self, listing_id: i64) -> Result<Vec<Review>> {
        self.service.get_reviews_by_listing(listing_id).await
    }

    /// Average rating to one decimal, "0.0" when the request fails
    pub async fn get_average_rating_by_listing(&self, listing_id: i64) -> String {
        match self.service.get_average_rating(listing_id).await {
            Ok(avg) => format!("{:.1}", avg),
            Err(e) => {
                warn!("Failed to fetch average rating for listing {}: {}", listing_id, e);
                "0.0".to_string()
            }
        }
    }

    pub async fn has_user_reviewed_business(&self, user_id: i64, listing_id: i64) -> Result<bool> {
        self.service.has_user_reviewed_business(user_id, listing_id).await
    }

    pub async fn local_reviews_for_listing(&self, listing_id: i64) -> Vec<Review> {
        self.state
            .read()
            .await
            .reviews
            .iter()
            .filter(|r| r.listing_id == Some(listing_id))
            .cloned()
            .collect()
    }

    /// Reviews still waiting on a business response
    pub async fn pending_responses(&self) -> Vec<Review> {
        self.state
            .read()
            .await
            .reviews
            .iter()
            .filter(|r| !r.has_response())
            .cloned()
            .collect()
    }
}

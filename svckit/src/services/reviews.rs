use std::sync::Arc;

use crate::errors::Result;
use crate::http::{ApiClient, ApiRequest};
use crate::types::{Page, Review, ReviewDraft};

#[derive(Clone)]
pub struct ReviewService {
    client: Arc<ApiClient>,
}

impl ReviewService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// POST /reviews?userId&businessListingId
    pub async fn create_review(&self, draft: &ReviewDraft, user_id: i64, listing_id: i64) -> Result<Review> {
        let request = ApiRequest::post("/reviews")
            .query("userId", user_id)
            .query("businessListingId", listing_id)
            .json(draft)?;
        self.client.fetch(request).await
    }

    pub async fn get_review(&self, id: i64) -> Result<Review> {
        self.client.fetch(ApiRequest::get(format!("/reviews/{}", id))).await
    }

    pub async fn get_reviews_by_listing(&self, listing_id: i64) -> Result<Vec<Review>> {
        self.client
            .fetch(ApiRequest::get(format!("/reviews/business/{}", listing_id)))
            .await
    }

    pub async fn get_reviews_by_listing_paginated(&self, listing_id: i64, page: u32, size: u32) -> Result<Page<Review>> {
        let request = ApiRequest::get(format!("/reviews/business/{}/page", listing_id))
            .query("page", page)
            .query("size", size);
        self.client.fetch(request).await
    }

    pub async fn get_reviews_by_user(&self, user_id: i64) -> Result<Vec<Review>> {
        self.client
            .fetch(ApiRequest::get(format!("/reviews/user/{}", user_id)))
            .await
    }

    pub async fn get_reviews_by_user_paginated(&self, user_id: i64, page: u32, size: u32) -> Result<Page<Review>> {
        let request = ApiRequest::get(format!("/reviews/user/{}/page", user_id))
            .query("page", page)
            .query("size", size);
        self.client.fetch(request).await
    }

    pub async fn update_review(&self, id: i64, draft: &ReviewDraft) -> Result<Review> {
        let request = ApiRequest::put(format!("/reviews/{}", id)).json(draft)?;
        self.client.fetch(request).await
    }

    /// The response text is sent as a raw string body
    pub async fn add_business_response(&self, id: i64, response: &str) -> Result<Review> {
        let request = ApiRequest::post(format!("/reviews/{}/response", id)).text(response);
        self.client.fetch(request).await
    }

    pub async fn delete_review(&self, id: i64) -> Result<()> {
        self.client.send(ApiRequest::delete(format!("/reviews/{}", id))).await
    }

    pub async fn get_average_rating(&self, listing_id: i64) -> Result<f64> {
        let rating: Option<f64> = self
            .client
            .fetch(ApiRequest::get(format!("/reviews/business/{}/average-rating", listing_id)))
            .await?;
        Ok(rating.unwrap_or(0.0))
    }

    pub async fn get_review_count(&self, listing_id: i64) -> Result<u64> {
        self.client
            .fetch(ApiRequest::get(format!("/reviews/business/{}/count", listing_id)))
            .await
    }

    pub async fn get_reviews_with_response(&self) -> Result<Vec<Review>> {
        self.client.fetch(ApiRequest::get("/reviews/with-response")).await
    }

    pub async fn get_reviews_without_response(&self) -> Result<Vec<Review>> {
        self.client.fetch(ApiRequest::get("/reviews/without-response")).await
    }

    pub async fn has_user_reviewed_business(&self, user_id: i64, listing_id: i64) -> Result<bool> {
        let request = ApiRequest::get("/reviews/check-reviewed")
            .query("userId", user_id)
            .query("businessListingId", listing_id);
        self.client.fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockTransport;
    use crate::http::RequestBody;
    use crate::navigation::Navigator;
    use crate::storage::Session;
    use serde_json::json;

    fn service(transport: &MockTransport) -> ReviewService {
        let client = ApiClient::new(
            Arc::new(transport.clone()),
            Session::in_memory(),
            Navigator::default(),
        );
        ReviewService::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_response_sent_as_plain_text() {
        let transport = MockTransport::new(|_| {
            MockTransport::json(200, json!({
                "id": 5, "rating": 4, "comment": "ok", "username": "sam",
                "businessResponse": "Thanks!"
            }))
        });
        let review = service(&transport).add_business_response(5, "Thanks!").await.unwrap();
        assert!(review.has_response());
        assert_eq!(
            transport.last().unwrap().body,
            RequestBody::Text("Thanks!".to_string())
        );
    }

    #[tokio::test]
    async fn test_null_average_is_zero() {
        let transport = MockTransport::new(|_| MockTransport::json(200, json!(null)));
        assert_eq!(service(&transport).get_average_rating(1).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_check_reviewed_params() {
        let transport = MockTransport::new(|_| MockTransport::json(200, json!(true)));
        assert!(service(&transport).has_user_reviewed_business(7, 2).await.unwrap());
        let sent = transport.last().unwrap();
        assert_eq!(sent.path, "/api/reviews/check-reviewed");
        assert_eq!(
            sent.query,
            vec![
                ("userId".to_string(), "7".to_string()),
                ("businessListingId".to_string(), "2".to_string())
            ]
        );
    }
}

use std::sync::Arc;
use tracing::info;

use crate::errors::Result;
use crate::http::{ApiClient, ApiRequest, FilePart};
use crate::types::{ImageBlob, Listing, ListingDraft, Page, PageOrList, SearchCriteria};

#[derive(Clone)]
pub struct ListingService {
    client: Arc<ApiClient>,
}

impl ListingService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// POST /listings?categoryId&ownerId
    pub async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing> {
        let request = ApiRequest::post("/listings")
            .queries(draft.id_params())
            .json(draft)?;
        let listing: Listing = self.client.fetch(request).await?;
        info!("Created listing {} ({})", listing.id, listing.name);
        Ok(listing)
    }

    pub async fn get_listing(&self, id: i64) -> Result<Listing> {
        self.client.fetch(ApiRequest::get(format!("/listings/{}", id))).await
    }

    pub async fn get_all_listings(&self, page: u32, size: u32) -> Result<Page<Listing>> {
        let request = ApiRequest::get("/listings")
            .query("page", page)
            .query("size", size);
        let payload: PageOrList<Listing> = self.client.fetch(request).await?;
        Ok(payload.into())
    }

    /// PUT /listings/{id}?categoryId&ownerId
    pub async fn update_listing(&self, id: i64, draft: &ListingDraft) -> Result<Listing> {
        let request = ApiRequest::put(format!("/listings/{}", id))
            .queries(draft.id_params())
            .json(draft)?;
        self.client.fetch(request).await
    }

    pub async fn delete_listing(&self, id: i64) -> Result<()> {
        self.client.send(ApiRequest::delete(format!("/listings/{}", id))).await
    }

    pub async fn search_listings(&self, criteria: &SearchCriteria) -> Result<Page<Listing>> {
        let request = ApiRequest::get("/listings/search").queries(criteria.query());
        let payload: PageOrList<Listing> = self.client.fetch(request).await?;
        Ok(payload.into())
    }

    /// Every listing in a category, unpaginated
    pub async fn get_listings_by_category(&self, category_id: i64) -> Result<Vec<Listing>> {
        let request = ApiRequest::get("/listings/by-category").query("categoryId", category_id);
        self.client.fetch(request).await
    }

    pub async fn get_listings_by_owner(&self, owner_id: i64) -> Result<Vec<Listing>> {
        let request = ApiRequest::get("/listings/by-owner").query("ownerId", owner_id);
        self.client.fetch(request).await
    }

    pub async fn get_listing_image(&self, id: i64) -> Result<ImageBlob> {
        self.client
            .fetch_blob(ApiRequest::get(format!("/listings/{}/image", id)))
            .await
    }

    pub async fn upload_listing_image(&self, id: i64, file: FilePart) -> Result<()> {
        let request = ApiRequest::post(format!("/listings/{}/image", id)).multipart(file);
        self.client.send(request).await
    }
}

use std::sync::Arc;

use crate::errors::Result;
use crate::http::{ApiClient, ApiRequest};
use crate::types::{Category, CategoryDraft, CategoryStats};

#[derive(Clone)]
pub struct CategoryService {
    client: Arc<ApiClient>,
}

impl CategoryService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category> {
        self.client.fetch(ApiRequest::post("/categories").json(draft)?).await
    }

    pub async fn get_all_categories(&self) -> Result<Vec<Category>> {
        self.client.fetch(ApiRequest::get("/categories")).await
    }

    pub async fn get_category(&self, id: i64) -> Result<Category> {
        self.client.fetch(ApiRequest::get(format!("/categories/{}", id))).await
    }

    pub async fn update_category(&self, id: i64, draft: &CategoryDraft) -> Result<Category> {
        let request = ApiRequest::put(format!("/categories/{}", id)).json(draft)?;
        self.client.fetch(request).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        self.client.send(ApiRequest::delete(format!("/categories/{}", id))).await
    }

    /// Listing count per category name
    pub async fn get_category_stats(&self) -> Result<CategoryStats> {
        self.client.fetch(ApiRequest::get("/categories/stats")).await
    }
}

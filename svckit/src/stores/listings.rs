// svckit/src/stores/listings.rs
//
// Listings store: current page, pagination cursors, metrics, categories
// and per-category stats. Every mutation is followed by a re-fetch.
//

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::services::{CategoryService, ListingService};
use crate::types::{
    Category, CategoryDraft, CategoryStats, Listing, ListingDraft, ListingStatus, Page,
    SearchCriteria,
};

pub const LISTINGS_LOAD_ERROR: &str = "Failed to load listings.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingMetrics {
    pub total: u64,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
}

impl ListingMetrics {
    fn from_page(page: &Page<Listing>) -> Self {
        let mut metrics = Self {
            total: page.total_elements,
            ..Self::default()
        };
        for listing in &page.content {
            match listing.status {
                ListingStatus::Approved => metrics.approved += 1,
                ListingStatus::Pending => metrics.pending += 1,
                ListingStatus::Rejected => metrics.rejected += 1,
            }
        }
        metrics
    }
}

#[derive(Debug, Clone)]
pub struct ListingsState {
    pub listings: Vec<Listing>,
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub metrics: ListingMetrics,
    /// Criteria of the last search, cleared by a plain fetch
    pub search: Option<SearchCriteria>,
    pub categories: Vec<Category>,
    pub category_stats: CategoryStats,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
    /// Changes only when a fetch or search installs a new listing array
    pub listings_version: u64,
}

impl ListingsState {
    fn new(size: u32) -> Self {
        Self {
            listings: Vec::new(),
            page: 0,
            size,
            total_pages: 0,
            total_elements: 0,
            metrics: ListingMetrics::default(),
            search: None,
            categories: Vec::new(),
            category_stats: CategoryStats::new(),
            loading: false,
            error: None,
            generation: 0,
            listings_version: 0,
        }
    }

    fn apply_page(&mut self, page: Page<Listing>, requested_size: u32) {
        self.metrics = ListingMetrics::from_page(&page);
        self.total_elements = page.total_elements;
        self.total_pages = page.total_pages;
        self.size = if page.size == 0 { requested_size } else { page.size };
        self.page = page.number.min(self.total_pages.saturating_sub(1));
        self.listings = page.content;
        self.listings_version += 1;
        self.error = None;
    }
}

pub struct ListingsStore {
    listings: ListingService,
    categories: CategoryService,
    state: RwLock<ListingsState>,
    generation: watch::Sender<u64>,
}

impl ListingsStore {
    pub fn new(listings: ListingService, categories: CategoryService, page_size: u32) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            listings,
            categories,
            state: RwLock::new(ListingsState::new(page_size.max(1))),
            generation,
        }
    }

    /// Fetch listings, categories and stats together
    pub async fn initialize(&self) {
        let size = self.state.read().await.size;
        tokio::join!(
            self.fetch_listings(0, size),
            self.fetch_categories(),
            self.fetch_category_stats(),
        );
    }

    pub async fn snapshot(&self) -> ListingsState {
        self.state.read().await.clone()
    }

    /// Receiver that changes whenever the store's state changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    fn bump(&self, state: &mut ListingsState) {
        state.generation += 1;
        self.generation.send_replace(state.generation);
    }

    async fn set_loading(&self) {
        let mut state = self.state.write().await;
        state.loading = true;
        state.error = None;
        self.bump(&mut state);
    }

    /// Load one page of listings. Failure sets the error flag instead of
    /// returning an error. A page past the end is clamped to the last page.
    pub async fn fetch_listings(&self, page: u32, size: u32) {
        self.set_loading().await;

        let mut result = self.listings.get_all_listings(page, size).await;
        if let Ok(fetched) = &result {
            if fetched.content.is_empty() && fetched.total_pages > 0 && page >= fetched.total_pages {
                let last = fetched.total_pages - 1;
                debug!("Page {} out of range, loading page {}", page, last);
                result = self.listings.get_all_listings(last, size).await;
            }
        }

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(fetched) => {
                state.search = None;
                state.apply_page(fetched, size);
                debug!(
                    "Loaded listings page {} ({} of {})",
                    state.page,
                    state.listings.len(),
                    state.total_elements
                );
            }
            Err(e) => {
                warn!("Failed to fetch listings: {}", e);
                state.error = Some(LISTINGS_LOAD_ERROR.to_string());
            }
        }
        self.bump(&mut state);
    }

    /// Run a filtered search; the result replaces the current page
    pub async fn search_listings(&self, criteria: SearchCriteria) {
        self.set_loading().await;
        let result = self.listings.search_listings(&criteria).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(fetched) => {
                state.apply_page(fetched, criteria.size);
                state.search = if criteria.is_empty() { None } else { Some(criteria) };
            }
            Err(e) => {
                warn!("Listing search failed: {}", e);
                state.error = Some(LISTINGS_LOAD_ERROR.to_string());
            }
        }
        self.bump(&mut state);
    }

    async fn current_cursor(&self) -> (u32, u32) {
        let state = self.state.read().await;
        (state.page, state.size)
    }

    async fn refetch_current(&self) {
        let (page, size) = self.current_cursor().await;
        self.fetch_listings(page, size).await;
    }

    pub async fn add_listing(&self, draft: &ListingDraft) -> Result<Listing> {
        let created = self.listings.create_listing(draft).await?;
        info!("Created listing {} ({})", created.id, created.name);
        self.refetch_current().await;
        Ok(created)
    }

    pub async fn update_listing(&self, id: i64, draft: &ListingDraft) -> Result<Listing> {
        let updated = self.listings.update_listing(id, draft).await?;
        info!("Updated listing {}", id);
        self.refetch_current().await;
        Ok(updated)
    }

    pub async fn delete_listing(&self, id: i64) -> Result<()> {
        self.listings.delete_listing(id).await?;
        info!("Deleted listing {}", id);
        self.refetch_current().await;
        Ok(())
    }

    /// Load categories, falling back to an empty list on failure
    pub async fn fetch_categories(&self) -> Vec<Category> {
        let categories = match self.categories.get_all_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                warn!("Error fetching categories: {}", e);
                Vec::new()
            }
        };
        let mut state = self.state.write().await;
        state.categories = categories.clone();
        self.bump(&mut state);
        categories
    }

    /// Stats failures are logged and leave the previous stats in place
    pub async fn fetch_category_stats(&self) {
        match self.categories.get_category_stats().await {
            Ok(stats) => {
                let mut state = self.state.write().await;
                state.category_stats = stats;
                self.bump(&mut state);
            }
            Err(e) => warn!("Error fetching category stats: {}", e),
        }
    }

    async fn refresh_categories(&self) {
        tokio::join!(self.fetch_categories(), self.fetch_category_stats());
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category> {
        let created = self.categories.create_category(draft).await?;
        info!("Created category {} ({})", created.id, created.name);
        self.refresh_categories().await;
        Ok(created)
    }

    pub async fn update_category(&self, id: i64, draft: &CategoryDraft) -> Result<Category> {
        let updated = self.categories.update_category(id, draft).await?;
        info!("Updated category {}", id);
        self.refresh_categories().await;
        Ok(updated)
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        self.categories.delete_category(id).await?;
        info!("Deleted category {}", id);
        self.refresh_categories().await;
        Ok(())
    }

    /// Unpaginated listings for one category. Does not touch page state.
    pub async fn fetch_listings_by_category(&self, category_id: i64) -> Vec<Listing> {
        match self.listings.get_listings_by_category(category_id).await {
            Ok(listings) => listings,
            Err(e) => {
                warn!("Error fetching listings for category {}: {}", category_id, e);
                Vec::new()
            }
        }
    }

    /// Listing count per category name over the current page
    pub async fn category_counts(&self) -> BTreeMap<String, usize> {
        let state = self.state.read().await;
        let mut counts = BTreeMap::new();
        for name in state.listings.iter().filter_map(|l| l.category_name()) {
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockTransport;
    use crate::http::ApiClient;
    use crate::navigation::Navigator;
    use crate::storage::Session;
    use reqwest::Method;
    use serde_json::{json, Value};

    fn store(transport: &MockTransport) -> ListingsStore {
        let client = Arc::new(ApiClient::new(
            Arc::new(transport.clone()),
            Session::in_memory(),
            Navigator::default(),
        ));
        ListingsStore::new(
            ListingService::new(client.clone()),
            CategoryService::new(client),
            10,
        )
    }

    fn listing(id: i64, status: &str, category: &str) -> Value {
        json!({"id": id, "name": format!("Biz {}", id), "status": status, "category": {"id": 1, "name": category}})
    }

    fn page(content: Vec<Value>, number: u32, total: u64, pages: u32) -> Value {
        json!({"content": content, "totalElements": total, "number": number, "size": 10, "totalPages": pages})
    }

    #[tokio::test]
    async fn test_fetch_sets_page_and_metrics() {
        let transport = MockTransport::new(|_| {
            MockTransport::json(200, page(vec![
                listing(1, "Approved", "Cafes"),
                listing(2, "Pending", "Cafes"),
                listing(3, "Rejected", "Gyms"),
            ], 0, 23, 3))
        });
        let store = store(&transport);
        store.fetch_listings(0, 10).await;

        let state = store.snapshot().await;
        assert_eq!(state.listings.len(), 3);
        assert_eq!(state.total_pages, 3);
        assert_eq!(
            state.metrics,
            ListingMetrics { total: 23, approved: 1, pending: 1, rejected: 1 }
        );
        assert!(state.error.is_none());
        assert!(!state.loading);

        let counts = store.category_counts().await;
        assert_eq!(counts.get("Cafes"), Some(&2));
        assert_eq!(counts.get("Gyms"), Some(&1));
    }

    #[tokio::test]
    async fn test_category_refresh_keeps_listings_version() {
        let transport = MockTransport::new(|req| {
            if req.path == "/api/categories" {
                MockTransport::json(200, json!([{"id": 1, "name": "Cafes"}]))
            } else if req.path == "/api/categories/stats" {
                MockTransport::json(200, json!({"Cafes": 1}))
            } else {
                MockTransport::json(200, page(vec![listing(1, "Approved", "Cafes")], 0, 1, 1))
            }
        });
        let store = store(&transport);
        store.fetch_listings(0, 10).await;
        let version = store.snapshot().await.listings_version;
        let generation = store.generation();

        store.fetch_categories().await;
        store.fetch_category_stats().await;

        let state = store.snapshot().await;
        assert!(state.generation > generation);
        assert_eq!(state.listings_version, version);

        store.fetch_listings(0, 10).await;
        assert_eq!(store.snapshot().await.listings_version, version + 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_error_flag() {
        let transport = MockTransport::new(|_| MockTransport::network_down());
        let store = store(&transport);
        let mut rx = store.subscribe();

        store.fetch_listings(0, 10).await;

        let state = store.snapshot().await;
        assert_eq!(state.error.as_deref(), Some(LISTINGS_LOAD_ERROR));
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update() > 0);
    }

    #[tokio::test]
    async fn test_bare_array_payload_becomes_single_page() {
        let transport = MockTransport::new(|_| {
            MockTransport::json(200, json!([listing(1, "Approved", "Cafes")]))
        });
        let store = store(&transport);
        store.fetch_listings(0, 10).await;

        let state = store.snapshot().await;
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.page, 0);
        assert_eq!(state.metrics.total, 1);
    }

    #[tokio::test]
    async fn test_page_past_end_is_clamped() {
        let transport = MockTransport::new(|req| {
            let page_no = req
                .query
                .iter()
                .find(|(k, _)| k == "page")
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            if page_no == "1" {
                MockTransport::json(200, page(vec![listing(11, "Approved", "Cafes")], 1, 11, 2))
            } else {
                MockTransport::json(200, page(vec![], 5, 11, 2))
            }
        });
        let store = store(&transport);
        store.fetch_listings(5, 10).await;

        let state = store.snapshot().await;
        assert_eq!(state.page, 1);
        assert_eq!(state.listings[0].id, 11);
    }

    #[tokio::test]
    async fn test_delete_refetches_current_page() {
        let transport = MockTransport::new(|req| {
            if req.method == Method::DELETE {
                return MockTransport::empty(204);
            }
            MockTransport::json(200, page(vec![listing(2, "Approved", "Cafes")], 0, 1, 1))
        });
        let store = store(&transport);

        store.delete_listing(1).await.unwrap();

        assert_eq!(transport.count(Method::DELETE, "/api/listings/1"), 1);
        assert_eq!(transport.count(Method::GET, "/api/listings"), 1);
        let ids: Vec<i64> = store.snapshot().await.listings.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_mutation_failure_propagates_without_refetch() {
        let transport = MockTransport::new(|_| MockTransport::json(500, json!({"message": "db down"})));
        let store = store(&transport);

        let err = store.delete_listing(1).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(transport.count(Method::GET, "/api/listings"), 0);
    }

    #[tokio::test]
    async fn test_search_then_fetch_clears_filter() {
        let transport = MockTransport::new(|req| {
            if req.path.ends_with("/search") {
                MockTransport::json(200, page(vec![listing(1, "Approved", "Cafes")], 0, 1, 1))
            } else {
                MockTransport::json(200, page(vec![listing(1, "Approved", "Cafes"), listing(2, "Approved", "Gyms")], 0, 2, 1))
            }
        });
        let store = store(&transport);

        store
            .search_listings(SearchCriteria { name: "biz 1".into(), ..SearchCriteria::default() })
            .await;
        let searched = store.snapshot().await;
        assert_eq!(searched.total_elements, 1);
        assert!(searched.search.is_some());

        store.fetch_listings(0, 10).await;
        let fetched = store.snapshot().await;
        assert_eq!(fetched.total_elements, 2);
        assert!(fetched.search.is_none());
    }

    #[tokio::test]
    async fn test_category_failures_are_soft() {
        let transport = MockTransport::new(|_| MockTransport::network_down());
        let store = store(&transport);

        assert!(store.fetch_categories().await.is_empty());
        store.fetch_category_stats().await;
        assert!(store.fetch_listings_by_category(3).await.is_empty());
        assert!(store.snapshot().await.category_stats.is_empty());
    }

    #[tokio::test]
    async fn test_category_mutation_refreshes_categories_and_stats() {
        let transport = MockTransport::new(|req| {
            if req.method == Method::POST {
                MockTransport::json(201, json!({"id": 4, "name": "Bakeries"}))
            } else if req.path == "/api/categories/stats" {
                MockTransport::json(200, json!({"Bakeries": 0}))
            } else {
                MockTransport::json(200, json!([{"id": 4, "name": "Bakeries", "description": null}]))
            }
        });
        let store = store(&transport);

        store
            .create_category(&CategoryDraft { name: "Bakeries".into(), description: String::new() })
            .await
            .unwrap();

        let state = store.snapshot().await;
        assert_eq!(state.categories.len(), 1);
        assert_eq!(state.category_stats.get("Bakeries"), Some(&0));
    }
}

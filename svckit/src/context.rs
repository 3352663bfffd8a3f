// svckit/src/context.rs
//
// Explicitly constructed application context: session, navigator, HTTP
// client, services and the two stores. Views receive this instead of
// reaching for globals.
//

use std::sync::Arc;
use tracing::info;

use crate::config::ClientConfig;
use crate::errors::Result;
use crate::http::{ApiClient, ReqwestTransport, Transport};
use crate::images::{BlobRegistry, ImageCache};
use crate::navigation::{Navigator, Route};
use crate::services::{
    AuthService, CategoryService, ContactService, DashboardService, ListingService, ReviewService,
    UserService,
};
use crate::storage::{ClientStorage, FileStorage, Session};
use crate::stores::{ListingsStore, ReviewsStore};

#[derive(Clone)]
pub struct BizNest {
    pub config: Arc<ClientConfig>,
    pub session: Session,
    pub navigator: Navigator,
    pub client: Arc<ApiClient>,
    pub auth: AuthService,
    pub listing_api: ListingService,
    pub category_api: CategoryService,
    pub review_api: ReviewService,
    pub users: UserService,
    pub dashboard: DashboardService,
    pub contact: ContactService,
    pub listings: Arc<ListingsStore>,
    pub reviews: Arc<ReviewsStore>,
    pub blobs: BlobRegistry,
}

impl BizNest {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, storage: Arc<dyn ClientStorage>) -> Self {
        let session = Session::new(storage);
        let initial = if session.is_logged_in() {
            Route::Home
        } else {
            Route::Login
        };
        let navigator = Navigator::new(initial);
        let client = Arc::new(ApiClient::new(transport, session.clone(), navigator.clone()));

        let listing_api = ListingService::new(client.clone());
        let category_api = CategoryService::new(client.clone());
        let review_api = ReviewService::new(client.clone());

        let listings = Arc::new(ListingsStore::new(
            listing_api.clone(),
            category_api.clone(),
            config.listings.page_size,
        ));
        let reviews = Arc::new(ReviewsStore::new(review_api.clone()));

        Self {
            auth: AuthService::new(client.clone()),
            users: UserService::new(client.clone()),
            dashboard: DashboardService::new(client.clone()),
            contact: ContactService::new(client.clone()),
            config: Arc::new(config),
            session,
            navigator,
            client,
            listing_api,
            category_api,
            review_api,
            listings,
            reviews,
            blobs: BlobRegistry::new(),
        }
    }

    /// Production wiring: reqwest transport and file-backed storage
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.api.base_url, config.api.timeout())?;
        let storage = FileStorage::open(&config.storage.path)?;
        info!(
            "BizNest client for {} (storage {})",
            transport.base_url(),
            config.storage.path.display()
        );
        Ok(Self::new(config, Arc::new(transport), Arc::new(storage)))
    }

    /// Populate both stores
    pub async fn start(&self) {
        tokio::join!(self.listings.initialize(), self.reviews.refresh_reviews());
    }

    pub fn image_cache(&self) -> ImageCache {
        ImageCache::new(
            self.listing_api.clone(),
            self.blobs.clone(),
            self.config.images.max_concurrent_fetches,
        )
    }

    /// Drop the context. Persisted storage is already flushed on every
    /// write; outstanding object URLs are reported.
    pub fn shutdown(self) {
        let live = self.blobs.live_count();
        if live > 0 {
            info!("Shutting down with {} live object URLs", live);
        } else {
            info!("Shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockTransport;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    #[tokio::test]
    async fn test_initial_route_follows_session() {
        let transport = Arc::new(MockTransport::new(|_| MockTransport::json(200, json!([]))));
        let storage = Arc::new(MemoryStorage::new());

        let app = BizNest::new(ClientConfig::default(), transport.clone(), storage.clone());
        assert_eq!(app.navigator.current(), Route::Login);

        app.session.store_login("tok", "alice").unwrap();
        let app = BizNest::new(ClientConfig::default(), transport, storage);
        assert_eq!(app.navigator.current(), Route::Home);
    }

    #[tokio::test]
    async fn test_start_populates_stores() {
        let transport = MockTransport::new(|req| match req.path.as_str() {
            "/api/listings" => MockTransport::json(200, json!({
                "content": [{"id": 1, "name": "Bean There", "status": "Approved", "category": "Cafes"}],
                "totalElements": 1, "number": 0, "size": 10, "totalPages": 1
            })),
            "/api/categories" => MockTransport::json(200, json!([{"id": 1, "name": "Cafes"}])),
            "/api/categories/stats" => MockTransport::json(200, json!({"Cafes": 1})),
            _ => MockTransport::json(200, json!([])),
        });
        let app = BizNest::new(
            ClientConfig::default(),
            Arc::new(transport.clone()),
            Arc::new(MemoryStorage::new()),
        );

        app.start().await;

        let listings = app.listings.snapshot().await;
        assert_eq!(listings.listings.len(), 1);
        assert_eq!(listings.categories.len(), 1);
        assert_eq!(listings.category_stats.get("Cafes"), Some(&1));
        assert!(app.reviews.snapshot().await.error.is_none());
        app.shutdown();
    }
}

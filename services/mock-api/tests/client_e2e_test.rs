// services/mock-api/tests/client_e2e_test.rs
//
// Drives the svckit client stack over real HTTP against the mock backend
//

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use mock_api::{seed, spawn_server, MockBackend};
use svckit::config::ClientConfig;
use svckit::http::ReqwestTransport;
use svckit::navigation::Route;
use svckit::storage::MemoryStorage;
use svckit::types::{ContactKind, ContactRequest, ListingDraft, ListingStatus, ReviewDraft, Role, SearchCriteria};
use svckit::{BizNest, ClientError};

async fn start() -> (Arc<MockBackend>, BizNest) {
    let backend = Arc::new(MockBackend::new());
    seed::populate(&backend).unwrap();
    let (addr, _handle) = spawn_server(backend.clone()).await.unwrap();

    let mut config = ClientConfig::default();
    config.api.base_url = format!("http://{}", addr);
    let transport = ReqwestTransport::new(&config.api.base_url, Duration::from_secs(5)).unwrap();
    let app = BizNest::new(config, Arc::new(transport), Arc::new(MemoryStorage::new()));
    (backend, app)
}

async fn login_demo(app: &BizNest) {
    app.auth.login(seed::DEMO_USER.0, seed::DEMO_USER.1).await.unwrap();
}

#[tokio::test]
async fn test_login_and_current_user() {
    let (_backend, app) = start().await;

    login_demo(&app).await;
    assert_eq!(app.session.username().as_deref(), Some("demo"));
    assert!(app.session.token().is_some());

    let me = app.users.get_current_user().await.unwrap();
    assert_eq!(me.username, "demo");
    assert!(!me.is_admin());
}

#[tokio::test]
async fn test_revoked_token_forces_logout() {
    let (backend, app) = start().await;
    login_demo(&app).await;
    app.navigator.navigate(Route::Profile);

    backend.revoke_tokens();
    let err = app.users.get_current_user().await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized));
    assert!(app.session.token().is_none());
    assert!(app.session.username().is_none());
    assert_eq!(app.navigator.current(), Route::Login);
}

#[tokio::test]
async fn test_public_reads_without_login() {
    let (_backend, app) = start().await;

    let categories = app.category_api.get_all_categories().await.unwrap();
    assert_eq!(categories.len(), 6);

    let page = app.listing_api.get_all_listings(0, 4).await.unwrap();
    assert_eq!(page.total_elements, 6);
    assert_eq!(page.content.len(), 4);
    assert_eq!(page.total_pages, 2);

    let image = app.listing_api.get_listing_image(page.content[0].id).await.unwrap();
    assert_eq!(image.content_type, "image/png");
    assert!(!image.data.is_empty());
}

#[tokio::test]
async fn test_admin_updates_roles_with_bare_array() {
    let (backend, app) = start().await;
    app.auth.login(seed::DEMO_ADMIN.0, seed::DEMO_ADMIN.1).await.unwrap();

    let roles: BTreeSet<Role> = [Role::User, Role::Admin].into_iter().collect();
    app.users.update_user_roles("sam", &roles).await.unwrap();

    assert!(backend.user("sam").unwrap().is_admin());
}

#[tokio::test]
async fn test_admin_endpoints_reject_regular_users() {
    let (_backend, app) = start().await;
    login_demo(&app).await;

    let err = app.users.get_all_users().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    // 403 is not a session failure
    assert!(app.session.token().is_some());
}

#[tokio::test]
async fn test_deleted_listing_is_gone() {
    let (_backend, app) = start().await;
    login_demo(&app).await;
    app.start().await;

    let target = app.listings.snapshot().await.listings[0].clone();
    app.listings.delete_listing(target.id).await.unwrap();

    let err = app.listing_api.get_listing(target.id).await.unwrap_err();
    assert!(err.is_not_found());
    let state = app.listings.snapshot().await;
    assert!(state.listings.iter().all(|l| l.id != target.id));
    assert_eq!(state.total_elements, 5);
}

#[tokio::test]
async fn test_search_then_fetch_restores_full_list() {
    let (_backend, app) = start().await;
    app.start().await;

    app.listings
        .search_listings(SearchCriteria {
            name: "kebab".to_string(),
            ..SearchCriteria::default()
        })
        .await;
    let searched = app.listings.snapshot().await;
    assert_eq!(searched.listings.len(), 1);
    assert_eq!(searched.listings[0].name, "Tunday Kebabi");

    app.listings.fetch_listings(0, 10).await;
    let full = app.listings.snapshot().await;
    assert!(full.search.is_none());
    assert_eq!(full.listings.len(), 6);
}

#[tokio::test]
async fn test_created_listing_appears_in_category() {
    let (_backend, app) = start().await;
    login_demo(&app).await;
    app.start().await;

    let category = app.listings.snapshot().await.categories[0].clone();
    let draft = ListingDraft {
        name: "Chowk Chaat Corner".to_string(),
        category_id: Some(category.id),
        location: "Chowk".to_string(),
        status: ListingStatus::Approved,
        ..ListingDraft::default()
    };
    let created = app.listings.add_listing(&draft).await.unwrap();

    let in_category = app.listings.fetch_listings_by_category(category.id).await;
    assert!(in_category.iter().any(|l| l.id == created.id));
    app.listings.fetch_category_stats().await;
    let stats = app.listings.snapshot().await.category_stats;
    assert_eq!(stats.get(&category.name), Some(&2));
}

#[tokio::test]
async fn test_review_added_and_marked_reviewed() {
    let (_backend, app) = start().await;
    login_demo(&app).await;
    app.start().await;

    let me = app.users.get_current_user().await.unwrap();
    let user_id = me.id.unwrap();
    let listing = app
        .listings
        .snapshot()
        .await
        .listings
        .into_iter()
        .find(|l| l.name == "IIIT Lucknow")
        .unwrap();

    assert!(!app.reviews.has_user_reviewed_business(user_id, listing.id).await.unwrap());

    let draft = ReviewDraft {
        rating: 5,
        comment: "Great campus".to_string(),
    };
    let review = app.reviews.add_review(&draft, user_id, listing.id).await.unwrap();

    let local = app.reviews.local_reviews_for_listing(listing.id).await;
    assert!(local.iter().any(|r| r.id == review.id));
    assert!(app.reviews.has_user_reviewed_business(user_id, listing.id).await.unwrap());
    assert_eq!(app.reviews.get_average_rating_by_listing(listing.id).await, "5.0");

    let second = app.reviews.add_review(&draft, user_id, listing.id).await.unwrap_err();
    assert_eq!(second.status(), Some(400));
}

#[tokio::test]
async fn test_business_response_moves_review_out_of_pending() {
    let (_backend, app) = start().await;
    login_demo(&app).await;
    app.start().await;

    let pending = app.reviews.pending_responses().await;
    let before = pending.len();
    let target = pending[0].clone();

    let answered = app.reviews.add_response(target.id, "Thanks for visiting").await.unwrap();
    assert_eq!(answered.business_response.as_deref(), Some("Thanks for visiting"));
    assert_eq!(app.reviews.pending_responses().await.len(), before - 1);

    let analytics = app.dashboard.get_dashboard_analytics().await.unwrap();
    assert_eq!(analytics.pending_reviews as usize, before - 1);
}

#[tokio::test]
async fn test_contact_message_is_delivered_without_login() {
    let (backend, app) = start().await;
    let request = ContactRequest {
        full_name: "Asha Rao".to_string(),
        email: "asha@biznest.local".to_string(),
        message: "I would like to list my bakery".to_string(),
        kind: ContactKind::Business,
    };

    let reply = app.contact.send_contact(&request).await.unwrap();
    assert_eq!(reply, "Message sent");

    let received = backend.contact_messages();
    assert_eq!(received, vec![request]);
}

#[tokio::test]
async fn test_contact_rejects_bad_email() {
    let (backend, app) = start().await;
    let request = ContactRequest {
        full_name: "Asha Rao".to_string(),
        email: "not-an-email".to_string(),
        message: "Hello".to_string(),
        kind: ContactKind::General,
    };

    let err = app.contact.send_contact(&request).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "Please enter a valid email address");
    assert!(backend.contact_messages().is_empty());
}

// services/biznest-dash/tests/views_test.rs
//
// View state machines driven against the seeded demo backend
//

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use biznest_dash::contact::SENT;
use biznest_dash::dashboard::{Modal, PendingDelete};
use biznest_dash::detail::{fetch_detail, ReviewFormMode};
use biznest_dash::gate::GATE_ERROR;
use biznest_dash::login::{LoginMode, BAD_CREDENTIALS, REGISTERED};
use biznest_dash::{
    AdminGate, ContactView, Dashboard, DemoBackend, DetailView, HomeView, LoginView, ProfileView, View,
};
use mock_api::seed;
use svckit::config::{AdminGateMode, ClientConfig};
use svckit::http::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
use svckit::navigation::Route;
use svckit::storage::MemoryStorage;
use svckit::types::{ContactKind, Role};
use svckit::{BizNest, ClientError};

async fn start_with(config: ClientConfig) -> (DemoBackend, BizNest) {
    let demo = DemoBackend::start(true).await.unwrap();
    let app = demo.connect(config, Arc::new(MemoryStorage::new())).unwrap();
    (demo, app)
}

async fn start() -> (DemoBackend, BizNest) {
    start_with(ClientConfig::default()).await
}

async fn sign_in(app: &BizNest, (username, password): (&str, &str)) {
    let mut view = LoginView::new(app.clone());
    view.form.username = username.to_string();
    view.form.password = password.to_string();
    assert!(view.submit().await, "login failed: {:?}", view.error);
}

fn listing_id(demo: &DemoBackend, name: &str) -> i64 {
    demo.backend
        .listings_page(0, 100)
        .content
        .into_iter()
        .find(|l| l.name == name)
        .map(|l| l.id)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_sets_admin_flag_and_goes_home() {
    let (_demo, app) = start().await;

    sign_in(&app, seed::DEMO_ADMIN).await;

    assert!(app.session.is_admin());
    assert_eq!(app.session.username().as_deref(), Some(seed::DEMO_ADMIN.0));
    assert_eq!(app.navigator.current(), Route::Home);
}

#[tokio::test]
async fn test_login_errors_are_shown_inline() {
    let (_demo, app) = start().await;
    let mut view = LoginView::new(app.clone());

    view.form.password = "password123".to_string();
    assert!(!view.submit().await);
    assert_eq!(view.error.as_deref(), Some("User Name can not be empty"));

    view.form.username = "demo".to_string();
    view.form.password = "wrong-password".to_string();
    assert!(!view.submit().await);
    assert_eq!(view.error.as_deref(), Some(BAD_CREDENTIALS));
    assert!(app.session.token().is_none());
}

#[tokio::test]
async fn test_signup_switches_back_to_login() {
    let (_demo, app) = start().await;
    let mut view = LoginView::new(app.clone());

    view.switch_mode(LoginMode::Signup);
    view.form.username = "newbie".to_string();
    view.form.email = "newbie@biznest.local".to_string();
    view.form.password = "password123".to_string();
    view.form.confirm_password = "password123".to_string();

    assert!(view.submit().await);
    assert_eq!(view.mode, LoginMode::Login);
    assert_eq!(view.notice.as_deref(), Some(REGISTERED));
    assert_eq!(view.form.username, "newbie");
    assert!(view.form.confirm_password.is_empty());

    assert!(view.submit().await);
    assert_eq!(app.session.username().as_deref(), Some("newbie"));
}

// ---------------------------------------------------------------------------
// Admin gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_gate_accepts_only_the_demo_pair() {
    let (_demo, app) = start().await;
    sign_in(&app, seed::DEMO_USER).await;

    let mut gate = AdminGate::from_context(&app);
    assert!(!gate.is_unlocked());

    assert!(!gate.unlock("BIZNEST.CREATOR", "nope").await);
    assert_eq!(gate.error(), Some(GATE_ERROR));
    assert!(!app.session.is_admin());

    assert!(gate.unlock("BIZNEST.CREATOR", "password123").await);
    assert!(gate.is_unlocked());
    assert!(gate.error().is_none());
    assert!(app.session.is_admin());
}

#[tokio::test]
async fn test_gate_starts_open_for_admin_session() {
    let (_demo, app) = start().await;
    sign_in(&app, seed::DEMO_ADMIN).await;

    let gate = AdminGate::from_context(&app);
    assert!(gate.is_unlocked());
}

#[tokio::test]
async fn test_server_role_gate_requires_admin_role() {
    let mut config = ClientConfig::default();
    config.admin_gate.mode = AdminGateMode::ServerRole;
    let (_demo, app) = start_with(config).await;

    let mut gate = AdminGate::from_context(&app);
    assert!(!gate.unlock(seed::DEMO_USER.0, seed::DEMO_USER.1).await);
    assert_eq!(gate.error(), Some(GATE_ERROR));

    assert!(gate.unlock(seed::DEMO_ADMIN.0, seed::DEMO_ADMIN.1).await);
    assert!(app.session.is_admin());
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_home_consumes_category_handoff_once() {
    let (_demo, app) = start().await;
    app.listings.fetch_listings(0, 10).await;
    app.session.hand_off_category("Restaurants").unwrap();

    let home = HomeView::mount(app.clone());
    let names: Vec<String> = home.visible_listings().await.into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["Tunday Kebabi".to_string()]);
    home.unmount();

    let home = HomeView::mount(app.clone());
    let visible = home.visible_listings().await;
    // Two of the six seeded listings are still pending
    assert_eq!(visible.len(), 4);
    assert!(visible.iter().all(|l| l.status.is_public()));
}

#[tokio::test]
async fn test_home_builds_image_urls_once_per_generation() {
    let (demo, app) = start().await;
    app.listings.fetch_listings(0, 10).await;

    let mut home = HomeView::mount(app.clone());
    assert!(home.sync_images().await);
    assert!(!home.sync_images().await);

    let first = listing_id(&demo, "Tunday Kebabi");
    assert!(home.image_url(first).is_some());
    assert!(app.blobs.live_count() > 0);

    home.unmount();
    assert_eq!(app.blobs.live_count(), 0);
}

#[tokio::test]
async fn test_category_refresh_keeps_home_images() {
    let (_demo, app) = start().await;
    app.listings.fetch_listings(0, 10).await;

    let mut home = HomeView::mount(app.clone());
    assert!(home.sync_images().await);
    let live = app.blobs.live_count();
    assert!(live > 0);

    app.listings.fetch_categories().await;
    app.listings.fetch_category_stats().await;
    assert!(!home.sync_images().await);
    assert_eq!(app.blobs.live_count(), live);

    app.listings.fetch_listings(0, 10).await;
    assert!(home.sync_images().await);
    assert_eq!(app.blobs.live_count(), live);
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// Passes everything through except the review list of one listing,
/// which fails while `down` is set
struct ReviewListOutage {
    inner: ReqwestTransport,
    path: String,
    down: AtomicBool,
}

#[async_trait]
impl Transport for ReviewListOutage {
    async fn send(&self, request: ApiRequest) -> svckit::Result<ApiResponse> {
        if self.down.load(Ordering::SeqCst) && request.method.as_str() == "GET" && request.path == self.path {
            return Err(ClientError::Network("review list unavailable".to_string()));
        }
        self.inner.send(request).await
    }
}

#[tokio::test]
async fn test_first_review_switches_form_to_edit() {
    let (demo, app) = start().await;
    sign_in(&app, seed::DEMO_USER).await;
    let id = listing_id(&demo, "IIIT Lucknow");

    let mut view = DetailView::new(app.clone(), id);
    assert!(view.load().await);
    assert_eq!(view.mode(), ReviewFormMode::Create);
    assert!(!view.has_reviewed);

    view.form.rating = 5;
    view.form.comment = "Great campus".to_string();
    assert!(view.submit_review().await, "submit failed: {:?}", view.error);
    assert!(matches!(view.mode(), ReviewFormMode::Edit { .. }));
    assert!(view.has_reviewed);
    assert_eq!(view.reviews[0].comment, "Great campus");
    assert_eq!(view.average, "5.0");

    let mut reopened = DetailView::new(app.clone(), id);
    assert!(reopened.load().await);
    assert!(matches!(reopened.mode(), ReviewFormMode::Edit { .. }));
    assert_eq!(reopened.form.comment, "Great campus");
    assert_eq!(reopened.form.rating, 5);
}

#[tokio::test]
async fn test_existing_review_is_edited_in_place() {
    let (demo, app) = start().await;
    sign_in(&app, seed::DEMO_USER).await;
    let id = listing_id(&demo, "Phoenix Palassio");

    let mut view = DetailView::new(app.clone(), id);
    view.load().await;
    let ReviewFormMode::Edit { review_id } = view.mode() else {
        panic!("expected edit mode");
    };
    assert_eq!(view.form.comment, "Crowded on weekends.");

    view.form.comment = "Quieter on weekdays.".to_string();
    assert!(view.submit_review().await);
    assert_eq!(view.mode(), ReviewFormMode::Edit { review_id });
    assert_eq!(view.notice.as_deref(), Some("Review updated successfully!"));
    assert!(view.reviews.iter().any(|r| r.comment == "Quieter on weekdays."));
}

#[tokio::test]
async fn test_update_survives_failed_list_refresh() {
    let demo = DemoBackend::start(true).await.unwrap();
    let id = listing_id(&demo, "Phoenix Palassio");
    let outage = Arc::new(ReviewListOutage {
        inner: ReqwestTransport::new(&demo.base_url(), Duration::from_secs(5)).unwrap(),
        path: format!("/api/reviews/business/{}", id),
        down: AtomicBool::new(false),
    });
    let mut config = ClientConfig::default();
    config.api.base_url = demo.base_url();
    let app = BizNest::new(config, outage.clone(), Arc::new(MemoryStorage::new()));
    sign_in(&app, seed::DEMO_USER).await;

    let mut view = DetailView::new(app.clone(), id);
    assert!(view.load().await);
    assert!(matches!(view.mode(), ReviewFormMode::Edit { .. }));

    outage.down.store(true, Ordering::SeqCst);
    view.form.comment = "Better parking now.".to_string();
    assert!(view.submit_review().await, "update reported failure: {:?}", view.error);

    assert!(view.error.is_none());
    assert_eq!(view.notice.as_deref(), Some("Review updated successfully!"));
    assert!(view.reviews.iter().any(|r| r.comment == "Better parking now."));
    assert_ne!(view.average, "0.0");
}

#[tokio::test]
async fn test_background_load_installs_on_poll() {
    let (demo, app) = start().await;
    let id = listing_id(&demo, "Tunday Kebabi");

    let mut view = DetailView::new(app.clone(), id);
    view.start_load();
    assert!(view.is_loading());

    let installed = tokio::time::timeout(Duration::from_secs(5), async {
        while !view.poll_load().await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(installed.is_ok());
    assert!(!view.is_loading());
    assert!(!view.loading);
    assert_eq!(view.listing.as_ref().map(|l| l.id), Some(id));
}

#[tokio::test]
async fn test_unmount_during_background_load_drops_result() {
    let (demo, app) = start().await;
    let id = listing_id(&demo, "Tunday Kebabi");

    let mut view = DetailView::new(app.clone(), id);
    view.start_load();
    view.unmount();

    assert!(!view.wait_load().await);
    assert!(view.listing.is_none());
    assert!(view.image_url().is_none());
    assert_eq!(app.blobs.live_count(), 0);
}

#[tokio::test]
async fn test_anonymous_detail_keeps_review_form_closed() {
    let (demo, app) = start().await;
    let id = listing_id(&demo, "Tunday Kebabi");

    let mut view = DetailView::new(app.clone(), id);
    assert!(view.load().await);
    assert!(view.listing.is_some());
    assert!(view.user.is_none());

    view.form.rating = 4;
    view.form.comment = "Nice".to_string();
    assert!(!view.submit_review().await);
    assert_eq!(view.error.as_deref(), Some(biznest_dash::detail::LOGIN_REQUIRED));
}

#[tokio::test]
async fn test_unmounted_detail_drops_late_result() {
    let (demo, app) = start().await;
    let id = listing_id(&demo, "Tunday Kebabi");

    let mut view = DetailView::new(app.clone(), id);
    let guard = view.guard();
    let result = fetch_detail(&app, id).await;
    view.unmount();

    assert!(!view.apply(&guard, result));
    assert!(view.listing.is_none());
}

#[tokio::test]
async fn test_missing_listing_shows_load_error() {
    let (_demo, app) = start().await;

    let mut view = DetailView::new(app.clone(), 9999);
    assert!(view.load().await);
    assert_eq!(view.error.as_deref(), Some(biznest_dash::detail::LOAD_ERROR));
    assert!(!view.loading);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

async fn admin_dashboard(app: &BizNest, tab: Option<&str>) -> Dashboard {
    sign_in(app, seed::DEMO_ADMIN).await;
    app.navigator.navigate(Route::Dashboard {
        tab: tab.map(str::to_string),
    });
    Dashboard::mount(app.clone()).await
}

#[tokio::test]
async fn test_dashboard_opens_tab_from_route() {
    let (_demo, app) = start().await;
    let dash = admin_dashboard(&app, Some("reviews")).await;

    assert_eq!(dash.view(), View::Reviews);
    assert!(dash.is_unlocked());
    assert_eq!(app.reviews.snapshot().await.reviews.len(), 4);
}

#[tokio::test]
async fn test_dashboard_without_login_goes_to_login() {
    let (_demo, app) = start().await;
    app.navigator.navigate(Route::Dashboard { tab: None });

    let dash = Dashboard::mount(app.clone()).await;
    assert_eq!(dash.view(), View::Dashboard);
    assert_eq!(app.navigator.current(), Route::Login);
}

#[tokio::test]
async fn test_invalid_listing_keeps_modal_open() {
    let (_demo, app) = start().await;
    let mut dash = admin_dashboard(&app, Some("listings")).await;

    dash.open_new_listing();
    assert!(!dash.submit_listing().await);
    assert_eq!(dash.modal(), &Modal::ListingForm { editing: None });
    assert!(dash.alert().unwrap().starts_with("Saving listing failed"));
    dash.dismiss_alert();

    let restaurants = app
        .listings
        .snapshot()
        .await
        .categories
        .into_iter()
        .find(|c| c.name == "Restaurants")
        .unwrap();
    dash.listing_form.name = "Dastarkhwan".to_string();
    dash.listing_form.location = "Lalbagh".to_string();
    dash.listing_form.category_id = Some(restaurants.id);

    assert!(dash.submit_listing().await, "alert: {:?}", dash.alert());
    assert_eq!(dash.modal(), &Modal::None);
    assert!(dash.alert().is_none());

    let created = app
        .listing_api
        .search_listings(&svckit::types::SearchCriteria {
            name: "Dastarkhwan".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.content.len(), 1);
    assert_eq!(created.content[0].address, "Lalbagh Address");
    assert_eq!(created.content[0].phone, "+1 (555) 123-4567");
}

#[tokio::test]
async fn test_delete_goes_through_confirmation() {
    let (demo, app) = start().await;
    let mut dash = admin_dashboard(&app, Some("listings")).await;
    let id = listing_id(&demo, "Premium Auto Repair");

    dash.request_delete(PendingDelete::Listing(id));
    let Modal::Confirm(target) = dash.modal() else {
        panic!("expected confirmation");
    };
    assert_eq!(target.prompt(), "Are you sure you want to delete this listing?");

    assert!(dash.confirm_delete().await);
    assert_eq!(dash.modal(), &Modal::None);
    assert!(app.listing_api.get_listing(id).await.is_err());
}

#[tokio::test]
async fn test_cancelled_delete_keeps_listing() {
    let (demo, app) = start().await;
    let mut dash = admin_dashboard(&app, Some("listings")).await;
    let id = listing_id(&demo, "Saroj Hostel");

    dash.request_delete(PendingDelete::Listing(id));
    dash.close_modal();

    assert!(!dash.confirm_delete().await);
    assert!(app.listing_api.get_listing(id).await.is_ok());
}

#[tokio::test]
async fn test_category_in_use_cannot_be_deleted() {
    let (_demo, app) = start().await;
    let mut dash = admin_dashboard(&app, Some("categories")).await;
    let restaurants = app
        .listings
        .snapshot()
        .await
        .categories
        .into_iter()
        .find(|c| c.name == "Restaurants")
        .unwrap();

    dash.request_delete(PendingDelete::Category(restaurants.id));
    assert!(!dash.confirm_delete().await);
    assert!(dash.alert().unwrap().starts_with("Delete failed"));
    assert_eq!(dash.modal(), &Modal::None);
    assert_eq!(app.listings.snapshot().await.categories.len(), 6);
}

#[tokio::test]
async fn test_admin_grants_role_from_users_view() {
    let (_demo, app) = start().await;
    let mut dash = admin_dashboard(&app, Some("users")).await;

    let sam = dash.users().iter().find(|u| u.username == "sam").cloned().unwrap();
    assert!(!sam.is_admin());

    dash.open_roles(&sam);
    dash.toggle_role(Role::Admin);
    assert!(dash.submit_roles().await, "alert: {:?}", dash.alert());
    assert_eq!(dash.modal(), &Modal::None);

    let sam = dash.users().iter().find(|u| u.username == "sam").unwrap();
    assert!(sam.is_admin());
}

#[tokio::test]
async fn test_response_clears_pending_review() {
    let (_demo, app) = start().await;
    let mut dash = admin_dashboard(&app, Some("reviews")).await;

    let pending = app.reviews.pending_responses().await;
    let before = pending.len();
    let review = pending.first().cloned().unwrap();

    dash.open_response(review.id);
    assert!(!dash.submit_response().await);
    assert!(matches!(dash.modal(), Modal::Response { .. }));
    dash.dismiss_alert();

    dash.response_text = "Thanks for visiting!".to_string();
    assert!(dash.submit_response().await);
    assert_eq!(app.reviews.pending_responses().await.len(), before - 1);
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_profile_password_mismatch_is_local() {
    let (_demo, app) = start().await;
    sign_in(&app, seed::DEMO_USER).await;

    let mut view = ProfileView::new(app.clone());
    assert!(view.load().await);
    assert_eq!(view.user.as_ref().unwrap().username, "demo");

    view.password.current = "password123".to_string();
    view.password.new = "newpassword1".to_string();
    view.password.confirm = "different1".to_string();
    assert!(!view.change_password().await);
    assert_eq!(view.password_error.as_deref(), Some("New passwords don't match"));
    assert_eq!(view.password.new, "newpassword1");
}

#[tokio::test]
async fn test_profile_edit_and_cancel() {
    let (_demo, app) = start().await;
    sign_in(&app, seed::DEMO_USER).await;

    let mut view = ProfileView::new(app.clone());
    view.load().await;

    view.start_editing();
    view.form.display_name = "Scratch".to_string();
    view.cancel_editing();
    assert!(!view.editing);
    assert_ne!(view.form.display_name, "Scratch");

    view.start_editing();
    view.form.display_name = "Demo Owner".to_string();
    assert!(view.save().await, "error: {:?}", view.error);
    assert!(!view.editing);
    assert_eq!(view.user.as_ref().unwrap().display_name.as_deref(), Some("Demo Owner"));
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_contact_form_sends_and_keeps_inbox() {
    let (demo, app) = start().await;
    let mut view = ContactView::new(app.clone());

    view.toggle_kind();
    view.form.full_name = "  Asha Rao ".to_string();
    view.form.email = "asha@biznest.local".to_string();
    view.form.message = "Please list my bakery".to_string();

    assert!(view.submit().await, "send failed: {:?}", view.error);
    assert_eq!(view.notice.as_deref(), Some(SENT));
    assert!(view.form.full_name.is_empty());
    assert!(view.form.message.is_empty());
    assert_eq!(view.kind(), ContactKind::Business);

    let received = demo.backend.contact_messages();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].full_name, "Asha Rao");
    assert_eq!(received[0].kind, ContactKind::Business);
}

#[tokio::test]
async fn test_contact_validation_is_local() {
    let (demo, app) = start().await;
    let mut view = ContactView::new(app.clone());

    view.form.email = "asha@biznest.local".to_string();
    view.form.message = "Hello".to_string();
    assert!(!view.submit().await);
    assert_eq!(view.error.as_deref(), Some("Please enter your name"));

    view.form.full_name = "Asha".to_string();
    view.form.email = "asha".to_string();
    assert!(!view.submit().await);
    assert_eq!(view.error.as_deref(), Some("Please enter a valid email address"));
    assert!(demo.backend.contact_messages().is_empty());
}

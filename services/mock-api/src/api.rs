// services/mock-api/src/api.rs
//
// REST surface of the mock backend, mounted under /api
//

use axum::{
    async_trait,
    extract::{FromRequestParts, Multipart, Path, Query, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use svckit::types::{
    AnalyticsSnapshot, Category, CategoryDraft, CategoryStats, ContactRequest, Listing, ListingDraft, LoginRequest,
    LoginResponse, MessageResponse, Page, PasswordChange, ProfileUpdate, ResetPasswordRequest,
    Review, ReviewDraft, Role, SignupRequest, User,
};

use crate::error::{ApiError, ApiResult};
use crate::state::{MockBackend, StoredImage};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<MockBackend>,
}

/// Caller resolved from the bearer token
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;
        Ok(AuthUser(state.backend.authenticate(token.trim())?))
    }
}

/// Authenticated caller holding ROLE_ADMIN
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::Forbidden("Access is denied".to_string()));
        }
        Ok(AdminUser(user))
    }
}

pub fn router(backend: Arc<MockBackend>) -> Router {
    let state = AppState { backend };

    Router::new()
        .route("/health", get(handle_health))
        .route("/metrics", get(handle_metrics))
        // Auth
        .route("/api/auth/signup", post(handle_signup))
        .route("/api/auth/login", post(handle_login))
        .route("/api/password/forgot", post(handle_forgot_password))
        .route("/api/password/reset", post(handle_reset_password))
        .route("/api/contact", post(handle_contact))
        // Listings
        .route("/api/listings", get(handle_list_listings).post(handle_create_listing))
        .route("/api/listings/search", get(handle_search_listings))
        .route("/api/listings/by-category", get(handle_listings_by_category))
        .route("/api/listings/by-owner", get(handle_listings_by_owner))
        .route(
            "/api/listings/:id",
            get(handle_get_listing)
                .put(handle_update_listing)
                .delete(handle_delete_listing),
        )
        .route(
            "/api/listings/:id/image",
            get(handle_get_listing_image).post(handle_upload_listing_image),
        )
        // Categories
        .route("/api/categories", get(handle_list_categories).post(handle_create_category))
        .route("/api/categories/stats", get(handle_category_stats))
        .route(
            "/api/categories/:id",
            get(handle_get_category)
                .put(handle_update_category)
                .delete(handle_delete_category),
        )
        // Reviews
        .route("/api/reviews", post(handle_create_review))
        .route("/api/reviews/with-response", get(handle_reviews_with_response))
        .route("/api/reviews/without-response", get(handle_reviews_without_response))
        .route("/api/reviews/check-reviewed", get(handle_check_reviewed))
        .route("/api/reviews/business/:id", get(handle_reviews_by_listing))
        .route("/api/reviews/business/:id/page", get(handle_reviews_by_listing_page))
        .route("/api/reviews/business/:id/average-rating", get(handle_average_rating))
        .route("/api/reviews/business/:id/count", get(handle_review_count))
        .route("/api/reviews/user/:id", get(handle_reviews_by_user))
        .route("/api/reviews/user/:id/page", get(handle_reviews_by_user_page))
        .route(
            "/api/reviews/:id",
            get(handle_get_review)
                .put(handle_update_review)
                .delete(handle_delete_review),
        )
        .route("/api/reviews/:id/response", post(handle_add_response))
        // Users
        .route("/api/user/me", get(handle_get_me).put(handle_update_me))
        .route("/api/user/password", put(handle_update_password))
        .route("/api/user/all", get(handle_all_users))
        .route("/api/user/profile-picture", post(handle_upload_profile_picture))
        .route("/api/user/:username", get(handle_get_user).delete(handle_delete_user))
        .route("/api/user/:username/roles", put(handle_update_roles))
        .route("/api/user/:username/profile-picture", get(handle_get_profile_picture))
        // Dashboard
        .route("/api/dashboard/analytics", get(handle_analytics))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(backend: Arc<MockBackend>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("BizNest mock API listening on {}", addr);

    axum::serve(listener, router(backend)).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

fn default_size() -> u32 {
    10
}

#[derive(Deserialize)]
struct PageParams {
    #[serde(default)]
    page: u32,
    #[serde(default = "default_size")]
    size: u32,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    page: u32,
    #[serde(default = "default_size")]
    size: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingParams {
    category_id: Option<i64>,
    owner_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryParam {
    category_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerParam {
    owner_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewParams {
    user_id: i64,
    business_listing_id: i64,
}

#[derive(Deserialize)]
struct ForgotPasswordRequest {
    email: String,
}

// ---------------------------------------------------------------------------
// Service endpoints
// ---------------------------------------------------------------------------

async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "mock-api",
        "timestamp": chrono::Utc::now(),
    }))
}

async fn handle_metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    match encoder.encode(&prometheus::gather(), &mut buffer) {
        Ok(()) => (StatusCode::OK, String::from_utf8_lossy(&buffer).into_owned()),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.backend.signup(&request).map(Json)
}

async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let LoginResponse { token, username } = state.backend.login(&request)?;
    Ok(Json(json!({ "token": token, "type": "Bearer", "username": username })))
}

async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.backend.forgot_password(&request.email).map(Json)
}

async fn handle_reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.backend.reset_password(&request).map(Json)
}

/// Plain-text acknowledgement, not the usual `{ "message": ... }` body
async fn handle_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> ApiResult<&'static str> {
    state.backend.submit_contact(request)?;
    Ok("Message sent")
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

async fn handle_list_listings(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Json<Page<Listing>> {
    Json(state.backend.listings_page(params.page, params.size))
}

async fn handle_search_listings(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Page<Listing>> {
    Json(state.backend.search_listings(
        &params.name,
        &params.category,
        &params.location,
        params.page,
        params.size,
    ))
}

async fn handle_listings_by_category(
    State(state): State<AppState>,
    Query(params): Query<CategoryParam>,
) -> Json<Vec<Listing>> {
    Json(state.backend.listings_by_category(params.category_id))
}

async fn handle_listings_by_owner(
    State(state): State<AppState>,
    Query(params): Query<OwnerParam>,
) -> Json<Vec<Listing>> {
    Json(state.backend.listings_by_owner(params.owner_id))
}

async fn handle_get_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Listing>> {
    state.backend.listing(id).map(Json)
}

async fn handle_create_listing(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListingParams>,
    Json(draft): Json<ListingDraft>,
) -> ApiResult<Json<Listing>> {
    info!("{} creating listing {}", user.username, draft.name);
    state
        .backend
        .create_listing(&draft, params.category_id, params.owner_id.or(user.id))
        .map(Json)
}

async fn handle_update_listing(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
    Query(params): Query<ListingParams>,
    Json(draft): Json<ListingDraft>,
) -> ApiResult<Json<Listing>> {
    state
        .backend
        .update_listing(id, &draft, params.category_id, params.owner_id)
        .map(Json)
}

async fn handle_delete_listing(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.backend.delete_listing(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_get_listing_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let image = state.backend.listing_image(id)?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], image.data))
}

async fn handle_upload_listing_image(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> ApiResult<&'static str> {
    let image = read_file_field(multipart).await?;
    state.backend.set_listing_image(id, image)?;
    Ok("Image uploaded successfully")
}

async fn read_file_field(mut multipart: Multipart) -> ApiResult<StoredImage> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        return Ok(StoredImage { content_type, data });
    }
    Err(ApiError::bad_request("Missing multipart field 'file'"))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

async fn handle_list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.backend.categories())
}

async fn handle_category_stats(State(state): State<AppState>) -> Json<CategoryStats> {
    Json(state.backend.category_stats())
}

async fn handle_get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Category>> {
    state.backend.category(id).map(Json)
}

async fn handle_create_category(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Json(draft): Json<CategoryDraft>,
) -> ApiResult<Json<Category>> {
    state.backend.create_category(&draft).map(Json)
}

async fn handle_update_category(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
    Json(draft): Json<CategoryDraft>,
) -> ApiResult<Json<Category>> {
    state.backend.update_category(id, &draft).map(Json)
}

async fn handle_delete_category(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.backend.delete_category(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

async fn handle_create_review(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(params): Query<ReviewParams>,
    Json(draft): Json<ReviewDraft>,
) -> ApiResult<Json<Review>> {
    state
        .backend
        .create_review(&draft, params.user_id, params.business_listing_id)
        .map(Json)
}

async fn handle_get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Review>> {
    state.backend.review(id).map(Json)
}

async fn handle_update_review(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
    Json(draft): Json<ReviewDraft>,
) -> ApiResult<Json<Review>> {
    state.backend.update_review(id, &draft).map(Json)
}

/// The response text arrives as a raw string body
async fn handle_add_response(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
    body: String,
) -> ApiResult<Json<Review>> {
    state.backend.add_response(id, body.trim()).map(Json)
}

async fn handle_delete_review(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.backend.delete_review(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_reviews_by_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Review>>> {
    state.backend.reviews_by_listing(id).map(Json)
}

async fn handle_reviews_by_listing_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<Review>>> {
    let reviews = state.backend.reviews_by_listing(id)?;
    Ok(Json(crate::state::paginate(&reviews, params.page, params.size)))
}

async fn handle_average_rating(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<f64>> {
    state.backend.average_rating(id).map(Json)
}

async fn handle_review_count(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<u64>> {
    state.backend.review_count(id).map(Json)
}

async fn handle_reviews_by_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Review>>> {
    state.backend.reviews_by_user(id).map(Json)
}

async fn handle_reviews_by_user_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<Review>>> {
    let reviews = state.backend.reviews_by_user(id)?;
    Ok(Json(crate::state::paginate(&reviews, params.page, params.size)))
}

async fn handle_reviews_with_response(State(state): State<AppState>) -> Json<Vec<Review>> {
    Json(state.backend.reviews_by_response(true))
}

async fn handle_reviews_without_response(State(state): State<AppState>) -> Json<Vec<Review>> {
    Json(state.backend.reviews_by_response(false))
}

async fn handle_check_reviewed(
    State(state): State<AppState>,
    Query(params): Query<ReviewParams>,
) -> Json<bool> {
    Json(state.backend.has_reviewed(params.user_id, params.business_listing_id))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn handle_get_me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

async fn handle_update_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<User>> {
    state.backend.update_profile(&user.username, &update).map(Json)
}

async fn handle_update_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(change): Json<PasswordChange>,
) -> ApiResult<Json<MessageResponse>> {
    state.backend.change_password(&user.username, &change).map(Json)
}

async fn handle_upload_profile_picture(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<MessageResponse>> {
    let image = read_file_field(multipart).await?;
    state.backend.set_profile_picture(&user.username, image).map(Json)
}

async fn handle_get_profile_picture(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let image = state.backend.profile_picture(&username)?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], image.data))
}

async fn handle_all_users(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Json<Vec<User>> {
    Json(state.backend.all_users())
}

async fn handle_get_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(username): Path<String>,
) -> ApiResult<Json<User>> {
    state.backend.user(&username).map(Json)
}

/// Body must be a bare JSON array of role names
async fn handle_update_roles(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(username): Path<String>,
    Json(roles): Json<Vec<Role>>,
) -> ApiResult<Json<MessageResponse>> {
    info!("{} updating roles of {}", admin.username, username);
    state.backend.set_roles(&username, &roles).map(Json)
}

async fn handle_delete_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(username): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.backend.delete_user(&username)?;
    Ok(Json(MessageResponse {
        message: format!("User deleted successfully: {}", username),
    }))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

async fn handle_analytics(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Json<AnalyticsSnapshot> {
    Json(state.backend.analytics())
}

/// Bind an ephemeral localhost port and serve in the background.
/// Used by the demo dashboard and end-to-end tests.
pub async fn spawn_server(
    backend: Arc<MockBackend>,
) -> anyhow::Result<(std::net::SocketAddr, tokio::task::JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = router(backend);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Mock API server stopped: {}", e);
        }
    });

    info!("BizNest mock API serving on http://{}", addr);
    Ok((addr, handle))
}

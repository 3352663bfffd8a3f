// svckit/src/types.rs
//
// Wire models for the BizNest REST surface. Loose server shapes
// (category as string or object, owner as id or object, page or bare
// array) are normalized here so nothing downstream re-checks them.
//

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use validator::Validate;

/// Deserialize `null` as the type's default
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Moderation state of a listing. Only `Approved` is publicly browsable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Approved,
    Pending,
    Rejected,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Approved,
        ListingStatus::Pending,
        ListingStatus::Rejected,
    ];

    pub fn is_public(&self) -> bool {
        matches!(self, ListingStatus::Approved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Approved => "Approved",
            ListingStatus::Pending => "Pending",
            ListingStatus::Rejected => "Rejected",
        }
    }
}

impl Default for ListingStatus {
    fn default() -> Self {
        ListingStatus::Approved
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category as referenced from a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCategoryRef")]
pub struct CategoryRef {
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategoryRef {
    Name(String),
    Object {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<RawCategoryRef> for CategoryRef {
    fn from(raw: RawCategoryRef) -> Self {
        match raw {
            RawCategoryRef::Name(name) => CategoryRef { id: None, name },
            RawCategoryRef::Object { id, name } => CategoryRef {
                id,
                name: name.unwrap_or_default(),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOwner {
    Id(i64),
    Object {
        #[serde(default)]
        id: Option<i64>,
    },
}

fn owner_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawOwner>::deserialize(deserializer)?.and_then(|raw| match raw {
        RawOwner::Id(id) => Some(id),
        RawOwner::Object { id } => id,
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable")]
    pub address: String,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: String,
    #[serde(default, deserialize_with = "nullable")]
    pub business_hours: String,
    #[serde(default)]
    pub rating: Option<f64>,
    pub status: ListingStatus,
    #[serde(default, deserialize_with = "owner_id")]
    pub owner: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Listing {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

/// Form payload for creating or updating a listing. Category and owner
/// travel as `categoryId` / `ownerId` query parameters, not in the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    #[validate(length(min = 1, message = "Business name is required"))]
    pub name: String,
    #[serde(skip)]
    #[validate(required(message = "Please choose a category"))]
    pub category_id: Option<i64>,
    #[serde(skip)]
    pub owner_id: Option<i64>,
    pub location: String,
    pub status: ListingStatus,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub business_hours: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl ListingDraft {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            name: listing.name.clone(),
            category_id: listing.category.as_ref().and_then(|c| c.id),
            owner_id: listing.owner,
            location: listing.location.clone(),
            status: listing.status,
            description: listing.description.clone(),
            address: listing.address.clone(),
            phone: listing.phone.clone(),
            business_hours: listing.business_hours.clone(),
            rating: listing.rating,
        }
    }

    pub(crate) fn id_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(category_id) = self.category_id {
            params.push(("categoryId".to_string(), category_id.to_string()));
        }
        if let Some(owner_id) = self.owner_id {
            params.push(("ownerId".to_string(), owner_id.to_string()));
        }
        params
    }
}

/// Filters for `GET /listings/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub name: String,
    pub category: String,
    pub location: String,
    pub page: u32,
    pub size: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            location: String::new(),
            page: 0,
            size: 10,
        }
    }
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.category.is_empty() && self.location.is_empty()
    }

    pub(crate) fn query(&self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), self.name.clone()),
            ("category".to_string(), self.category.clone()),
            ("location".to_string(), self.location.clone()),
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Wrap a bare list as a single page
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len() as u32;
        Self {
            total_elements: len as u64,
            number: 0,
            size: len,
            total_pages: if len == 0 { 0 } else { 1 },
            content,
        }
    }
}

/// Some endpoints answer with a page envelope, older ones with a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PageOrList<T> {
    Page(Page<T>),
    List(Vec<T>),
}

impl<T> From<PageOrList<T>> for Page<T> {
    fn from(payload: PageOrList<T>) -> Self {
        match payload {
            PageOrList::Page(page) => page,
            PageOrList::List(list) => Page::single(list),
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryDraft {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    pub description: String,
}

/// Listing count per category name
pub type CategoryStats = BTreeMap<String, i64>;

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub rating: u8,
    #[serde(default, deserialize_with = "nullable")]
    pub comment: String,
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default, alias = "businessListingId")]
    pub listing_id: Option<i64>,
    #[serde(default)]
    pub business_response: Option<String>,
    #[serde(default)]
    pub response_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Review {
    pub fn has_response(&self) -> bool {
        self.business_response
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReviewDraft {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    #[validate(length(min = 1, message = "Please write a comment"))]
    pub comment: String,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            rating: 5,
            comment: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// Partial profile update for `PUT /user/me`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password needs to be more than 7 characters long!"))]
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "User Name can not be empty"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password needs to be more than 7 characters long!"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "User Name can not be empty"))]
    pub username: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password needs to be more than 7 characters long!"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter the code from your email"))]
    pub otp: String,
    #[validate(length(min = 8, message = "Password needs to be more than 7 characters long!"))]
    pub new_password: String,
}

/// Generic `{ "message": ... }` body returned by auth and user endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// Which inbox a contact message is routed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    #[default]
    General,
    Business,
}

impl ContactKind {
    pub fn toggle(self) -> Self {
        match self {
            ContactKind::General => ContactKind::Business,
            ContactKind::Business => ContactKind::General,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactKind::General => "General Inquiry",
            ContactKind::Business => "Business Listing",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[validate(length(min = 1, message = "Please enter your name"))]
    pub full_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please write a message"))]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: ContactKind,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSnapshot {
    pub total_listings: u64,
    pub active_listings: u64,
    pub pending_listings: u64,
    pub total_users: u64,
    pub total_reviews: u64,
    pub pending_reviews: u64,
    pub average_rating: f64,
    pub listings_trend: String,
    pub users_trend: String,
    pub reviews_trend: String,
    pub rating_trend: String,
}

/// Binary image as returned by `GET /listings/{id}/image`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub content_type: String,
    pub data: bytes::Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_as_string_or_object() {
        let from_string: Listing = serde_json::from_value(json!({
            "id": 1, "name": "Bean There", "category": "Cafes", "status": "Approved"
        }))
        .unwrap();
        assert_eq!(
            from_string.category,
            Some(CategoryRef { id: None, name: "Cafes".into() })
        );

        let from_object: Listing = serde_json::from_value(json!({
            "id": 2, "name": "Bean There", "status": "Pending",
            "category": { "id": 7, "name": "Cafes", "description": "Coffee", "businessListings": [] }
        }))
        .unwrap();
        assert_eq!(
            from_object.category,
            Some(CategoryRef { id: Some(7), name: "Cafes".into() })
        );
        assert_eq!(from_object.category_name(), Some("Cafes"));
    }

    #[test]
    fn test_owner_and_null_fields() {
        let listing: Listing = serde_json::from_value(json!({
            "id": 3, "name": "Tunday", "status": "Rejected",
            "owner": { "id": 12, "username": "kebab" },
            "phone": null, "businessHours": "9-5", "description": null
        }))
        .unwrap();
        assert_eq!(listing.owner, Some(12));
        assert_eq!(listing.phone, "");
        assert_eq!(listing.business_hours, "9-5");
        assert!(!listing.status.is_public());

        let by_id: Listing = serde_json::from_value(json!({
            "id": 4, "name": "x", "status": "Approved", "owner": 5
        }))
        .unwrap();
        assert_eq!(by_id.owner, Some(5));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result: Result<Listing, _> = serde_json::from_value(json!({
            "id": 1, "name": "x", "status": "Archived"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_draft_keeps_ids_out_of_body() {
        let draft = ListingDraft {
            name: "Bean There".into(),
            category_id: Some(3),
            owner_id: Some(9),
            business_hours: "8-4".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("categoryId").is_none());
        assert!(body.get("ownerId").is_none());
        assert_eq!(body["businessHours"], "8-4");
        assert_eq!(
            draft.id_params(),
            vec![
                ("categoryId".to_string(), "3".to_string()),
                ("ownerId".to_string(), "9".to_string())
            ]
        );
    }

    #[test]
    fn test_page_or_bare_list() {
        let list: PageOrList<Category> = serde_json::from_value(json!([
            { "id": 1, "name": "Cafes", "description": null }
        ]))
        .unwrap();
        let page: Page<Category> = list.into();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.total_pages, 1);

        let env: PageOrList<Category> = serde_json::from_value(json!({
            "content": [], "totalElements": 42, "number": 2, "size": 10, "totalPages": 5
        }))
        .unwrap();
        let page: Page<Category> = env.into();
        assert_eq!(page.total_elements, 42);
        assert_eq!(page.number, 2);
    }

    #[test]
    fn test_roles_serialize_as_bare_strings() {
        let roles: BTreeSet<Role> = [Role::Admin, Role::User].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&roles).unwrap(),
            json!(["ROLE_USER", "ROLE_ADMIN"])
        );
    }

    #[test]
    fn test_review_response_flag() {
        let review: Review = serde_json::from_value(json!({
            "id": 1, "rating": 4, "comment": "Good", "username": "sam",
            "businessName": "Bean There", "businessResponse": "  ",
            "createdAt": "2024-03-01T10:15:30"
        }))
        .unwrap();
        assert!(!review.has_response());
        assert!(review.created_at.is_some());
    }

    #[test]
    fn test_contact_request_wire_shape() {
        let request = ContactRequest {
            full_name: "Asha Rao".into(),
            email: "asha@biznest.local".into(),
            message: "Hello".into(),
            kind: ContactKind::Business,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"fullName": "Asha Rao", "email": "asha@biznest.local", "message": "Hello", "type": "business"})
        );
    }
}

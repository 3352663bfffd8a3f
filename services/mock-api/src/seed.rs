// services/mock-api/src/seed.rs
//
// Demo data for the mock backend
//

use bytes::Bytes;
use tracing::info;

use svckit::types::{CategoryDraft, ListingDraft, ListingStatus, ReviewDraft, Role};

use crate::error::ApiResult;
use crate::state::{MockBackend, StoredImage};

pub const DEMO_ADMIN: (&str, &str) = ("BIZNEST.CREATOR", "password123");
pub const DEMO_USER: (&str, &str) = ("demo", "password123");

struct SeedListing {
    name: &'static str,
    category: usize,
    location: &'static str,
    address: &'static str,
    phone: &'static str,
    hours: &'static str,
    status: ListingStatus,
    description: &'static str,
}

const CATEGORIES: [(&str, &str); 6] = [
    ("Restaurants", "Food and dining"),
    ("Shopping", "Shops, malls and retail"),
    ("Education", "Schools and colleges"),
    ("Accommodation", "Hostels, hotels and places to stay"),
    ("Health & Beauty", "Spas, salons and wellness"),
    ("Automotive", "Auto repair and vehicle services"),
];

const LISTINGS: [SeedListing; 6] = [
    SeedListing {
        name: "Tunday Kebabi",
        category: 0,
        location: "Aminabad",
        address: "Naaz Cinema Road, Aminabad",
        phone: "+91 522 401 1234",
        hours: "11:00 - 23:00",
        status: ListingStatus::Approved,
        description: "Old city kebab house known for galouti kebabs.",
    },
    SeedListing {
        name: "Phoenix Palassio",
        category: 1,
        location: "Amar Shaheed Path",
        address: "Sector 7, Gomti Nagar Extension",
        phone: "+91 522 402 5678",
        hours: "10:00 - 22:00",
        status: ListingStatus::Approved,
        description: "Large shopping mall with retail, dining and a cinema.",
    },
    SeedListing {
        name: "IIIT Lucknow",
        category: 2,
        location: "Chak Ganjaria",
        address: "Ahmamau, Arjunganj",
        phone: "+91 522 403 9012",
        hours: "09:00 - 17:00",
        status: ListingStatus::Approved,
        description: "Institute of information technology.",
    },
    SeedListing {
        name: "Saroj Hostel",
        category: 3,
        location: "Campus Area",
        address: "Near Gate 2",
        phone: "+91 522 404 3456",
        hours: "Open 24 hours",
        status: ListingStatus::Pending,
        description: "Budget hostel close to campus.",
    },
    SeedListing {
        name: "Luxury Spa & Wellness",
        category: 4,
        location: "Gomti Nagar",
        address: "Vibhuti Khand",
        phone: "+91 522 405 7890",
        hours: "10:00 - 20:00",
        status: ListingStatus::Approved,
        description: "Massage, skin care and wellness packages.",
    },
    SeedListing {
        name: "Premium Auto Repair",
        category: 5,
        location: "Aishbagh",
        address: "Station Road",
        phone: "+91 522 406 2345",
        hours: "08:00 - 19:00",
        status: ListingStatus::Pending,
        description: "Servicing, repairs and detailing.",
    },
];

const PLACEHOLDER_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Fill an empty backend with accounts, categories, listings and reviews
pub fn populate(backend: &MockBackend) -> ApiResult<()> {
    backend.add_account(DEMO_ADMIN.0, "creator@biznest.local", DEMO_ADMIN.1, &[Role::User, Role::Admin]);
    let demo = backend.add_account(DEMO_USER.0, "demo@biznest.local", DEMO_USER.1, &[Role::User]);
    let sam = backend.add_account("sam", "sam@biznest.local", "password123", &[Role::User]);

    let mut category_ids = Vec::new();
    for (name, description) in CATEGORIES {
        let category = backend.create_category(&CategoryDraft {
            name: name.to_string(),
            description: description.to_string(),
        })?;
        category_ids.push(category.id);
    }

    let mut listing_ids = Vec::new();
    for seed in &LISTINGS {
        let draft = ListingDraft {
            name: seed.name.to_string(),
            location: seed.location.to_string(),
            address: seed.address.to_string(),
            phone: seed.phone.to_string(),
            business_hours: seed.hours.to_string(),
            status: seed.status,
            description: seed.description.to_string(),
            ..ListingDraft::default()
        };
        let listing = backend.create_listing(&draft, Some(category_ids[seed.category]), demo.id)?;
        backend.set_listing_image(
            listing.id,
            StoredImage {
                content_type: "image/png".to_string(),
                data: Bytes::from_static(PLACEHOLDER_PNG),
            },
        )?;
        listing_ids.push(listing.id);
    }

    let (Some(demo_id), Some(sam_id)) = (demo.id, sam.id) else {
        return Ok(());
    };
    let reviews = [
        (sam_id, 0, 5, "Excellent kebabs, friendly staff."),
        (sam_id, 1, 4, "Great shopping, reasonable prices."),
        (demo_id, 1, 3, "Crowded on weekends."),
        (sam_id, 4, 4, "Relaxing and clean."),
    ];
    let review_count = reviews.len();
    for (user_id, listing, rating, comment) in reviews {
        backend.create_review(
            &ReviewDraft {
                rating,
                comment: comment.to_string(),
            },
            user_id,
            listing_ids[listing],
        )?;
    }
    let unanswered = backend.reviews_by_response(false);
    if let Some(review) = unanswered.iter().find(|r| r.rating == 4) {
        backend.add_response(review.id, "Thank you for your feedback!")?;
    }

    info!(
        "Seeded demo data: {} categories, {} listings, {} reviews",
        category_ids.len(),
        listing_ids.len(),
        review_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_is_consistent() {
        let backend = MockBackend::new();
        populate(&backend).unwrap();

        let analytics = backend.analytics();
        assert_eq!(analytics.total_listings, 6);
        assert_eq!(analytics.pending_listings, 2);
        assert_eq!(analytics.total_reviews, 4);
        assert_eq!(analytics.pending_reviews, 3);
        assert_eq!(backend.category_stats().len(), 6);
        assert!(backend.user(DEMO_ADMIN.0).unwrap().is_admin());
    }
}

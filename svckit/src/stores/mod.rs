// svckit/src/stores/mod.rs
//
// Shared client-side state. Listings re-fetch after every mutation;
// reviews patch their local collection in place.
//

pub mod listings;
pub mod reviews;

pub use listings::{ListingMetrics, ListingsState, ListingsStore};
pub use reviews::{ReviewsState, ReviewsStore};

// svckit/src/services/mod.rs
//
// One thin service per REST resource. Each call maps to one endpoint and
// returns the parsed payload or the transport error; nothing is cached.
//

pub mod auth;
pub mod categories;
pub mod contact;
pub mod dashboard;
pub mod listings;
pub mod reviews;
pub mod users;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use contact::ContactService;
pub use dashboard::DashboardService;
pub use listings::ListingService;
pub use reviews::ReviewService;
pub use users::UserService;

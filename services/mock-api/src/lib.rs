// services/mock-api/src/lib.rs
//
// In-memory BizNest backend for local development and end-to-end tests
//

pub mod api;
pub mod error;
pub mod seed;
pub mod state;

pub use api::{router, spawn_server, start_server};
pub use error::{ApiError, ApiResult};
pub use state::MockBackend;

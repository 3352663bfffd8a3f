// svckit/src/lib.rs
//
// BizNest client kit: HTTP wrapper, resource services, stores and the
// ambient pieces (config, errors, storage, metrics) shared by the binaries
//

pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod images;
pub mod metrics;
pub mod navigation;
pub mod services;
pub mod storage;
pub mod stores;
pub mod types;
pub mod validation;

pub use context::BizNest;
pub use errors::{ClientError, Result};

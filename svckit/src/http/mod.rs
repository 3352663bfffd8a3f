pub mod client;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{ApiClient, API_PREFIX};
pub use transport::{ApiRequest, ApiResponse, FilePart, RequestBody, ReqwestTransport, Transport};

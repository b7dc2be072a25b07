//! Remote catalog client for the Jikan API v4.
//!
//! Searches are single-flight: starting a search cancels the one still in
//! flight, which then resolves to [`CatalogError::Cancelled`]. Detail lookups
//! are independent of that.

pub mod api;
pub mod error;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use api::{HttpTransport, JikanClient, RawResponse, ReqwestTransport};
pub use error::CatalogError;

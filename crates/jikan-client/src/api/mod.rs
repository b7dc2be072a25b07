//! Jikan API v4 client implementation.
//!
//! This module provides a single-flight search client for the Jikan API
//! (MyAnimeList unofficial API) over a pluggable HTTP transport.

pub mod client;
pub(crate) mod single_flight;
pub mod transport;
pub mod types;

pub use client::JikanClient;
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
pub use types::*;

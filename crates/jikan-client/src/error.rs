use thiserror::Error;

/// Outcome of a catalog request that did not produce data.
///
/// The `Display` text is what the view shows in an error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Transport-level failure (DNS, connection, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response.
    #[error("API Error: {status}")]
    Http { status: u16 },

    /// The requested anime does not exist (404 on a detail lookup).
    #[error("Anime not found")]
    NotFound,

    /// Superseded by a newer search before completion. Never shown to the user.
    #[error("Request cancelled")]
    Cancelled,

    /// 2xx response whose body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

use thiserror::Error;

/// Errors returned by the GeoServer client.
#[derive(Debug, Error)]
pub enum GeoServerError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GeoServer answered with a non-2xx status. Rendered as `"<request> <status>"`.
    #[error("{request} {status}")]
    UnexpectedStatus { request: &'static str, status: u16 },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A proxied path that would leave the GeoServer root.
    #[error("invalid proxy path: {0}")]
    InvalidPath(String),
}

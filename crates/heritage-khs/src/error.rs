use thiserror::Error;

/// Errors returned by the KHS open-API client.
#[derive(Debug, Error)]
pub enum KhsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status. Rendered as `"<endpoint> <status>"`.
    #[error("{endpoint} {status}")]
    UnexpectedStatus { endpoint: &'static str, status: u16 },

    /// The response body is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A well-formed response that lacks a field every record must carry.
    #[error("response is missing <{0}>")]
    MissingField(&'static str),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Terminal failures of [`crate::Resolver::resolve`].
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The list request itself failed.
    #[error("목록 조회 실패: {0}")]
    List(#[source] KhsError),

    /// The list request succeeded but returned no items.
    #[error("목록 결과 없음")]
    NoListResults,

    /// Every shortlisted candidate was skipped or failed to load.
    #[error("후보 상세 평가 실패")]
    NoScorableCandidate,

    #[error("조회 취소됨")]
    Cancelled,
}

impl ResolveError {
    /// `true` for outcomes that mean "nothing matched" rather than a
    /// technical failure.
    #[must_use]
    pub fn is_no_results(&self) -> bool {
        matches!(self, Self::NoListResults | Self::NoScorableCandidate)
    }
}

//! HTTP client for the KHS heritage open API.
//!
//! Two endpoints are used: `SearchKindOpenapiList.do` (candidates by kind,
//! region, and partial name) and `SearchKindOpenapiDt.do` (one record by
//! kind, asset number, and region). Both answer with XML.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::KhsError;
use crate::parse::{parse_detail, parse_list_items};
use crate::types::{DetailKey, DetailRecord, ListItem, ListQuery};

const DEFAULT_BASE_URL: &str = "https://www.khs.go.kr/cha";
const LIST_PATH: &str = "SearchKindOpenapiList.do";
const DETAIL_PATH: &str = "SearchKindOpenapiDt.do";

/// Client for the KHS list and detail endpoints.
///
/// Use [`KhsClient::new`] for production or [`KhsClient::with_base_url`] to
/// point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct KhsClient {
    client: Client,
    list_url: Url,
    detail_url: Url,
}

impl KhsClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`KhsError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, KhsError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Creates a client rooted at `base_url` (the directory holding the
    /// `*.do` endpoints).
    ///
    /// # Errors
    ///
    /// Returns [`KhsError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`KhsError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, KhsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| KhsError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        let list_url = base.join(LIST_PATH).map_err(|e| invalid(e.to_string()))?;
        let detail_url = base.join(DETAIL_PATH).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            list_url,
            detail_url,
        })
    }

    /// Fetches the raw list XML.
    ///
    /// # Errors
    ///
    /// - [`KhsError::Http`] on network failure.
    /// - [`KhsError::UnexpectedStatus`] (`"List <status>"`) on a non-2xx answer.
    pub async fn fetch_list_xml(&self, query: &ListQuery) -> Result<String, KhsError> {
        let url = self.build_list_url(query);
        self.get_text(url, "List").await
    }

    /// Fetches the raw detail XML, suitable for passing through verbatim.
    ///
    /// # Errors
    ///
    /// - [`KhsError::Http`] on network failure.
    /// - [`KhsError::UnexpectedStatus`] (`"Detail <status>"`) on a non-2xx answer.
    pub async fn fetch_detail_xml(&self, key: &DetailKey) -> Result<String, KhsError> {
        let url = self.build_detail_url(key);
        self.get_text(url, "Detail").await
    }

    /// Fetches and parses the list response.
    ///
    /// # Errors
    ///
    /// Everything [`KhsClient::fetch_list_xml`] returns, plus
    /// [`KhsError::Xml`] for a malformed body.
    pub async fn list_items(&self, query: &ListQuery) -> Result<Vec<ListItem>, KhsError> {
        let xml = self.fetch_list_xml(query).await?;
        parse_list_items(&xml)
    }

    /// Fetches and parses one detail record.
    ///
    /// # Errors
    ///
    /// Everything [`KhsClient::fetch_detail_xml`] returns, plus the
    /// [`parse_detail`] errors.
    pub async fn detail(&self, key: &DetailKey) -> Result<DetailRecord, KhsError> {
        let xml = self.fetch_detail_xml(key).await?;
        parse_detail(&xml)
    }

    fn build_list_url(&self, query: &ListQuery) -> Url {
        let mut url = self.list_url.clone();
        url.query_pairs_mut()
            .append_pair("ccbaKdcd", &query.kind_code)
            .append_pair("ccbaCtcd", &query.region_code)
            .append_pair("ccbaMnm1", &query.name)
            .append_pair("pageNo", "1")
            .append_pair("numOfRows", &query.page_size.to_string());
        url
    }

    fn build_detail_url(&self, key: &DetailKey) -> Url {
        let mut url = self.detail_url.clone();
        url.query_pairs_mut()
            .append_pair("ccbaKdcd", &key.kind_code)
            .append_pair("ccbaAsno", &key.external_id)
            .append_pair("ccbaCtcd", &key.region_code);
        url
    }

    async fn get_text(&self, url: Url, endpoint: &'static str) -> Result<String, KhsError> {
        tracing::debug!(%url, "KHS request");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(KhsError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

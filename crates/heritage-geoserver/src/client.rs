//! HTTP client for the GeoServer instance that serves the heritage layers.

use std::time::Duration;

use heritage_core::{region_groups, LayerInfo};
use reqwest::{Client, Url};

use crate::capabilities::parse_feature_type_names;
use crate::error::GeoServerError;
use crate::wfs::{distinct_feature_names, escape_cql_literal, get_feature_params, ADMIN1_LAYER};

/// A GeoServer answer relayed as-is: status, `content-type`, and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passthrough {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Client for one GeoServer base URL and workspace.
#[derive(Debug, Clone)]
pub struct GeoServerClient {
    client: Client,
    base_url: Url,
    workspace: String,
}

impl GeoServerClient {
    /// Creates a client rooted at `base_url` (e.g. `http://host/geoserver`).
    ///
    /// # Errors
    ///
    /// Returns [`GeoServerError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeoServerError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        workspace: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeoServerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeoServerError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GeoServerError::InvalidBaseUrl {
                url: normalised,
                reason: "not a hierarchical URL".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            workspace: workspace.to_string(),
        })
    }

    #[must_use]
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Upstream URL for a proxied request: `<base>/<path>?<query>`.
    ///
    /// The raw query string is forwarded untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GeoServerError::InvalidPath`] if `path` contains a `..`
    /// segment or is otherwise not joinable onto the base.
    pub fn proxy_url(&self, path: &str, query: Option<&str>) -> Result<Url, GeoServerError> {
        let path = path.trim_start_matches('/');
        if path.split('/').any(|segment| segment == ".." || segment == ".") {
            return Err(GeoServerError::InvalidPath(path.to_string()));
        }
        let mut url = self
            .base_url
            .join(path)
            .map_err(|_| GeoServerError::InvalidPath(path.to_string()))?;
        if !url.as_str().starts_with(self.base_url.as_str()) {
            return Err(GeoServerError::InvalidPath(path.to_string()));
        }
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    /// Fetches `path?query` and returns the answer whatever its status.
    ///
    /// # Errors
    ///
    /// - [`GeoServerError::InvalidPath`] for a path outside the base.
    /// - [`GeoServerError::Http`] on network failure only; non-2xx statuses
    ///   are returned in the [`Passthrough`].
    pub async fn passthrough(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<Passthrough, GeoServerError> {
        let url = self.proxy_url(path, query)?;
        tracing::debug!(%url, "GeoServer passthrough");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();
        Ok(Passthrough {
            status,
            content_type,
            body,
        })
    }

    /// `wfs?service=WFS&version=1.1.0&request=GetCapabilities`
    #[must_use]
    pub fn capabilities_url(&self) -> Url {
        let mut url = self.wfs_url();
        url.query_pairs_mut()
            .append_pair("service", "WFS")
            .append_pair("version", "1.1.0")
            .append_pair("request", "GetCapabilities");
        url
    }

    /// Every feature type name advertised by WFS `GetCapabilities`.
    ///
    /// # Errors
    ///
    /// - [`GeoServerError::Http`] on network failure.
    /// - [`GeoServerError::UnexpectedStatus`] on a non-2xx answer.
    /// - [`GeoServerError::Xml`] for a malformed document.
    pub async fn feature_type_names(&self) -> Result<Vec<String>, GeoServerError> {
        let body = self
            .get_success(self.capabilities_url(), "GetCapabilities")
            .await?;
        parse_feature_type_names(&String::from_utf8_lossy(&body))
    }

    /// Region layer groups for the layer panel, derived from the advertised
    /// feature types of this workspace.
    ///
    /// # Errors
    ///
    /// Everything [`GeoServerClient::feature_type_names`] returns.
    pub async fn layer_groups(&self) -> Result<Vec<LayerInfo>, GeoServerError> {
        let names = self.feature_type_names().await?;
        let groups = region_groups(names.iter().map(String::as_str), &self.workspace);
        tracing::debug!(
            feature_types = names.len(),
            groups = groups.len(),
            "derived layer groups"
        );
        Ok(groups)
    }

    /// GeoJSON `GetFeature` on `kr_admin1` returning only the `name` property.
    #[must_use]
    pub fn admin1_names_url(&self) -> Url {
        let mut url = self.wfs_url();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in get_feature_params(&self.workspace, ADMIN1_LAYER) {
                pairs.append_pair(key, &value);
            }
            pairs
                .append_pair("propertyName", "name")
                .append_pair("outputFormat", "application/json")
                .append_pair("srsName", "EPSG:4326");
        }
        url
    }

    /// Distinct, sorted province names.
    ///
    /// # Errors
    ///
    /// - [`GeoServerError::Http`] on network failure.
    /// - [`GeoServerError::UnexpectedStatus`] on a non-2xx answer.
    /// - [`GeoServerError::Json`] if the body is not a feature collection.
    pub async fn admin1_names(&self) -> Result<Vec<String>, GeoServerError> {
        let body = self
            .get_success(self.admin1_names_url(), "GetFeature")
            .await?;
        Ok(distinct_feature_names(&body)?)
    }

    /// GeoJSON `GetFeature` URL for the single province called `name`.
    #[must_use]
    pub fn admin1_wfs_url(&self, name: &str) -> Url {
        let mut url = self.wfs_url();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in get_feature_params(&self.workspace, ADMIN1_LAYER) {
                pairs.append_pair(key, &value);
            }
            pairs
                .append_pair("outputFormat", "application/json")
                .append_pair("srsName", "EPSG:4326")
                .append_pair(
                    "cql_filter",
                    &format!("name='{}'", escape_cql_literal(name)),
                );
        }
        url
    }

    fn wfs_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("wfs");
        }
        url
    }

    async fn get_success(
        &self,
        url: Url,
        request: &'static str,
    ) -> Result<Vec<u8>, GeoServerError> {
        tracing::debug!(%url, "GeoServer request");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoServerError::UnexpectedStatus {
                request,
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

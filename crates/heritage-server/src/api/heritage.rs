use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use heritage_core::ctcd_by_sido_name;
use heritage_khs::{DetailKey, GeoPoint, KhsError, ResolveError, ResolveRequest, ScoredCandidate};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

#[derive(Debug, Default, Deserialize)]
pub(super) struct DetailQuery {
    kdcd: Option<String>,
    asno: Option<String>,
    ctcd: Option<String>,
    #[serde(rename = "ccbaKdcd")]
    ccba_kdcd: Option<String>,
    #[serde(rename = "ccbaAsno")]
    ccba_asno: Option<String>,
    #[serde(rename = "ccbaCtcd")]
    ccba_ctcd: Option<String>,
}

impl DetailQuery {
    /// The detail key, or `None` if any part is missing after trimming.
    /// Short names win over their `ccba*` aliases.
    fn key(&self) -> Option<DetailKey> {
        Some(DetailKey {
            kind_code: first_present(self.kdcd.as_deref(), self.ccba_kdcd.as_deref())?,
            external_id: first_present(self.asno.as_deref(), self.ccba_asno.as_deref())?,
            region_code: first_present(self.ctcd.as_deref(), self.ccba_ctcd.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ResolveQuery {
    kdcd: Option<String>,
    ctcd: Option<String>,
    sido: Option<String>,
    name: Option<String>,
    lon: Option<String>,
    lat: Option<String>,
}

fn first_present(primary: Option<&str>, alias: Option<&str>) -> Option<String> {
    [primary, alias]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Proxies one KHS detail document verbatim.
pub(super) async fn get_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DetailQuery>,
) -> Result<Response, ApiError> {
    let Some(key) = query.key() else {
        return Err(ApiError::bad_request(req_id.0, "missing kdcd/asno/ctcd"));
    };

    let xml = state
        .khs()
        .fetch_detail_xml(&key)
        .await
        .map_err(|e| map_khs_error(req_id.0, &e))?;

    Ok(([(header::CONTENT_TYPE, XML_CONTENT_TYPE)], xml).into_response())
}

/// Resolves a clicked feature to its best-matching KHS detail record.
pub(super) async fn resolve(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ScoredCandidate>, ApiError> {
    // Unnamed features resolve on distance alone.
    let name = query.name.as_deref().map(str::trim).unwrap_or_default();
    let (Some(lon), Some(lat)) = (
        parse_coordinate(query.lon.as_deref()),
        parse_coordinate(query.lat.as_deref()),
    ) else {
        return Err(ApiError::bad_request(
            req_id.0,
            "lon and lat must be finite numbers",
        ));
    };

    let region_code = first_present(query.ctcd.as_deref(), None)
        .or_else(|| {
            query
                .sido
                .as_deref()
                .and_then(ctcd_by_sido_name)
                .map(str::to_string)
        })
        .unwrap_or_default();

    let request = ResolveRequest {
        kind_code: query.kdcd.unwrap_or_default(),
        region_code,
        name: name.to_string(),
        click: GeoPoint::new(lon, lat),
    };

    let best = state
        .resolver
        .resolve(&request)
        .await
        .map_err(|e| map_resolve_error(req_id.0, &e))?;

    tracing::info!(
        asno = %best.external_id,
        score = best.score,
        name = %request.name,
        "resolved heritage detail"
    );
    Ok(Json(best))
}

fn map_khs_error(request_id: String, error: &KhsError) -> ApiError {
    tracing::warn!(error = %error, "KHS request failed");
    match error {
        KhsError::UnexpectedStatus { .. } => ApiError::upstream(request_id, error.to_string()),
        _ => ApiError::upstream(request_id, "heritage API request failed"),
    }
}

fn map_resolve_error(request_id: String, error: &ResolveError) -> ApiError {
    match error {
        ResolveError::NoListResults | ResolveError::NoScorableCandidate => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        ResolveError::List(source) => {
            tracing::warn!(error = %source, "KHS list request failed");
            ApiError::upstream(request_id, error.to_string())
        }
        ResolveError::Cancelled => {
            ApiError::new(request_id, "internal_error", error.to_string())
        }
    }
}

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use heritage_core::LayerInfo;

use crate::middleware::RequestId;

use super::{map_geoserver_error, ApiError, AppState};

/// Relays `GET /api/geoserver/<path>?<query>` to GeoServer unchanged.
///
/// Upstream status, `content-type`, and body pass through as-is, including
/// error statuses. Only a transport failure becomes a JSON error.
pub(super) async fn proxy(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let upstream = state
        .geoserver
        .passthrough(&path, query.as_deref())
        .await
        .map_err(|e| map_geoserver_error(req_id.0, &e))?;

    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, upstream.body).into_response();
    match upstream
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        Some(content_type) => {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }
    Ok(response)
}

pub(super) async fn list_layer_groups(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Vec<LayerInfo>>, ApiError> {
    let groups = state
        .geoserver
        .layer_groups()
        .await
        .map_err(|e| map_geoserver_error(req_id.0, &e))?;
    Ok(Json(groups))
}

pub(super) async fn list_admin1_names(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state
        .geoserver
        .admin1_names()
        .await
        .map_err(|e| map_geoserver_error(req_id.0, &e))?;
    Ok(Json(names))
}

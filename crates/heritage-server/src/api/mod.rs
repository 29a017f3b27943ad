mod geoserver;
mod heritage;
mod search;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use heritage_geoserver::{GeoServerClient, GeoServerError};
use heritage_khs::{KhsClient, Resolver};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

/// Where and how much the free-text search scans.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub schema: String,
    pub row_limit: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub resolver: Arc<Resolver<KhsClient>>,
    pub geoserver: GeoServerClient,
    pub search: Arc<SearchSettings>,
}

impl AppState {
    #[must_use]
    pub fn new(
        pool: PgPool,
        resolver: Resolver<KhsClient>,
        geoserver: GeoServerClient,
        search: SearchSettings,
    ) -> Self {
        Self {
            pool,
            resolver: Arc::new(resolver),
            geoserver,
            search: Arc::new(search),
        }
    }

    pub(super) fn khs(&self) -> &KhsClient {
        self.resolver.source()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    ok: bool,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            request_id: request_id.into(),
        }
    }

    pub fn bad_request(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "bad_request", message)
    }

    pub fn upstream(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "upstream_error", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_geoserver_error(request_id: String, error: &GeoServerError) -> ApiError {
    match error {
        GeoServerError::InvalidPath(path) => {
            ApiError::bad_request(request_id, format!("invalid GeoServer path: {path}"))
        }
        GeoServerError::UnexpectedStatus { .. } => {
            tracing::warn!(error = %error, "GeoServer request failed");
            ApiError::upstream(request_id, format!("GeoServer {error}"))
        }
        _ => {
            tracing::warn!(error = %error, "GeoServer request failed");
            ApiError::upstream(request_id, "GeoServer request failed")
        }
    }
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/geoserver/{*path}", get(geoserver::proxy))
        .route("/api/layers", get(geoserver::list_layer_groups))
        .route("/api/admin1/names", get(geoserver::list_admin1_names))
        .route("/api/heritage/detail", get(heritage::get_detail))
        .route("/api/heritage/resolve", get(heritage::resolve))
        .route("/api/search/heritage", get(search::search_heritage))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors(cors_origins))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> Json<HealthData> {
    Json(HealthData { ok: true })
}

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use heritage_db::{DbError, SearchResponse};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub keyword: Option<String>,
}

pub(super) async fn search_heritage(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let keyword = query.keyword.as_deref().map(str::trim).unwrap_or_default();
    if keyword.is_empty() {
        return Err(ApiError::bad_request(req_id.0, "keyword is required"));
    }

    let response = heritage_db::search_heritage(
        &state.pool,
        &state.search.schema,
        keyword,
        state.search.row_limit,
    )
    .await
    .map_err(|e| map_db_error(req_id.0, &e))?;

    tracing::debug!(keyword, total = response.total, "heritage search");
    Ok(Json(response))
}

fn map_db_error(request_id: String, error: &DbError) -> ApiError {
    match error {
        DbError::EmptyKeyword => ApiError::bad_request(request_id, "keyword is required"),
        DbError::Sqlx(_) => {
            tracing::error!(error = %error, "database query failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use herblift_core::{SearchIntent, SearchResponse};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::AppState;

/// Raw query string. Everything stays a string so a bad `limit` or unknown
/// `condition` degrades to defaults instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchParams {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub brand: Option<String>,
    pub condition: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SearchParams {
    fn to_intent(&self) -> SearchIntent {
        SearchIntent::from_params(
            self.query.as_deref(),
            self.category.as_deref(),
            self.brand.as_deref(),
            self.condition.as_deref(),
            self.limit.as_deref(),
            self.offset.as_deref(),
        )
    }
}

/// `GET`/`POST /api/search`. Always answers 200; pipeline failures come back
/// as an empty result with `error` set.
pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Json<SearchResponse> {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::warn!(
                request_id = %req_id.0,
                error = %rejection,
                "unreadable query string, using defaults"
            );
            SearchParams::default()
        }
    };
    let intent = params.to_intent();

    match state.pipeline.run(&intent).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!(
                request_id = %req_id.0,
                kind = e.kind(),
                category = %intent.category_key,
                error = %e,
                "search failed"
            );
            Json(SearchResponse::degraded(e.to_string()))
        }
    }
}

//! News search proxy.

use crate::handlers::{api_error, require_str, HandlerResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
}

/// Proxy a news search upstream; repeats within five minutes come from
/// the in-memory cache
#[instrument(skip_all)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> HandlerResult<Json<serde_json::Value>> {
    let query = require_str(params.q, "q")?;
    let page = params.page.unwrap_or(1).max(1);

    let body = state.news.search(&query, page).await.map_err(api_error)?;
    Ok(Json(body))
}

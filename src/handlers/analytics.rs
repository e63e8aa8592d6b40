use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde_json::{Value, json};
use std::sync::Arc;
use crate::analytics::ViewCount;
use crate::auth::authenticate;
use crate::error::AppResult;
use crate::state::AppState;
use crate::store::PostRepository;

// Unique view counts for every tracked post
pub async fn all_view_counts_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> AppResult<Json<Value>>
where
    S: PostRepository + Send + Sync + 'static,
{
    authenticate(state.auth.as_ref(), &headers)?;
    Ok(Json(json!({ "analytics": state.views.all_view_counts() })))
}

pub async fn post_view_count_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Json<ViewCount>>
where
    S: PostRepository + Send + Sync + 'static,
{
    authenticate(state.auth.as_ref(), &headers)?;
    Ok(Json(state.views.view_count(&post_id)))
}

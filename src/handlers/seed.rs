use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use std::sync::Arc;
use crate::auth::authenticate;
use crate::error::AppResult;
use crate::models::SeedRequest;
use crate::seed::{DEFAULT_SEED_COUNT, seed_posts};
use crate::state::AppState;
use crate::store::PostRepository;

pub async fn seed_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    payload: Result<Json<SeedRequest>, JsonRejection>,
) -> AppResult<Json<Value>>
where
    S: PostRepository + Send + Sync + 'static,
{
    let principal = authenticate(state.auth.as_ref(), &headers)?;
    let Json(req) = payload?;
    let count = req.count.unwrap_or(DEFAULT_SEED_COUNT);

    let inserted = seed_posts(state.store.as_ref(), count, &principal.name).await?;

    Ok(Json(json!({
        "message": format!("Seeded {inserted} posts"),
        "inserted": inserted,
    })))
}

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::handlers::{
    all_view_counts_handler, create_post, delete_post, get_post, health_handler, list_posts,
    metrics_handler, post_view_count_handler, seed_handler, update_post,
};
use crate::middleware::{admit_writes, track_requests};
use crate::state::AppState;
use crate::store::PostRepository;

// All API routes sit behind admission control; health and metrics don't.
pub fn build_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: PostRepository + Send + Sync + 'static,
{
    let api = Router::new()
        .route("/posts", get(list_posts::<S>).post(create_post::<S>))
        .route(
            "/posts/{slug}",
            get(get_post::<S>).put(update_post::<S>).delete(delete_post::<S>),
        )
        .route("/analytics", get(all_view_counts_handler::<S>))
        .route("/analytics/{post_id}", get(post_view_count_handler::<S>))
        .route("/seed", post(seed_handler::<S>))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            admit_writes,
        ))
        .layer(middleware::from_fn(track_requests))
        .with_state(state);

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

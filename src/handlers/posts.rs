use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use crate::auth::authenticate;
use crate::client_ip::extract_client_ip;
use crate::error::{AppError, AppResult};
use crate::metrics::{TRACKED_POSTS, VIEWS_DUPLICATE, VIEWS_NEW};
use crate::models::{NewPost, Pagination, Post, PostList, PostPatch, PostQuery, generate_slug};
use crate::state::AppState;
use crate::store::PostRepository;

pub async fn list_posts<S>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<PostQuery>,
) -> AppResult<Json<PostList>>
where
    S: PostRepository + Send + Sync + 'static,
{
    let (posts, total) = state.store.list(&query).await?;
    let pagination = Pagination::new(&query, total);
    Ok(Json(PostList { posts, pagination }))
}

// Read a post. A view that is new for this client today bumps the
// stored counter; repeats leave it alone.
pub async fn get_post<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> AppResult<Json<Value>>
where
    S: PostRepository + Send + Sync + 'static,
{
    let mut post = state
        .store
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::PostNotFound)?;

    let client = extract_client_ip(&headers);
    let post_id = post.id.to_string();

    if state.views.track_view(&post_id, &client) {
        VIEWS_NEW.inc();
        TRACKED_POSTS.set(state.views.tracked_posts() as f64);
        if let Some(views) = state.store.increment_views(post.id).await? {
            post.views = views;
        }
    } else {
        VIEWS_DUPLICATE.inc();
    }

    Ok(Json(json!({ "post": post })))
}

pub async fn create_post<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    payload: Result<Json<NewPost>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)>
where
    S: PostRepository + Send + Sync + 'static,
{
    let principal = authenticate(state.auth.as_ref(), &headers)?;
    let Json(input) = payload?;

    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(AppError::InvalidInput("title and content are required".into()));
    }
    if generate_slug(&input.title).is_empty() {
        return Err(AppError::InvalidInput("title must contain letters or digits".into()));
    }

    let post = state
        .store
        .insert(Post::new(input, &principal.name, Utc::now()))
        .await?;
    tracing::info!(slug = %post.slug, author = %post.author, "post created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post created successfully", "post": post })),
    ))
}

pub async fn update_post<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<PostPatch>, JsonRejection>,
) -> AppResult<Json<Value>>
where
    S: PostRepository + Send + Sync + 'static,
{
    authenticate(state.auth.as_ref(), &headers)?;
    let Json(patch) = payload?;

    if !state.store.update_by_slug(&slug, patch).await? {
        return Err(AppError::PostNotFound);
    }
    tracing::info!(%slug, "post updated");

    Ok(Json(json!({ "message": "Post updated successfully" })))
}

pub async fn delete_post<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> AppResult<Json<Value>>
where
    S: PostRepository + Send + Sync + 'static,
{
    authenticate(state.auth.as_ref(), &headers)?;

    if !state.store.delete_by_slug(&slug).await? {
        return Err(AppError::PostNotFound);
    }
    tracing::info!(%slug, "post deleted");

    Ok(Json(json!({ "message": "Post deleted successfully" })))
}

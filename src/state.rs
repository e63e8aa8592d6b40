use std::sync::Arc;
use crate::analytics::ViewTracker;
use crate::auth::Authenticator;
use crate::rate_limit::RateLimiter;
use crate::store::PostRepository;

// app's shared state, built once in main and handed to every handler
pub struct AppState<S: PostRepository> {
    pub store: Arc<S>,
    pub rate_limiter: Arc<RateLimiter>, // shared with the cleanup task
    pub views: Arc<ViewTracker>,
    pub auth: Arc<dyn Authenticator>,
}

impl<S: PostRepository> AppState<S> {
    pub fn new(
        store: S,
        rate_limiter: Arc<RateLimiter>,
        views: Arc<ViewTracker>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            rate_limiter,
            views,
            auth,
        }
    }
}

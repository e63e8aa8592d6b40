use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

// Request-level failures. The rate limiter and view tracker never fail;
// these come from the boundary and storage collaborators.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Post not found")]
    PostNotFound,

    #[error("A post with this title already exists")]
    DuplicateSlug,

    #[error("Rate limit exceeded")]
    RateLimited { retry_after_secs: u64 },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingToken | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PostNotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateSlug => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Rate limit rejections are logged by the admission middleware, which
    // knows the client id.
    fn logged_on_response(&self) -> bool {
        !matches!(self, AppError::RateLimited { .. })
    }

    fn log(&self) {
        if !self.logged_on_response() {
            return;
        }
        match self {
            AppError::Storage(msg) => tracing::error!(message = %msg, "storage error"),
            AppError::InvalidToken => tracing::warn!("invalid bearer token"),
            _ => tracing::debug!(error = %self, "request failed"),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateSlug(_) => AppError::DuplicateSlug,
            StoreError::Unavailable(msg) => AppError::Storage(msg),
        }
    }
}

// Bad or missing request bodies get the same JSON error shape
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();

        match self {
            AppError::RateLimited { retry_after_secs } => {
                let body = Json(serde_json::json!({
                    "error": self.to_string(),
                    "retryAfter": retry_after_secs,
                }));
                let mut response = (status, body).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
            // don't leak storage details to clients
            AppError::Storage(_) => (
                status,
                Json(serde_json::json!({ "error": "Internal server error" })),
            )
                .into_response(),
            _ => (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response(),
        }
    }
}

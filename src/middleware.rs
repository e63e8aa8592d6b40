use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;
use crate::client_ip::extract_client_ip;
use crate::error::AppError;
use crate::metrics::{RATE_LIMITED, RATE_LIMIT_ENTRIES, REQUEST_LATENCY, REQUEST_TOTAL};
use crate::rate_limit::{RateLimiter, retry_after_secs};

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

// Admission control: every mutating request spends one unit of the
// client's quota before it reaches a handler. Reads pass through.
pub async fn admit_writes(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_mutating(req.method()) {
        let client = extract_client_ip(req.headers());

        let allowed = limiter.is_allowed(&client);
        RATE_LIMIT_ENTRIES.set(limiter.len() as f64);

        if !allowed {
            RATE_LIMITED.inc();
            let retry_after_secs = retry_after_secs(limiter.remaining_time(&client));
            tracing::warn!(
                %client,
                method = %req.method(),
                path = %req.uri().path(),
                retry_after_secs,
                "request rejected by rate limiter"
            );
            return Err(AppError::RateLimited { retry_after_secs });
        }
    }

    Ok(next.run(req).await)
}

// request count + latency for /metrics
pub async fn track_requests(req: Request, next: Next) -> Response {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let response = next.run(req).await;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    response
}

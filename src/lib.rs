pub mod analytics;
pub mod auth;
pub mod client_ip;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod router;
pub mod seed;
pub mod state;
pub mod store;
pub mod worker;

pub use analytics::{ViewCount, ViewTracker};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use router::build_router;
pub use state::AppState;

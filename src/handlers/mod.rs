mod analytics;
mod health;
mod metrics;
mod posts;
mod seed;

pub use analytics::{all_view_counts_handler, post_view_count_handler};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use seed::seed_handler;

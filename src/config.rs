use clap::Parser;
use std::time::Duration;
use crate::rate_limit::RateLimitConfig;

const MAX_WINDOW_SECS: u64 = 24 * 60 * 60;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "blog-gateway")]
#[command(about = "Blog API with per-IP write throttling and unique view analytics")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Max mutating requests per client per window
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub rate_limit: u32,

    // Rate limit window in seconds (up to one day)
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..=MAX_WINDOW_SECS))]
    pub rate_window: u64,

    // How often expired rate limit windows are swept (seconds)
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..=MAX_WINDOW_SECS))]
    pub cleanup_interval: u64,

    // Bearer token accepted for writes and analytics
    #[arg(long, env = "BLOG_API_TOKEN", default_value = "")]
    pub api_token: String,

    // Author name stamped on posts created with the token
    #[arg(long, default_value = "admin")]
    pub author: String,

    // Seed this many sample posts at startup
    #[arg(long)]
    pub seed: Option<usize>,
}

impl Args {
    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig::new(self.rate_limit, self.rate_window)
    }

    pub fn cleanup_every(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

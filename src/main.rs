use blog_gateway::{
    AppState, RateLimiter, ViewTracker, auth::StaticTokenAuthenticator, build_router,
    config::Args, seed::seed_posts, store::MemoryPostStore, worker::rate_limit_sweeper,
};
use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();

    if args.api_token.is_empty() {
        tracing::warn!("no API token configured; writes and analytics will be rejected");
    }

    // one instance of each for the life of the process
    let rate_limiter = Arc::new(RateLimiter::new(args.rate_limit_config()));
    let views = Arc::new(ViewTracker::new());
    let auth = Arc::new(StaticTokenAuthenticator::new(
        args.api_token.clone(),
        args.author.clone(),
    ));
    let store = MemoryPostStore::new();

    if let Some(count) = args.seed {
        seed_posts(&store, count, &args.author).await?;
    }

    let state = Arc::new(AppState::new(store, rate_limiter.clone(), views, auth));

    // spawn the background sweeper
    let sweeper = tokio::spawn(rate_limit_sweeper(rate_limiter, args.cleanup_every()));

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "blog gateway listening");
    tracing::info!(
        max_requests = args.rate_limit,
        window_secs = args.rate_window,
        "write rate limit"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

mod cache;
mod cli;
mod error;
mod routes;
mod upstream;

use std::{env, io, sync::Arc};

use tokio::{net::TcpListener, signal};

use crate::cache::TtlCache;
use crate::routes::AppState;
use crate::upstream::Upstream;

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "session_calendar_proxy=info,session_calendar=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = cli::parse(env::args().skip(1).collect());
    setup_logging();

    let upstream = Upstream::new(args.upstream.clone()).map_err(io::Error::other)?;
    let state = Arc::new(AppState {
        upstream,
        cache: TtlCache::new(cache::Config {
            enabled: args.enable_cache,
            ttl: args.cache_ttl,
        }),
        layout: args.layout,
    });

    let listener = TcpListener::bind(args.address).await?;
    log::info!(
        "Listening at http://{}, proxying {}",
        args.address,
        args.upstream
    );

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown())
        .await
}

async fn shutdown() {
    if let Err(err) = signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

//! mbtiled - a tile server for MBTiles map packages.
//!
//! This binary wires the components together and runs the HTTP server.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mbtiled::{
    cache::ByteCache,
    config::Config,
    mbtiles::Mbtiles,
    server::{create_router, AppState, RouterConfig},
    tile::TileResolver,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("configuration error: {e}");
        return ExitCode::FAILURE;
    }

    // validate() accepted the value, so this cannot fail
    let cache_bytes = match config.cache_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("server starting");

    let cache = Arc::new(ByteCache::new(cache_bytes));
    info!(max_size = cache_bytes, "created tile cache");

    // Fail fast on an unreadable package before taking requests.
    let vector = match load_package(&config.package).await {
        Ok(package) => package,
        Err(()) => return ExitCode::FAILURE,
    };

    let hillshade = match &config.hillshade {
        Some(path) => match load_package(path).await {
            Ok(package) => Some(package),
            Err(()) => return ExitCode::FAILURE,
        },
        None => None,
    };

    let state = AppState::new(
        TileResolver::new(vector, Arc::clone(&cache)),
        hillshade.map(|package| TileResolver::new(package, Arc::clone(&cache))),
        cache,
    );

    let mut router_config = RouterConfig::new().with_static_dir(&config.static_dir);
    if config.cors {
        info!("enabled CORS support");
        router_config = router_config.with_cors();
    }

    let router = create_router(state, router_config);

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind to {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(%addr, "server listening");

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }

    info!("server closed");
    ExitCode::SUCCESS
}

/// Open an MBTiles package and log its identity, or log why it failed.
async fn load_package(path: &std::path::Path) -> Result<Mbtiles, ()> {
    let package = match Mbtiles::open(path).await {
        Ok(package) => package,
        Err(e) => {
            error!("failed to open MBTiles package: {e}");
            return Err(());
        }
    };

    match package.metadata().await {
        Ok(metadata) => {
            info!(path = package.path(), %metadata, "loaded MBTiles package");
            Ok(package)
        }
        Err(e) => {
            error!("failed to read MBTiles metadata: {e}");
            Err(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "mbtiled=debug,tower_http=debug"
    } else {
        "mbtiled=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve when the process receives ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install ctrl-c handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received interrupt, closing server"),
        _ = terminate => info!("received terminate, closing server"),
    }
}

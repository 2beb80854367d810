//! Router assembly and middleware.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG, EXPIRES, LAST_MODIFIED};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::tile::TileDataSource;

use super::handlers::{
    font_handler, hillshade_tile_handler, named_hillshade_tile_handler,
    named_vector_tile_handler, status_handler, vector_tile_handler, AppState,
};
use super::metrics::Metrics;

const CLACKS_OVERHEAD: &str = "x-clacks-overhead";

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Whether to attach permissive CORS headers
    pub cors_enabled: bool,

    /// Root of the static web content (viewer page, styles, fonts); when
    /// unset, no static or font routes are registered
    pub static_dir: Option<PathBuf>,

    /// Whether to attach request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self {
            cors_enabled: false,
            static_dir: None,
            enable_tracing: true,
        }
    }

    pub fn with_cors(mut self) -> Self {
        self.cors_enabled = true;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Disable the request trace layer; useful in tests asserting on logs.
    pub fn without_tracing(mut self) -> Self {
        self.enable_tracing = false;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Assembly
// =============================================================================

/// Build the complete application router.
pub fn create_router<S: TileDataSource>(state: AppState<S>, config: RouterConfig) -> Router {
    let mut router = Router::new()
        .route("/status", get(status_handler::<S>))
        .route("/{z}/{x}/{y}/tile.mvt", get(vector_tile_handler::<S>))
        .route(
            "/{name}/{z}/{x}/{y}/tile.mvt",
            get(named_vector_tile_handler::<S>),
        )
        .route("/{z}/{x}/{y}/hs.png", get(hillshade_tile_handler::<S>))
        .route(
            "/{name}/{z}/{x}/{y}/hs.png",
            get(named_hillshade_tile_handler::<S>),
        );

    if let Some(static_dir) = &config.static_dir {
        let fonts_dir = static_dir.join("fonts");
        router = router
            .route(
                "/fonts/{stack}/{file}",
                get(move |path| font_handler(fonts_dir.clone(), path)),
            )
            .fallback_service(ServeDir::new(static_dir));
    }

    let mut router = router
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.metrics),
            record_metrics,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(CLACKS_OVERHEAD),
            HeaderValue::from_static("GNU Terry Pratchett"),
        ))
        .with_state(state);

    if config.enable_tracing {
        router = router.layer(TraceLayer::new_for_http());
    }

    if config.cors_enabled {
        router = router.layer(cors_layer());
    }

    router
}

/// Permissive CORS for browser map clients: any origin, the standard tile
/// headers allowed and exposed.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::DELETE,
            Method::PUT,
        ])
        .allow_headers([
            CONTENT_TYPE,
            CACHE_CONTROL,
            ETAG,
            EXPIRES,
            LAST_MODIFIED,
            CONTENT_LENGTH,
        ])
        .expose_headers([
            HeaderName::from_static(CLACKS_OVERHEAD),
            CACHE_CONTROL,
            ETAG,
            EXPIRES,
            LAST_MODIFIED,
        ])
}

/// Count every handled request against the shared [`Metrics`].
async fn record_metrics(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let response = next.run(request).await;
    metrics.record(&method, response.status().as_u16()).await;
    response
}

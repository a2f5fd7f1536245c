mod config;
mod proxy;

use std::path::{Path, PathBuf};

use axum::extract::State;
use axum::http::HeaderValue;
use axum::{response::Html, routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use config::Config;
use proxy::PhotosProxy;

#[derive(Clone)]
struct AppState {
    proxy: PhotosProxy,
    index_path: PathBuf,
}

impl axum::extract::FromRef<AppState> for PhotosProxy {
    fn from_ref(state: &AppState) -> Self {
        state.proxy.clone()
    }
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><title>Graffiti Map</title></head>
<body>
<h1>Graffiti Map</h1>
<p>Frontend not built yet. Run <code>dx build</code> in <code>crates/frontend</code>.</p>
</body>
</html>"#;

/// Build the full application router.
fn build_app(config: &Config) -> Router {
    // Static file routers are stateless; merge them before adding app state
    let static_files = Router::new()
        .nest(
            "/static",
            cached_static_router(&config.assets_dir, CACHE_1DAY),
        )
        .nest(
            "/dist",
            cached_static_router(&config.dist_dir, CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(&config.dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    let state = AppState {
        proxy: PhotosProxy::new(config.photos_upstream.clone()),
        index_path: config.dist_dir.join("index.html"),
    };

    Router::new()
        .route("/", get(serve_index))
        .route("/photos", get(proxy::search_photos))
        .with_state(state)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let app = build_app(&config);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        upstream = %config.photos_upstream,
        "Server running at http://localhost:{}",
        config.port
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn serve_index(State(state): State<AppState>) -> Html<String> {
    // Try to serve the built frontend, fall back to a simple message
    match tokio::fs::read_to_string(&state.index_path).await {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::debug!(path = %state.index_path.display(), error = %e, "index.html missing");
            Html(FALLBACK_INDEX.to_string())
        }
    }
}

use std::sync::Arc;

use axum::{http::Request, routing::get};
use axum_prometheus::PrometheusMetricLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use embed_server::config::Config;
use embed_server::relay::CatboxRelay;
use embed_server::state::AppState;

#[tokio::main]
async fn main() {
    // Config is loaded first so `.env` can supply APP_ENV and RUST_LOG.
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize tracing: JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("embed_server=info,tower_http=info"));

    if config.is_dev {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    }

    info!("🚀 Embed server starting...");
    info!(
        relay = %config.relay_url,
        upload_timeout_secs = config.upload_timeout.as_secs(),
        max_body_bytes = config.max_body_bytes,
        param_policy = ?config.param_policy,
        "configuration loaded"
    );

    let relay = CatboxRelay::new(
        config.relay_url.clone(),
        config.relay_userhash.clone(),
        config.upload_timeout,
    )
    .expect("Failed to build upload relay client");

    let app_state = AppState {
        relay: Arc::new(relay),
        param_policy: config.param_policy,
    };

    // Both endpoints are public and unauthenticated; any origin may call them.
    let cors = CorsLayer::permissive();

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = embed_server::router(app_state, config.max_body_bytes)
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(prometheus_layer)
        .layer(cors);

    let addr = config.server_addr();
    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}

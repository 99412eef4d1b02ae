pub mod request_id;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    health, transliteration::TransliterationController, tts::TtsController,
};
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the application router with all routes configured
pub fn create_router(
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
    transliteration_controller: Arc<TransliterationController>,
) -> Router {
    // `/api/tts` is the path the browser front-end calls; `/synthesize` is
    // the same handler under the short name
    let tts_routes = Router::new()
        .route("/api/tts", post(TtsController::synthesize))
        .route("/synthesize", post(TtsController::synthesize))
        .with_state(tts_controller);

    let transliteration_routes = Router::new()
        .route(
            "/api/transliterate",
            get(TransliterationController::transliterate),
        )
        .with_state(transliteration_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(config)
        .merge(tts_routes)
        .merge(transliteration_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server and serve until `shutdown` is cancelled
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}

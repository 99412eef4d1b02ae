use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use telugu_tts_relay::controllers::{transliteration::TransliterationController, tts::TtsController};
use telugu_tts_relay::domain::{transliteration::TransliterationService, tts::TtsService};
use telugu_tts_relay::infrastructure::config::{Config, LogFormat};
use telugu_tts_relay::infrastructure::http::{create_router, start_http_server};
use telugu_tts_relay::infrastructure::repositories::{
    GoogleInputToolsRepository, RunpodSettings, RunpodTtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Telugu TTS relay on {}:{}",
        config.host,
        config.port
    );

    tracing::info!(
        endpoint_id = %config.runpod_endpoint_id,
        submission_mode = config.submission_mode.as_str(),
        poll_interval_ms = config.poll_interval_ms,
        poll_max_attempts = config.poll_max_attempts,
        poll_budget_secs = config.poll_budget().as_secs(),
        "Provider configuration loaded"
    );

    if config.is_development() {
        tracing::debug!(base_url = %config.runpod_base_url, "Using provider base URL");
    }

    // One pooled client for every outbound call
    let http_client = reqwest::Client::builder()
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .build()?;

    let shutdown = CancellationToken::new();
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let tts_repo = Arc::new(RunpodTtsRepository::new(
        http_client.clone(),
        RunpodSettings::from_config(&config),
    ));
    let transliteration_repo = Arc::new(GoogleInputToolsRepository::new(
        http_client,
        config.transliteration_url.clone(),
        config.transliteration_input_tool.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ));

    // 2. Instantiate services (inject repositories)
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(TtsService::new(tts_repo, config.max_text_chars));
    let transliteration_service = Arc::new(TransliterationService::new(
        transliteration_repo,
        config.transliteration_cache_enabled,
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service, shutdown.clone()));
    let transliteration_controller =
        Arc::new(TransliterationController::new(transliteration_service));

    let app = create_router(config.clone(), tts_controller, transliteration_controller);

    tokio::spawn(cancel_on_signal(shutdown.clone()));

    // Start HTTP server with all routes
    start_http_server(config, app, shutdown).await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Cancel in-flight polling and stop accepting connections on Ctrl-C or SIGTERM
async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "telugu_tts_relay=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "telugu_tts_relay=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

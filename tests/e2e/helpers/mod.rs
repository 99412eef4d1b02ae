use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use telugu_tts_relay::infrastructure::config::Config;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;


use api_client::TestClient;
use mock_provider::{MockProvider, ENDPOINT_ID};

pub const TEST_API_KEY: &str = "test-runpod-key";

/// Poll settings used unless a test overrides them: 5 polls, 10ms apart
pub const TEST_POLL_INTERVAL_MS: &str = "10";
pub const TEST_POLL_MAX_ATTEMPTS: u32 = 5;

pub struct TestContext {
    pub client: TestClient,
    pub provider: MockProvider,
    pub shutdown: CancellationToken,
}

impl TestContext {
    /// Start a mock provider and the app wired against it
    pub async fn new() -> Result<Self> {
        Self::with_overrides(&[]).await
    }

    /// Same as `new`, with extra environment values taking precedence
    pub async fn with_overrides(overrides: &[(&str, &str)]) -> Result<Self> {
        let provider = MockProvider::start().await?;
        let config = test_config(&provider, overrides)?;
        let shutdown = CancellationToken::new();

        let app = create_app(config, shutdown.clone())?;

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}", addr);

        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
                .await
                .ok();
        });

        Ok(Self {
            client: TestClient::new(&base_url),
            provider,
            shutdown,
        })
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            TestContext::new()
                .await
                .expect("Failed to start test context")
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async move {
            self.shutdown.cancel();
        }
    }
}

pub fn test_config(provider: &MockProvider, overrides: &[(&str, &str)]) -> Result<Config> {
    let base_url = provider.base_url();
    let transliteration_url = provider.transliteration_url();
    let max_attempts = TEST_POLL_MAX_ATTEMPTS.to_string();

    // Overrides come first so `find` picks them over the defaults
    let mut pairs: Vec<(&str, &str)> = overrides.to_vec();
    pairs.extend([
        ("HOST", "127.0.0.1"),
        ("PORT", "0"),
        ("RUNPOD_BASE_URL", base_url.as_str()),
        ("RUNPOD_ENDPOINT_ID", ENDPOINT_ID),
        ("RUNPOD_API_KEY", TEST_API_KEY),
        ("TTS_SYNC_TIMEOUT_SECS", "1"),
        ("TTS_REQUEST_TIMEOUT_SECS", "2"),
        ("TTS_POLL_INTERVAL_MS", TEST_POLL_INTERVAL_MS),
        ("TTS_POLL_MAX_ATTEMPTS", max_attempts.as_str()),
        ("TTS_MAX_TEXT_CHARS", "200"),
        ("TRANSLITERATION_URL", transliteration_url.as_str()),
    ]);

    Ok(Config::from_lookup(|key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })?)
}

/// Same wiring as `main`, against the given configuration
fn create_app(config: Config, shutdown: CancellationToken) -> Result<Router> {
    use telugu_tts_relay::{
        controllers::{transliteration::TransliterationController, tts::TtsController},
        domain::{transliteration::TransliterationService, tts::TtsService},
        infrastructure::{
            http::create_router,
            repositories::{GoogleInputToolsRepository, RunpodSettings, RunpodTtsRepository},
        },
    };

    let http_client = reqwest::Client::builder().build()?;
    let config = Arc::new(config);

    // Instantiate repositories
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

    // Instantiate services
    let tts_service = Arc::new(TtsService::new(tts_repo, config.max_text_chars));
    let transliteration_service = Arc::new(TransliterationService::new(
        transliteration_repo,
        config.transliteration_cache_enabled,
    ));

    // Instantiate controllers
    let tts_controller = Arc::new(TtsController::new(tts_service, shutdown));
    let transliteration_controller =
        Arc::new(TransliterationController::new(transliteration_service));

    Ok(create_router(
        config,
        tts_controller,
        transliteration_controller,
    ))
}

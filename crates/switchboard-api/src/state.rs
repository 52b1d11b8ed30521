//! Application state wiring all services together.
//!
//! AppState holds the concrete router used by both the CLI and the REST
//! API. Core types are generic over their ports; AppState pins them to the
//! infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use switchboard_core::dispatch::Dispatcher;
use switchboard_core::handler::BoxHandler;
use switchboard_core::handler::music::MusicHandler;
use switchboard_core::handler::news::NewsHandler;
use switchboard_core::handler::qa::QaHandler;
use switchboard_core::handler::reminder::ReminderHandler;
use switchboard_core::intent::IntentClassifier;
use switchboard_core::llm::box_provider::BoxLlmProvider;
use switchboard_core::router::MessageRouter;
use switchboard_infra::calendar::GoogleCalendarClient;
use switchboard_infra::config::{load_config, resolve_data_dir};
use switchboard_infra::http::build_client;
use switchboard_infra::llm::create_provider;
use switchboard_infra::music::{LastFmClient, SpotifyClient};
use switchboard_infra::news::NewsApiClient;
use switchboard_infra::secret::{EnvSecretProvider, LASTFM_API_KEY, NEWS_API_KEY};
use switchboard_infra::sqlite::conversation::SqliteConversationStore;
use switchboard_infra::sqlite::pool::DatabasePool;
use switchboard_types::config::AppConfig;

/// The router pinned to the SQLite store.
pub type ConcreteRouter = MessageRouter<SqliteConversationStore>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ConcreteRouter>,
    /// The text model shared by the classifier and every handler.
    pub llm: Arc<BoxLlmProvider>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    pub provider_name: String,
}

impl AppState {
    /// Initialize the application state from the environment: data
    /// directory, `config.toml` and credential variables.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;
        Self::open(data_dir, config, &EnvSecretProvider::new()).await
    }

    /// Open the database under `data_dir` and wire every handler.
    pub async fn open(
        data_dir: PathBuf,
        config: AppConfig,
        secrets: &EnvSecretProvider,
    ) -> anyhow::Result<Self> {
        let pool = DatabasePool::open_in(&data_dir)
            .await
            .context("failed to open conversation database")?;
        let store = Arc::new(SqliteConversationStore::new(pool));

        let llm = Arc::new(create_provider(&config.llm, secrets)?);
        let router = build_router(store, llm.clone(), &config, secrets)?;

        Ok(Self {
            router: Arc::new(router),
            llm,
            provider_name: config.llm.provider.to_string(),
            config: Arc::new(config),
            data_dir,
        })
    }
}

#[cfg(test)]
impl AppState {
    /// State over a temp directory, no credentials, and a text model that
    /// cannot be reached, so every model call takes its fallback path.
    pub async fn for_tests(data_dir: &std::path::Path) -> Self {
        let mut config = AppConfig::default();
        config.llm.base_url = Some("http://127.0.0.1:9".to_string());
        config.llm.timeout_secs = 2;
        config.router.classifier_timeout_secs = 2;
        let secrets = EnvSecretProvider::from_map(std::collections::HashMap::new());
        Self::open(data_dir.to_path_buf(), config, &secrets)
            .await
            .unwrap()
    }
}

/// Wire handlers, dispatcher and classifier around `store`.
fn build_router(
    store: Arc<SqliteConversationStore>,
    llm: Arc<BoxLlmProvider>,
    config: &AppConfig,
    secrets: &EnvSecretProvider,
) -> anyhow::Result<ConcreteRouter> {
    let http = build_client(Duration::from_secs(config.http_timeout_secs))
        .context("failed to build HTTP client")?;

    let news = NewsHandler::new(
        llm.clone(),
        NewsApiClient::new(http.clone(), secrets.get(NEWS_API_KEY), &config.news),
    )
    .with_fallback_topic(config.news.fallback_topic.clone());

    let music = MusicHandler::new(
        llm.clone(),
        SpotifyClient::new(
            http.clone(),
            SpotifyClient::credentials_from(secrets),
            &config.music,
        ),
        LastFmClient::new(http.clone(), secrets.get(LASTFM_API_KEY)),
    )
    .with_mood_track_limit(config.music.mood_track_limit);

    let reminder = Arc::new(
        ReminderHandler::new(
            llm.clone(),
            GoogleCalendarClient::new(
                http,
                GoogleCalendarClient::credentials_from(secrets),
                &config.calendar,
            ),
        )
        .with_time_zone(config.calendar.time_zone.clone()),
    );

    let qa = QaHandler::new(llm.clone(), reminder.clone()).with_temperature(config.llm.temperature);

    let dispatcher = Dispatcher::new(
        BoxHandler::new(news),
        BoxHandler::new(music),
        BoxHandler::new(reminder),
        BoxHandler::new(qa),
    );
    let classifier = IntentClassifier::from_config(llm, &config.router);

    Ok(MessageRouter::from_config(
        store,
        classifier,
        dispatcher,
        &config.router,
    ))
}

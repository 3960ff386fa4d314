//! Runtime services and shared state for the marong-bot.

use std::{future::Future, sync::Arc};

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::{reaper, router::Router},
    service::{chat::ChatClient, db::DbClient, llm::LlmClient, with_timeout},
    state::SessionState,
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the service clients, the session state,
/// and the intent router.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The pairing store client instance.
    pub db: DbClient,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The chat client instance.
    pub chat: ChatClient,
    /// Channel allow-list, activity, pauses, and conversation history.
    pub state: SessionState,
    /// The intent router.
    pub router: Arc<Router>,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the database.
        let db = DbClient::surreal(&config).await?;

        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        // Initialize the session state and the router.
        let state = SessionState::from_config(&config);
        let router = Arc::new(Router::new(&config));

        // Initialize the discord client.
        let chat = ChatClient::discord(&config, db.clone(), llm.clone(), state.clone(), router.clone()).await?;

        Ok(Self { config, db, llm, chat, state, router })
    }

    /// Run the idle reaper alongside the chat listener until the listener stops.
    pub async fn start(&self) -> Void {
        let reaper = tokio::spawn(reaper::run_reaper(self.clone()));

        info!("Idle reaper started (every {}s).", self.config.reaper_interval_secs);

        let result = self.chat.start().await;

        reaper.abort();

        result
    }

    /// Bound an external call by the configured timeout.
    pub async fn bounded<T, F>(&self, label: &'static str, future: F) -> Res<T>
    where
        F: Future<Output = Res<T>>,
    {
        with_timeout(label, self.config.external_call_timeout(), future).await
    }
}

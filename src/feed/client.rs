use std::future::Future;

use tracing::info;

use super::error::FeedResult;
use super::handler::FeedHandler;
use super::network::NetworkClient;
use super::prompt::PromptInput;
use super::simulated::SimulatedClient;
use super::subscription::Subscription;
use super::types::{BlockedEventsPage, CheckResult};
use crate::config::FeedConfig;

/// The three operations the dashboard consumes.
pub trait EventFeedClient {
    /// Newest-first history, at most `limit` items (100 when `None`).
    fn fetch_recent_events(
        &self,
        limit: Option<usize>,
    ) -> impl Future<Output = FeedResult<BlockedEventsPage>> + Send;

    /// Opens a live subscription. Returns immediately; must be called from
    /// inside a tokio runtime.
    fn subscribe<H: FeedHandler>(&self, handler: H) -> Subscription;

    /// Evaluates one validated prompt. A blocking verdict may record a new
    /// event as a side effect.
    fn check_prompt(
        &self,
        prompt: &PromptInput,
    ) -> impl Future<Output = FeedResult<CheckResult>> + Send;
}

/// Backend chosen once at startup.
#[derive(Debug, Clone)]
pub enum FeedClient {
    Simulated(SimulatedClient),
    Network(NetworkClient),
}

impl FeedClient {
    pub fn from_config(config: &FeedConfig) -> FeedResult<Self> {
        if config.use_mock {
            info!("Feed client: simulated mode");
            Ok(FeedClient::Simulated(SimulatedClient::new(config.simulator.clone())))
        } else {
            info!("Feed client: network mode ({})", config.base_url);
            Ok(FeedClient::Network(NetworkClient::new(config)?))
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            FeedClient::Simulated(_) => "simulated",
            FeedClient::Network(_) => "network",
        }
    }
}

impl EventFeedClient for FeedClient {
    async fn fetch_recent_events(&self, limit: Option<usize>) -> FeedResult<BlockedEventsPage> {
        match self {
            FeedClient::Simulated(client) => client.fetch_recent_events(limit).await,
            FeedClient::Network(client) => client.fetch_recent_events(limit).await,
        }
    }

    fn subscribe<H: FeedHandler>(&self, handler: H) -> Subscription {
        match self {
            FeedClient::Simulated(client) => client.subscribe(handler),
            FeedClient::Network(client) => client.subscribe(handler),
        }
    }

    async fn check_prompt(&self, prompt: &PromptInput) -> FeedResult<CheckResult> {
        match self {
            FeedClient::Simulated(client) => client.check_prompt(prompt).await,
            FeedClient::Network(client) => client.check_prompt(prompt).await,
        }
    }
}

use std::time::Duration;

use crate::feed::error::FeedError;

pub const ENV_USE_MOCK: &str = "SENTINEL_USE_MOCK";
pub const ENV_BASE_URL: &str = "SENTINEL_API_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "SENTINEL_TIMEOUT_MS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Tuning of the self-contained simulated backend.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Period of the blocked-event generator.
    pub tick_interval: Duration,
    /// Fake connection-establishment delay before `on_open`.
    pub open_delay: Duration,
    /// Seed the buffer with a couple of historical events.
    pub seed_history: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(3000),
            open_delay: Duration::from_millis(100),
            seed_history: true,
        }
    }
}

/// Read once at process start; decides which backend the feed client uses.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub use_mock: bool,
    pub base_url: String,
    pub request_timeout: Duration,
    pub simulator: SimulatorConfig,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            use_mock: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Result<Self, FeedError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Missing keys fall back
    /// to defaults; simulated mode is on unless the flag is anything but `true`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(flag) = lookup(ENV_USE_MOCK) {
            config.use_mock = flag.trim() == "true";
        }

        if let Some(url) = lookup(ENV_BASE_URL) {
            let url = url.trim();
            if !url.is_empty() {
                config.base_url = url.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                FeedError::Config(format!("{ENV_TIMEOUT_MS} must be milliseconds, got '{raw}'"))
            })?;
            if ms == 0 {
                return Err(FeedError::Config(format!("{ENV_TIMEOUT_MS} must be positive")));
            }
            config.request_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn simulated() -> Self {
        Self::default()
    }

    pub fn network(base_url: impl Into<String>) -> Self {
        Self {
            use_mock: false,
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_simulator(mut self, simulator: SimulatorConfig) -> Self {
        self.simulator = simulator;
        self
    }

    /// Base URL with trailing slashes stripped, ready for path joins.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

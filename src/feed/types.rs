use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on the stored prompt text, in characters.
pub const MAX_SNIPPET_CHARS: usize = 400;

/// Limit used by `fetch_recent_events` when the caller passes none.
pub const DEFAULT_FETCH_LIMIT: usize = 100;

/// Where a blocked event was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventOrigin {
    /// History seeded into the simulated buffer at startup.
    Seed,
    /// Periodic generator behind a simulated subscription.
    Simulator,
    /// Interactive prompt check that blocked.
    Tester,
    /// The live gateway. Unknown origin tags land here too.
    #[default]
    Gateway,
}

impl EventOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventOrigin::Seed => "mock",
            EventOrigin::Simulator => "simulator",
            EventOrigin::Tester => "tester-mock",
            EventOrigin::Gateway => "gateway",
        }
    }
}

impl From<String> for EventOrigin {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "mock" => EventOrigin::Seed,
            "simulator" => EventOrigin::Simulator,
            "tester-mock" => EventOrigin::Tester,
            _ => EventOrigin::Gateway,
        }
    }
}

impl From<EventOrigin> for String {
    fn from(origin: EventOrigin) -> Self {
        origin.as_str().to_string()
    }
}

/// One rejected prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedEvent {
    pub id: u64,
    #[serde(rename = "ts", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub prompt_snippet: String,
    pub reason: String,
    #[serde(default)]
    pub source: EventOrigin,
}

impl BlockedEvent {
    /// Builds an event stamped with the current time. The prompt text is cut
    /// down to `MAX_SNIPPET_CHARS`.
    pub fn new(id: u64, prompt: &str, reason: impl Into<String>, source: EventOrigin) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            prompt_snippet: snippet(prompt),
            reason: reason.into(),
            source,
        }
    }
}

/// Truncates on a char boundary.
pub fn snippet(prompt: &str) -> String {
    match prompt.char_indices().nth(MAX_SNIPPET_CHARS) {
        Some((cut, _)) => prompt[..cut].to_string(),
        None => prompt.to_string(),
    }
}

/// Result container of a history fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockedEventsPage {
    #[serde(default)]
    pub items: Vec<BlockedEvent>,
}

/// Outcome of a synchronous prompt evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CheckResult {
    pub fn allowed() -> Self {
        Self { allowed: true, reason: None, details: None }
    }

    pub fn blocked(reason: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            details,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct CheckRequest<'a> {
    pub prompt: &'a str,
}

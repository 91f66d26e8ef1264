use std::collections::VecDeque;
use std::fmt::Write;

use crate::feed::buffer::BUFFER_CAPACITY;
use crate::feed::error::FeedError;
use crate::feed::handler::FeedMessage;
use crate::feed::types::{BlockedEvent, BlockedEventsPage};

pub const LOADING_TEXT: &str = "Loading recent blocked prompts…";
pub const EMPTY_TEXT: &str = "No blocked prompts yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
        }
    }
}

/// State behind the live blocked-prompts page.
///
/// Items are newest-first and capped like the backing buffer. A failed fetch
/// leaves the list empty with an error set; a subscription error only flips
/// the status, it never clears what was already shown.
#[derive(Debug)]
pub struct FeedView {
    items: VecDeque<BlockedEvent>,
    capacity: usize,
    loading: bool,
    status: ConnectionStatus,
    last_error: Option<String>,
}

impl Default for FeedView {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedView {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            capacity: BUFFER_CAPACITY,
            loading: true,
            status: ConnectionStatus::Disconnected,
            last_error: None,
        }
    }

    /// History arrived. Live events received while loading stay in front.
    pub fn apply_page(&mut self, page: BlockedEventsPage) {
        for event in page.items {
            if self.items.iter().any(|e| e.id == event.id) {
                continue;
            }
            self.items.push_back(event);
        }
        self.items.truncate(self.capacity);
        self.loading = false;
    }

    pub fn apply_fetch_error(&mut self, error: &FeedError) {
        self.loading = false;
        self.last_error = Some(error.to_string());
    }

    /// Folds one subscription message into the view.
    pub fn apply(&mut self, message: FeedMessage) {
        match message {
            FeedMessage::Open => self.status = ConnectionStatus::Connected,
            FeedMessage::Event(event) => {
                self.items.push_front(event);
                self.items.truncate(self.capacity);
            }
            FeedMessage::Error(FeedError::MalformedPayload(e)) => {
                self.last_error = Some(format!("dropped malformed event: {e}"));
            }
            FeedMessage::Error(error) => {
                self.status = ConnectionStatus::Disconnected;
                self.last_error = Some(error.to_string());
            }
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &BlockedEvent> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status_line(&self) -> String {
        format!("Stream status: {}", self.status.as_str())
    }

    /// Whole page as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.status_line());
        if let Some(error) = &self.last_error {
            let _ = writeln!(out, "Error: {error}");
        }
        if self.loading {
            let _ = writeln!(out, "{LOADING_TEXT}");
        } else if self.items.is_empty() {
            let _ = writeln!(out, "{EMPTY_TEXT}");
        }
        for event in &self.items {
            let _ = writeln!(out, "{}", render_row(event));
        }
        out
    }
}

/// One feed row: time, snippet, reason, then origin and id.
pub fn render_row(event: &BlockedEvent) -> String {
    let snippet = if event.prompt_snippet.is_empty() {
        "(no snippet)"
    } else {
        event.prompt_snippet.as_str()
    };
    let reason = if event.reason.is_empty() {
        "blocked"
    } else {
        event.reason.as_str()
    };
    format!(
        "[{}] {} | Reason: {} | Source: {} | ID: {}",
        event.timestamp.to_rfc3339(),
        snippet,
        reason,
        event.source.as_str(),
        event.id
    )
}

//! Blocked-prompt event feed: history, live subscription and prompt checks,
//! served either by an in-memory simulator or by the gateway over HTTP.

pub mod buffer;
pub mod client;
pub mod error;
pub mod handler;
pub mod network;
pub mod prompt;
pub mod simulated;
pub mod sse;
pub mod subscription;
pub mod types;

pub use buffer::{EventBuffer, BUFFER_CAPACITY};
pub use client::{EventFeedClient, FeedClient};
pub use error::{FeedError, FeedResult, TransportError};
pub use handler::{Callbacks, ChannelHandler, FeedHandler, FeedMessage};
pub use network::NetworkClient;
pub use prompt::{DenyList, PromptInput, DENY_LIST};
pub use simulated::SimulatedClient;
pub use subscription::{Subscription, SubscriptionGraph, SubscriptionRequest, SubscriptionState};
pub use types::{BlockedEvent, BlockedEventsPage, CheckResult, EventOrigin};

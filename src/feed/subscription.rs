use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::FeedError;
use super::handler::FeedHandler;
use super::types::BlockedEvent;

/// Lifecycle of one live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubscriptionState {
    #[default]
    Idle,
    Connecting,
    Open,
    /// Transport failed. No reconnect happens at this layer.
    Errored,
    /// Terminal. A new subscription has to be opened.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionRequest {
    Connect,
    Established,
    TransportFailed,
    Close,
}

pub struct SubscriptionGraph;

impl SubscriptionGraph {
    /// Pure function: (current state, request) -> next state.
    /// Returns None if the request does not apply in `current`.
    pub fn transition(
        current: SubscriptionState,
        request: SubscriptionRequest,
    ) -> Option<SubscriptionState> {
        use SubscriptionRequest::*;
        use SubscriptionState::*;

        match (current, request) {
            (Closed, _) => None,
            (Idle, Connect) => Some(Connecting),
            (Connecting, Established) => Some(Open),
            (Connecting, TransportFailed) | (Open, TransportFailed) => Some(Errored),
            (_, Close) => Some(Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SubscriptionCore {
    state: Mutex<SubscriptionState>,
}

impl SubscriptionCore {
    fn lock(&self) -> MutexGuard<'_, SubscriptionState> {
        // The guarded value is a plain enum; a panic elsewhere cannot leave it half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn state(&self) -> SubscriptionState {
        *self.lock()
    }

    /// Applies `request` atomically. Returns the new state if it changed.
    pub(crate) fn apply(&self, request: SubscriptionRequest) -> Option<SubscriptionState> {
        let mut state = self.lock();
        let next = SubscriptionGraph::transition(*state, request)?;
        debug!("Subscription {:?} -> {:?}", *state, next);
        *state = next;
        Some(next)
    }
}

/// Delivery side of a subscription: the only path from a background task to
/// the caller's handler. Every callback is gated on the current state.
pub(crate) struct Delivery<H> {
    core: Arc<SubscriptionCore>,
    handler: H,
}

impl<H: FeedHandler> Delivery<H> {
    /// `Connecting -> Open`, firing `on_open`. False if the subscription is
    /// no longer connecting.
    pub(crate) fn open(&mut self) -> bool {
        match self.core.apply(SubscriptionRequest::Established) {
            Some(_) => {
                self.handler.on_open();
                true
            }
            None => false,
        }
    }

    /// Delivers one event. False once the subscription is closed or errored.
    pub(crate) fn event(&mut self, event: BlockedEvent) -> bool {
        if self.core.state() != SubscriptionState::Open {
            return false;
        }
        self.handler.on_event(event);
        true
    }

    /// Reports a non-fatal problem (dropped payload) without changing state.
    pub(crate) fn report(&mut self, error: FeedError) {
        if matches!(
            self.core.state(),
            SubscriptionState::Connecting | SubscriptionState::Open
        ) {
            self.handler.on_error(error);
        }
    }

    /// Moves to `Errored` and fires `on_error`.
    pub(crate) fn fail(&mut self, error: FeedError) {
        if self.core.apply(SubscriptionRequest::TransportFailed).is_some() {
            warn!("Subscription errored: {}", error);
            self.handler.on_error(error);
        }
    }
}

/// Handle to a live subscription. Dropping it closes the subscription.
#[derive(Debug)]
pub struct Subscription {
    core: Arc<SubscriptionCore>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Moves a fresh subscription to `Connecting` and spawns its delivery
    /// task on the current tokio runtime.
    pub(crate) fn spawn<H, F, Fut>(handler: H, run: F) -> Self
    where
        H: FeedHandler,
        F: FnOnce(Delivery<H>, CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let core = Arc::new(SubscriptionCore::default());
        core.apply(SubscriptionRequest::Connect);

        let cancel = CancellationToken::new();
        let delivery = Delivery {
            core: core.clone(),
            handler,
        };
        let task = tokio::spawn(run(delivery, cancel.clone()));

        Self { core, cancel, task }
    }

    /// Stops delivery and releases the background task. Safe to call more
    /// than once; only the first call does anything.
    pub fn close(&self) {
        if self.core.apply(SubscriptionRequest::Close).is_none() {
            return;
        }
        self.cancel.cancel();
        self.task.abort();
        info!("Subscription closed");
    }

    pub fn state(&self) -> SubscriptionState {
        self.core.state()
    }

    pub fn is_closed(&self) -> bool {
        self.state() == SubscriptionState::Closed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

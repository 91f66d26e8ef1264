use tokio::sync::mpsc;

use super::error::FeedError;
use super::types::BlockedEvent;

/// Receiver side of a live subscription.
///
/// Calls for one subscription never overlap: they all run on that
/// subscription's delivery task, in the order the events were produced.
pub trait FeedHandler: Send + 'static {
    fn on_event(&mut self, event: BlockedEvent);

    fn on_open(&mut self) {}

    fn on_error(&mut self, _error: FeedError) {}
}

/// Closure-backed handler.
///
/// ```ignore
/// let handler = Callbacks::new(|ev| println!("{}", ev.id))
///     .with_open(|| println!("connected"))
///     .with_error(|err| eprintln!("{err}"));
/// ```
pub struct Callbacks<E, O = fn(), R = fn(FeedError)> {
    on_event: E,
    on_open: O,
    on_error: R,
}

impl<E> Callbacks<E>
where
    E: FnMut(BlockedEvent) + Send + 'static,
{
    pub fn new(on_event: E) -> Self {
        Self {
            on_event,
            on_open: noop_open,
            on_error: noop_error,
        }
    }
}

fn noop_open() {}

fn noop_error(_error: FeedError) {}

impl<E, O, R> Callbacks<E, O, R> {
    pub fn with_open<O2>(self, on_open: O2) -> Callbacks<E, O2, R>
    where
        O2: FnMut() + Send + 'static,
    {
        Callbacks {
            on_event: self.on_event,
            on_open,
            on_error: self.on_error,
        }
    }

    pub fn with_error<R2>(self, on_error: R2) -> Callbacks<E, O, R2>
    where
        R2: FnMut(FeedError) + Send + 'static,
    {
        Callbacks {
            on_event: self.on_event,
            on_open: self.on_open,
            on_error,
        }
    }
}

impl<E, O, R> FeedHandler for Callbacks<E, O, R>
where
    E: FnMut(BlockedEvent) + Send + 'static,
    O: FnMut() + Send + 'static,
    R: FnMut(FeedError) + Send + 'static,
{
    fn on_event(&mut self, event: BlockedEvent) {
        (self.on_event)(event)
    }

    fn on_open(&mut self) {
        (self.on_open)()
    }

    fn on_error(&mut self, error: FeedError) {
        (self.on_error)(error)
    }
}

/// Everything a subscription can report, as one value.
#[derive(Debug)]
pub enum FeedMessage {
    Open,
    Event(BlockedEvent),
    Error(FeedError),
}

/// Forwards callbacks into an mpsc channel so an async loop can consume them.
#[derive(Debug, Clone)]
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<FeedMessage>,
}

impl ChannelHandler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FeedMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, message: FeedMessage) {
        // Receiver gone means nobody is listening anymore.
        if self.tx.send(message).is_err() {
            tracing::debug!("Feed receiver dropped; message discarded");
        }
    }
}

impl FeedHandler for ChannelHandler {
    fn on_event(&mut self, event: BlockedEvent) {
        self.forward(FeedMessage::Event(event));
    }

    fn on_open(&mut self) {
        self.forward(FeedMessage::Open);
    }

    fn on_error(&mut self, error: FeedError) {
        self.forward(FeedMessage::Error(error));
    }
}

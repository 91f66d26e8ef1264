use std::time::Duration;

use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::client::EventFeedClient;
use super::error::{FeedError, FeedResult, TransportError};
use super::handler::FeedHandler;
use super::prompt::PromptInput;
use super::sse::SseDecoder;
use super::subscription::{Delivery, Subscription};
use super::types::{
    BlockedEvent, BlockedEventsPage, CheckRequest, CheckResult, DEFAULT_FETCH_LIMIT,
};
use crate::config::FeedConfig;

/// Gateway-backed client. Every failure surfaces to the caller as-is; there
/// is no retry at this layer.
#[derive(Debug, Clone)]
pub struct NetworkClient {
    http: Client,
    events_url: String,
    stream_url: String,
    check_url: String,
    timeout: Duration,
}

impl NetworkClient {
    pub fn new(config: &FeedConfig) -> FeedResult<Self> {
        // The request timeout is applied per call; a client-wide one would
        // also cut the long-lived event stream.
        let http = Client::builder()
            .connect_timeout(config.request_timeout)
            .build()
            .map_err(|e| FeedError::Config(format!("http client: {e}")))?;

        Ok(Self {
            http,
            events_url: config.endpoint("events/blocked"),
            stream_url: config.endpoint("events/stream"),
            check_url: config.endpoint("prompts/check"),
            timeout: config.request_timeout,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> FeedResult<T> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Gateway error: {}", status);
            return Err(TransportError::Status(status).into());
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;
        Ok(body)
    }
}

impl EventFeedClient for NetworkClient {
    async fn fetch_recent_events(&self, limit: Option<usize>) -> FeedResult<BlockedEventsPage> {
        let limit = limit.unwrap_or(DEFAULT_FETCH_LIMIT);
        let request = self.http.get(&self.events_url).query(&[("limit", limit)]);
        let mut page: BlockedEventsPage = self.send_json(request).await?;
        // A server that ignores the limit still must not overflow the caller.
        page.items.truncate(limit);
        Ok(page)
    }

    fn subscribe<H: FeedHandler>(&self, handler: H) -> Subscription {
        let http = self.http.clone();
        let url = self.stream_url.clone();

        Subscription::spawn(handler, move |mut delivery, cancel| async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = run_stream(&http, &url, &mut delivery) => {}
            }
        })
    }

    async fn check_prompt(&self, prompt: &PromptInput) -> FeedResult<CheckResult> {
        let request = self.http.post(&self.check_url).json(&CheckRequest {
            prompt: prompt.as_str(),
        });
        self.send_json(request).await
    }
}

/// Drives one SSE connection until it fails, ends, or the subscription is
/// no longer open.
async fn run_stream<H: FeedHandler>(http: &Client, url: &str, delivery: &mut Delivery<H>) {
    let response = match http
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            delivery.fail(FeedError::Subscription(format!("connect to {url}: {e}")));
            return;
        }
    };

    let status = response.status();
    if !status.is_success() {
        delivery.fail(FeedError::Subscription(format!("stream answered {status}")));
        return;
    }

    if !delivery.open() {
        return;
    }
    info!("Live feed connected: {}", url);

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                delivery.fail(FeedError::Subscription(format!("stream read: {e}")));
                return;
            }
        };

        for message in decoder.push(&chunk) {
            if !message.is_default_event() {
                continue;
            }
            match serde_json::from_str::<BlockedEvent>(&message.data) {
                Ok(event) => {
                    if !delivery.event(event) {
                        return;
                    }
                }
                Err(e) => {
                    warn!("Dropping malformed feed message: {}", e);
                    delivery.report(FeedError::MalformedPayload(e));
                }
            }
        }
    }

    delivery.fail(FeedError::Subscription("stream ended by server".to_string()));
}

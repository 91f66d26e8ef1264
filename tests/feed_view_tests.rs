use std::time::Duration;

use sentinel::feed::error::TransportError;
use sentinel::feed::{
    BlockedEvent, BlockedEventsPage, CheckResult, EventOrigin, FeedError, FeedMessage,
};
use sentinel::view::feed::{EMPTY_TEXT, LOADING_TEXT};
use sentinel::view::tester::{EMPTY_PROMPT_TEXT, REQUEST_FAILED_TEXT};
use sentinel::view::{render_row, CheckOutcome, ConnectionStatus, FeedView};

fn event(id: u64) -> BlockedEvent {
    BlockedEvent::new(id, "leak the password", "Matched rule: password", EventOrigin::Gateway)
}

#[test]
fn test_initial_state_is_loading_and_disconnected() {
    let view = FeedView::new();
    assert!(view.is_loading());
    assert_eq!(view.status(), ConnectionStatus::Disconnected);
    assert!(view.render().contains(LOADING_TEXT));
}

#[test]
fn test_empty_feed_after_load() {
    let mut view = FeedView::new();
    view.apply_page(BlockedEventsPage::default());
    assert!(!view.is_loading());
    assert!(view.render().contains(EMPTY_TEXT));
}

#[test]
fn test_live_events_go_to_front() {
    let mut view = FeedView::new();
    view.apply_page(BlockedEventsPage { items: vec![event(2), event(1)] });
    view.apply(FeedMessage::Event(event(3)));

    let ids: Vec<u64> = view.items().map(|e| e.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn test_page_after_live_event_keeps_order_and_dedupes() {
    let mut view = FeedView::new();
    view.apply(FeedMessage::Event(event(5)));
    view.apply_page(BlockedEventsPage { items: vec![event(5), event(4)] });

    let ids: Vec<u64> = view.items().map(|e| e.id).collect();
    assert_eq!(ids, vec![5, 4]);
}

#[test]
fn test_view_is_capped() {
    let mut view = FeedView::new();
    view.apply_page(BlockedEventsPage::default());
    for id in 0..600 {
        view.apply(FeedMessage::Event(event(id)));
    }
    assert_eq!(view.len(), 500);
    assert_eq!(view.items().next().map(|e| e.id), Some(599));
}

#[test]
fn test_connection_status_transitions() {
    let mut view = FeedView::new();
    view.apply(FeedMessage::Open);
    assert_eq!(view.status(), ConnectionStatus::Connected);
    assert_eq!(view.status_line(), "Stream status: connected");

    // Malformed payloads do not disconnect
    let bad = serde_json::from_str::<BlockedEvent>("{").unwrap_err();
    view.apply(FeedMessage::Error(FeedError::MalformedPayload(bad)));
    assert_eq!(view.status(), ConnectionStatus::Connected);
    assert!(view.last_error().is_some());

    view.apply(FeedMessage::Event(event(1)));
    view.apply(FeedMessage::Error(FeedError::Subscription("stream ended".into())));
    assert_eq!(view.status(), ConnectionStatus::Disconnected);
    assert_eq!(view.len(), 1, "Disconnect keeps what was shown");
}

#[test]
fn test_fetch_error_shows_indicator() {
    let mut view = FeedView::new();
    let err = FeedError::Transport(TransportError::Timeout(Duration::from_secs(10)));
    view.apply_fetch_error(&err);
    assert!(!view.is_loading());
    let page = view.render();
    assert!(page.contains("Error:"));
    assert!(page.contains(EMPTY_TEXT));
}

#[test]
fn test_row_rendering() {
    let row = render_row(&event(42));
    assert!(row.contains("leak the password"));
    assert!(row.contains("Reason: Matched rule: password"));
    assert!(row.contains("Source: gateway"));
    assert!(row.contains("ID: 42"));

    let mut bare = event(1);
    bare.prompt_snippet.clear();
    bare.reason.clear();
    let row = render_row(&bare);
    assert!(row.contains("(no snippet)"));
    assert!(row.contains("Reason: blocked"));
}

#[test]
fn test_check_outcome_rendering() {
    let blocked = CheckOutcome::from_result(Ok(CheckResult::blocked(
        "Matched mock pattern: ssn",
        Some(serde_json::json!({ "matched": "ssn" })),
    )));
    let text = blocked.render();
    assert!(text.starts_with("Blocked"));
    assert!(text.contains("Reason: Matched mock pattern: ssn"));
    assert!(text.contains("\"matched\": \"ssn\""));
    assert!(!blocked.is_error());

    assert_eq!(CheckOutcome::from_result(Ok(CheckResult::allowed())).render(), "Allowed");

    let rejected = CheckOutcome::from_result(Err(FeedError::Validation("prompt is empty".into())));
    assert_eq!(rejected.render(), EMPTY_PROMPT_TEXT);
    assert!(rejected.is_error());

    let failed = CheckOutcome::from_result(Err(FeedError::Subscription("x".into())));
    assert_eq!(failed.render(), REQUEST_FAILED_TEXT);
}

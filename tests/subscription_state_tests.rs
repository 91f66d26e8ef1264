use sentinel::feed::{SubscriptionGraph, SubscriptionRequest, SubscriptionState};

#[test]
fn test_happy_path() {
    let mut state = SubscriptionState::default();
    assert_eq!(state, SubscriptionState::Idle);

    state = SubscriptionGraph::transition(state, SubscriptionRequest::Connect).expect("Idle connects");
    assert_eq!(state, SubscriptionState::Connecting);

    state = SubscriptionGraph::transition(state, SubscriptionRequest::Established).expect("Connecting opens");
    assert_eq!(state, SubscriptionState::Open);

    state = SubscriptionGraph::transition(state, SubscriptionRequest::Close).expect("Open closes");
    assert_eq!(state, SubscriptionState::Closed);
}

#[test]
fn test_errored_reachable_from_connecting_and_open() {
    for from in [SubscriptionState::Connecting, SubscriptionState::Open] {
        assert_eq!(
            SubscriptionGraph::transition(from, SubscriptionRequest::TransportFailed),
            Some(SubscriptionState::Errored)
        );
    }
    // Not from Idle, and a second failure is not a new transition
    assert_eq!(
        SubscriptionGraph::transition(SubscriptionState::Idle, SubscriptionRequest::TransportFailed),
        None
    );
    assert_eq!(
        SubscriptionGraph::transition(SubscriptionState::Errored, SubscriptionRequest::TransportFailed),
        None
    );
}

#[test]
fn test_closed_is_terminal() {
    for request in [
        SubscriptionRequest::Connect,
        SubscriptionRequest::Established,
        SubscriptionRequest::TransportFailed,
        SubscriptionRequest::Close,
    ] {
        assert_eq!(
            SubscriptionGraph::transition(SubscriptionState::Closed, request),
            None,
            "Closed must reject {:?}",
            request
        );
    }
}

#[test]
fn test_close_from_any_live_state() {
    for from in [
        SubscriptionState::Idle,
        SubscriptionState::Connecting,
        SubscriptionState::Open,
        SubscriptionState::Errored,
    ] {
        assert_eq!(
            SubscriptionGraph::transition(from, SubscriptionRequest::Close),
            Some(SubscriptionState::Closed)
        );
    }
}

#[test]
fn test_invalid_requests_ignored() {
    // Open cannot re-open, Errored cannot recover
    assert_eq!(
        SubscriptionGraph::transition(SubscriptionState::Open, SubscriptionRequest::Established),
        None
    );
    assert_eq!(
        SubscriptionGraph::transition(SubscriptionState::Errored, SubscriptionRequest::Established),
        None
    );
    assert_eq!(
        SubscriptionGraph::transition(SubscriptionState::Open, SubscriptionRequest::Connect),
        None
    );
}

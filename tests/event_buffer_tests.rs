use sentinel::feed::{BlockedEvent, EventBuffer, EventOrigin, BUFFER_CAPACITY};
use sentinel::feed::types::{snippet, MAX_SNIPPET_CHARS};

fn event(id: u64) -> BlockedEvent {
    BlockedEvent::new(id, &format!("prompt {id}"), "Matched rule: test", EventOrigin::Simulator)
}

fn filled(count: u64) -> EventBuffer {
    let mut buffer = EventBuffer::new();
    for id in 0..count {
        buffer.insert(event(id));
    }
    buffer
}

#[test]
fn test_insert_keeps_newest_first() {
    let buffer = filled(3);
    let ids: Vec<u64> = buffer.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 1, 0], "Most recent insert must be at the head");
    assert_eq!(buffer.front().map(|e| e.id), Some(2));
}

#[test]
fn test_eviction_removes_exactly_the_oldest() {
    let mut buffer = filled(BUFFER_CAPACITY as u64);
    assert_eq!(buffer.len(), 500);

    let before: Vec<u64> = buffer.iter().map(|e| e.id).collect();

    // 501st insert
    let evicted = buffer.insert(event(500)).expect("Full buffer must evict");
    assert_eq!(evicted.id, 0, "The oldest event goes first");
    assert_eq!(buffer.len(), 500, "Capacity is never exceeded");

    let after: Vec<u64> = buffer.iter().map(|e| e.id).collect();
    assert_eq!(after[0], 500);
    assert_eq!(&after[1..], &before[..499], "Survivors keep their order");
}

#[test]
fn test_insert_below_capacity_evicts_nothing() {
    let mut buffer = EventBuffer::with_capacity(4);
    for id in 0..4 {
        assert!(buffer.insert(event(id)).is_none());
    }
    assert!(buffer.insert(event(4)).is_some());
    assert_eq!(buffer.capacity(), 4);
}

#[test]
fn test_recent_is_a_prefix() {
    let buffer = filled(10);
    let all = buffer.recent(usize::MAX);
    for limit in [1, 3, 10, 25] {
        let page = buffer.recent(limit);
        assert_eq!(page.len(), limit.min(10));
        assert_eq!(page.as_slice(), &all[..page.len()]);
    }
    assert!(EventBuffer::new().recent(5).is_empty());
}

#[test]
fn test_snippet_truncates_on_char_boundary() {
    let long = "é".repeat(MAX_SNIPPET_CHARS + 50);
    let cut = snippet(&long);
    assert_eq!(cut.chars().count(), MAX_SNIPPET_CHARS);

    assert_eq!(snippet("short"), "short");

    let ev = BlockedEvent::new(1, &"x".repeat(1000), "r", EventOrigin::Tester);
    assert_eq!(ev.prompt_snippet.len(), MAX_SNIPPET_CHARS);
}

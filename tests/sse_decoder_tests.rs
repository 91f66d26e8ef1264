use sentinel::feed::sse::{SseDecoder, SseMessage};

#[test]
fn test_single_message() {
    let mut decoder = SseDecoder::new();
    let messages = decoder.push(b"data: {\"id\":1}\n\n");
    assert_eq!(
        messages,
        vec![SseMessage { event: None, data: "{\"id\":1}".to_string() }]
    );
}

#[test]
fn test_partial_chunks_are_buffered() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.push(b"da").is_empty());
    assert!(decoder.push(b"ta: hel").is_empty());
    assert!(decoder.push(b"lo\r\n").is_empty(), "Needs the blank line to dispatch");
    let messages = decoder.push(b"\r\n");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].data, "hello");
}

#[test]
fn test_multiline_data_and_named_events() {
    let mut decoder = SseDecoder::new();
    let messages = decoder.push(b"event: ping\ndata: a\ndata: b\n\ndata:c\n\n");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].event.as_deref(), Some("ping"));
    assert_eq!(messages[0].data, "a\nb");
    assert!(!messages[0].is_default_event());
    assert_eq!(messages[1].data, "c", "Space after the colon is optional");
    assert!(messages[1].is_default_event());
}

#[test]
fn test_comments_and_empty_frames_ignored() {
    let mut decoder = SseDecoder::new();
    let messages = decoder.push(b": keepalive\n\nid: 4\nretry: 1000\n\n\n");
    assert!(messages.is_empty());
}

#[test]
fn test_event_name_does_not_leak_into_next_message() {
    let mut decoder = SseDecoder::new();
    let messages = decoder.push(b"event: message\ndata: x\n\ndata: y\n\n");
    assert!(messages[0].is_default_event());
    assert_eq!(messages[1].event, None);
}

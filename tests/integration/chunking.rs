// =====
// TESTS: 4
// =====
//
// Content chunking integration tests.
// Oversized messages are split, collapsed behind "show more", and expanded.

use chatview::app::filler;
use chatview::config::ViewportConfig;
use chatview::model::{MessageItem, MessageRole};
use chatview::viewport::{ChatViewport, Expansion, hidden_chunk_count};
use pretty_assertions::assert_eq;

use crate::helpers::{LengthRenderer, Rig};

fn long_message(chars: usize) -> MessageItem {
    MessageItem::new("long", MessageRole::Assistant, filler(7, chars))
}

#[test]
fn twelve_thousand_chars_make_six_chunks_two_shown() {
    let message = long_message(12_000);
    assert_eq!(message.char_len(), 12_000);
    let mut viewport = ChatViewport::new(ViewportConfig::default()).unwrap();

    let collapsed = viewport.chunks_for(&message);
    assert_eq!(collapsed.len(), 6);
    let shown: Vec<usize> = collapsed.iter().filter(|c| c.is_visible).map(|c| c.order).collect();
    assert_eq!(shown, vec![0, 1]);
    assert_eq!(hidden_chunk_count(&collapsed), 4);
    assert!(collapsed.iter().all(|c| c.parent_id == message.id));

    assert_eq!(viewport.toggle_expanded(&message.id), Expansion::Expanded);
    let expanded = viewport.chunks_for(&message);
    assert_eq!(expanded.len(), 6);
    assert!(expanded.iter().all(|c| c.is_visible));

    let joined: String = expanded.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(joined, message.content);

    assert_eq!(viewport.toggle_expanded(&message.id), Expansion::Collapsed);
    assert_eq!(hidden_chunk_count(&viewport.chunks_for(&message)), 4);
}

#[test]
fn short_messages_stay_in_one_chunk() {
    let message = long_message(3000);
    let viewport = ChatViewport::new(ViewportConfig::default()).unwrap();
    let chunks = viewport.chunks_for(&message);
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].is_visible);
    assert_eq!(chunks[0].content, message.content);
}

#[test]
fn streaming_message_is_never_truncated() {
    let message = long_message(12_000).streaming();
    let viewport = ChatViewport::new(ViewportConfig::default()).unwrap();
    let chunks = viewport.chunks_for(&message);
    assert_eq!(chunks.len(), 6);
    assert_eq!(hidden_chunk_count(&chunks), 0);
}

#[test]
fn expanding_grows_the_layout_by_the_revealed_text() {
    let mut rig = Rig::new(800.0);
    let mut renderer = LengthRenderer { base: 150.0 };
    rig.push(long_message(12_000));
    rig.render(&mut renderer);
    // Two visible chunks of 2000 characters.
    assert_eq!(rig.viewport.measurements().get(&"long".into()), Some(550.0));
    let collapsed_total = rig.viewport.total_height();

    rig.viewport.toggle_expanded(&"long".into());
    // The collapsed height stands until the expanded render replaces it.
    assert_eq!(rig.viewport.measurements().get(&"long".into()), Some(550.0));
    rig.viewport.relayout(&rig.messages);
    rig.render(&mut renderer);
    assert_eq!(rig.viewport.measurements().get(&"long".into()), Some(1350.0));
    assert_eq!(rig.viewport.total_height(), collapsed_total + 800.0);
}

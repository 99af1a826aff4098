// =====
// TESTS: 4
// =====
//
// Streaming follow-loop integration tests.
// A reply grows token by token while a renderer measures it every frame.

use chatview::model::{MessageItem, MessageRole};
use chatview::viewport::AutoScrollState;
use pretty_assertions::assert_eq;

use crate::helpers::{LengthRenderer, Rig};

const TOKENS: &str = "streamed tokens arrive in small pieces ";

fn start_reply(rig: &mut Rig) {
    let index = rig.messages.len();
    let reply = MessageItem::new("reply", MessageRole::Assistant, "").streaming().at_index(index);
    assert_eq!(rig.push(reply).appended, 1);
}

/// One frame of streaming: new tokens, a paint, then timers.
fn stream_frames(rig: &mut Rig, renderer: &mut LengthRenderer, frames: u32) {
    for _ in 0..frames {
        assert!(rig.grow_last(TOKENS).tail_grew);
        rig.render(renderer);
        rig.frames(1);
    }
}

fn end_reply(rig: &mut Rig) {
    if let Some(last) = rig.messages.last_mut() {
        last.is_streaming = false;
    }
    assert!(rig.sync().streaming_ended);
}

#[test]
fn growing_reply_is_followed_to_the_end() {
    let mut rig = Rig::settled(800.0, 60);
    let mut renderer = LengthRenderer { base: 150.0 };
    start_reply(&mut rig);

    stream_frames(&mut rig, &mut renderer, 40);
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::AnimatingStreaming);
    assert!(rig.viewport.is_near_bottom());
    assert!(rig.viewport.allows_auto_scroll());

    end_reply(&mut rig);
    rig.render(&mut renderer);
    rig.settle();
    assert!(rig.at_tail());
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::Idle);
    assert_eq!(rig.viewport.pending_timers(), 0);
}

#[test]
fn stalled_stream_leaves_the_follow_loop() {
    let mut rig = Rig::settled(800.0, 60);
    let mut renderer = LengthRenderer { base: 150.0 };
    start_reply(&mut rig);
    stream_frames(&mut rig, &mut renderer, 20);
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::AnimatingStreaming);

    // Still flagged as streaming, but nothing arrives.
    rig.settle();
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::Idle);
    assert_eq!(rig.viewport.pending_timers(), 0);
    assert!(rig.at_tail());

    // New tokens pick the loop back up.
    stream_frames(&mut rig, &mut renderer, 2);
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::AnimatingStreaming);
}

#[test]
fn reader_scrolled_away_is_not_pulled_down() {
    let mut rig = Rig::settled(800.0, 60);
    let mut renderer = LengthRenderer { base: 150.0 };
    start_reply(&mut rig);
    stream_frames(&mut rig, &mut renderer, 10);

    let reading = 2000.0;
    rig.viewport.on_user_scroll(rig.now, reading);
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::Cancelled);

    stream_frames(&mut rig, &mut renderer, 30);
    assert_eq!(rig.viewport.scroll_top(), reading);
    end_reply(&mut rig);
    rig.settle();
    assert_eq!(rig.viewport.scroll_top(), reading);
    assert!(rig.viewport.show_scroll_button());
}

#[test]
fn teardown_mid_stream_silences_every_timer() {
    let mut rig = Rig::settled(800.0, 60);
    let mut renderer = LengthRenderer { base: 150.0 };
    start_reply(&mut rig);
    stream_frames(&mut rig, &mut renderer, 8);
    assert!(rig.viewport.pending_timers() > 0);

    rig.viewport.teardown();
    assert!(rig.viewport.is_torn_down());
    assert_eq!(rig.viewport.pending_timers(), 0);
    assert_eq!(rig.viewport.next_deadline(rig.now), None);

    let frozen = rig.viewport.scroll_top();
    assert!(rig.grow_last(TOKENS).is_empty());
    rig.settle();
    assert_eq!(rig.viewport.scroll_top(), frozen);
    assert_eq!(rig.viewport.pending_timers(), 0);
}

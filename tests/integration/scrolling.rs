// =====
// TESTS: 7
// =====
//
// Follow-mode integration tests.
// Drives appends, user scrolls and the scroll-to-bottom control through a
// virtual clock and checks where the offset ends up.

use chatview::config::ViewportConfig;
use chatview::viewport::{AutoScrollState, FollowChange, ScrollMode};
use pretty_assertions::assert_eq;

use crate::helpers::{Rig, short_message};

// --- Appends while following ---

#[test]
fn sequential_appends_near_bottom_end_on_the_tail() {
    let mut rig = Rig::new(400.0);
    let mut last_total = rig.viewport.total_height();

    for index in 0..3 {
        let change = rig.push(short_message(index));
        assert_eq!(change.appended, 1);
        let total = rig.viewport.total_height();
        assert!(total > last_total, "append {index} did not grow content: {total}");
        last_total = total;
        assert!(rig.viewport.is_near_bottom());

        rig.settle();
        assert!(rig.viewport.is_near_bottom());
    }

    // 16 top + 3 * 150 + 2 * 16 gaps + 16 bottom.
    assert_eq!(rig.viewport.total_height(), 514.0);
    assert_eq!(rig.viewport.scroll_top(), 514.0 - 400.0);
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::Idle);
}

#[test]
fn append_waits_for_layout_before_scrolling() {
    let mut rig = Rig::settled(800.0, 60);
    let before = rig.viewport.scroll_top();
    rig.push(short_message(60));
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::AnimatingDiscrete);
    assert!(rig.viewport.active_task().is_none());

    // 50ms append delay: three frames are not enough, four are.
    rig.frames(3);
    assert_eq!(rig.viewport.scroll_top(), before);
    rig.frames(1);
    let task = *rig.viewport.active_task().unwrap();
    assert_eq!(task.mode, ScrollMode::Discrete);
    assert_eq!(task.target_offset, rig.viewport.max_scroll_top());

    rig.settle();
    assert!(rig.at_tail());
}

// --- User scrolling ---

#[test]
fn scrolling_away_cancels_the_pending_append() {
    let mut rig = Rig::settled(800.0, 60);
    rig.push(short_message(60));
    let reading = rig.viewport.scroll_top() - 2000.0;

    assert_eq!(rig.viewport.on_user_scroll(rig.now, reading), FollowChange::Released);
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::Cancelled);
    assert!(rig.viewport.active_task().is_none());

    rig.settle();
    assert_eq!(rig.viewport.scroll_top(), reading);
    assert!(!rig.viewport.allows_auto_scroll());
    assert!(rig.viewport.show_scroll_button());
    assert_eq!(rig.viewport.pending_timers(), 0);

    // Further appends leave the reader alone.
    rig.push(short_message(61));
    rig.settle();
    assert_eq!(rig.viewport.scroll_top(), reading);
}

#[test]
fn scrolling_back_to_the_tail_resumes_following() {
    let mut rig = Rig::settled(800.0, 60);
    rig.viewport.on_user_scroll(rig.now, 1000.0);
    rig.frames(2);
    assert!(rig.viewport.show_scroll_button());

    let resumed = rig.viewport.on_user_scroll(rig.now, rig.viewport.max_scroll_top());
    assert_eq!(resumed, FollowChange::Resumed);
    rig.frames(2);
    assert!(!rig.viewport.show_scroll_button());

    rig.push(short_message(60));
    rig.settle();
    assert!(rig.at_tail());
}

// --- Scroll-to-bottom control ---

#[test]
fn forced_scroll_runs_while_paused_and_resumes_follow() {
    let mut rig = Rig::settled(800.0, 60);
    rig.viewport.on_user_scroll(rig.now, 1000.0);
    rig.push(short_message(60));
    rig.frames(10);
    assert_eq!(rig.viewport.scroll_top(), 1000.0);

    rig.viewport.force_scroll_to_bottom(rig.now);
    let task = *rig.viewport.active_task().unwrap();
    assert_eq!(task.mode, ScrollMode::Discrete);
    assert_eq!(task.start_offset, 1000.0);
    assert_eq!(task.target_offset, rig.viewport.max_scroll_top());
    assert_eq!(task.duration, ViewportConfig::default().scroll.forced_duration());

    rig.settle();
    assert!(rig.at_tail());
    assert!(rig.viewport.allows_auto_scroll());
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::Idle);
}

#[test]
fn forced_scroll_supersedes_a_running_animation() {
    let mut rig = Rig::settled(800.0, 60);
    rig.push(short_message(60));
    rig.frames(5);
    let running = *rig.viewport.active_task().unwrap();
    assert_eq!(running.duration, ViewportConfig::default().scroll.discrete_duration());

    rig.viewport.force_scroll_to_bottom(rig.now);
    let forced = *rig.viewport.active_task().unwrap();
    assert_eq!(forced.start_time, rig.now);
    assert_eq!(forced.duration, ViewportConfig::default().scroll.forced_duration());
    assert!(forced.start_offset >= running.start_offset);

    rig.settle();
    assert!(rig.at_tail());
}

#[test]
fn user_scroll_during_forced_scroll_keeps_the_user_offset() {
    let mut rig = Rig::settled(800.0, 60);
    rig.viewport.on_user_scroll(rig.now, 1000.0);
    rig.viewport.force_scroll_to_bottom(rig.now);
    rig.frames(3);
    assert!(rig.viewport.active_task().is_some());

    assert_eq!(rig.viewport.on_user_scroll(rig.now, 8500.0), FollowChange::Unchanged);
    rig.frames(1);
    assert_eq!(rig.viewport.scroll_top(), 8500.0);
    assert!(rig.viewport.active_task().is_none());
    assert_eq!(rig.viewport.auto_scroll_state(), AutoScrollState::Idle);

    rig.settle();
    assert_eq!(rig.viewport.scroll_top(), 8500.0);
}

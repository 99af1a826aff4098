// =====
// TESTS: 6
// =====
//
// Measurement feedback integration tests.
// Estimated heights are corrected by a renderer and the view must not jump.

use chatview::viewport::FollowChange;
use pretty_assertions::assert_eq;

use crate::helpers::{LengthRenderer, Rig};

#[test]
fn corrections_above_the_reader_do_not_move_the_text() {
    let mut rig = Rig::settled(800.0, 60);
    assert_eq!(rig.viewport.on_user_scroll(rig.now, 3000.0), FollowChange::Released);

    let scroll_top = rig.viewport.scroll_top();
    let anchor = rig
        .viewport
        .window()
        .positions
        .iter()
        .find(|p| p.bottom() > scroll_top)
        .cloned()
        .unwrap();
    let on_screen_before = anchor.top - scroll_top;

    // Every drawn item comes back 50 shorter than estimated.
    rig.render(&mut LengthRenderer { base: 100.0 });

    let moved = rig.viewport.window().position_of(&anchor.id).unwrap().top;
    assert_eq!(moved - rig.viewport.scroll_top(), on_screen_before);
    assert!(rig.viewport.scroll_top() < scroll_top);
    assert!(!rig.viewport.allows_auto_scroll());
}

#[test]
fn corrections_while_following_keep_the_tail_pinned() {
    let mut rig = Rig::settled(800.0, 60);
    let before_total = rig.viewport.total_height();
    rig.render(&mut LengthRenderer { base: 100.0 });
    assert!(rig.viewport.total_height() < before_total);
    assert!(rig.at_tail());
    assert!(rig.viewport.allows_auto_scroll());
}

#[test]
fn corrections_above_a_view_just_off_the_tail_do_not_move_the_text() {
    let mut rig = Rig::settled(800.0, 60);
    assert_eq!(rig.viewport.scroll_by(rig.now, -50.0), FollowChange::Unchanged);
    assert!(rig.viewport.allows_auto_scroll());

    let scroll_top = rig.viewport.scroll_top();
    let anchor = rig
        .viewport
        .window()
        .positions
        .iter()
        .find(|p| p.bottom() > scroll_top)
        .cloned()
        .unwrap();
    let on_screen_before = anchor.top - scroll_top;

    assert!(rig.viewport.on_measured(&"m0".into(), 400.0, rig.now));

    let moved = rig.viewport.window().position_of(&anchor.id).unwrap().top;
    assert_eq!(moved - rig.viewport.scroll_top(), on_screen_before);
    assert_eq!(rig.viewport.scroll_top(), scroll_top + 250.0);
    assert!(rig.viewport.allows_auto_scroll());
}

#[test]
fn only_the_window_is_measured() {
    let mut rig = Rig::settled(800.0, 500);
    let drawn = rig.render(&mut LengthRenderer { base: 120.0 });
    assert!(!drawn.is_empty());
    assert!(drawn.len() < 20, "drew {} of 500", drawn.len());
    assert_eq!(rig.viewport.measurements().len(), drawn.len());
    assert!(drawn.iter().any(|b| b.position.index == 499));
}

#[test]
fn drawn_blocks_carry_measured_positions() {
    let mut rig = Rig::settled(800.0, 60);
    let drawn = rig.render(&mut LengthRenderer { base: 100.0 });
    for pair in drawn.windows(2) {
        assert_eq!(pair[0].position.height, 100.0);
        assert_eq!(pair[1].position.top, pair[0].position.bottom() + 16.0);
    }
}

#[test]
fn width_change_falls_back_to_estimates() {
    let mut rig = Rig::settled(800.0, 60);
    let estimated_total = rig.viewport.total_height();
    rig.render(&mut LengthRenderer { base: 100.0 });
    assert!(rig.viewport.total_height() < estimated_total);

    rig.viewport.invalidate_measurements(&rig.messages);
    assert!(rig.viewport.measurements().is_empty());
    assert_eq!(rig.viewport.total_height(), estimated_total);
    assert!(rig.at_tail());
}

// chatview - windowed chat transcript viewport with adaptive auto-scroll
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Positional pass and visible-range selection over the ordered message list.
//!
//! Pure functions of their inputs: items are addressed by index into the
//! caller's flat slice and nothing here holds on to them.

use super::measure::is_usable_height;
use crate::config::ViewportConfig;
use crate::model::{ItemId, MessageItem};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct VirtualMessageItem {
    pub id: ItemId,
    pub index: usize,
    pub top: f32,
    pub height: f32,
    pub is_visible: bool,
}

impl VirtualMessageItem {
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Geometry knobs for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLayout {
    pub gap: f32,
    pub top_padding: f32,
    pub bottom_padding: f32,
    pub buffer_items: usize,
    /// Height unit the buffer slack is measured in.
    pub estimated_height: f32,
    pub windowing_threshold: usize,
}

impl From<&ViewportConfig> for WindowLayout {
    fn from(config: &ViewportConfig) -> Self {
        Self {
            gap: config.gap,
            top_padding: config.top_padding,
            bottom_padding: config.bottom_padding,
            buffer_items: config.buffer_items,
            estimated_height: config.estimated_height,
            windowing_threshold: config.windowing_threshold,
        }
    }
}

impl WindowLayout {
    #[allow(clippy::cast_precision_loss)]
    fn slack(&self) -> f32 {
        self.buffer_items as f32 * self.estimated_height
    }
}

/// Result of one layout pass. `positions` covers every item; `visible` is the
/// contiguous index range to draw.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VirtualWindow {
    pub positions: Vec<VirtualMessageItem>,
    pub visible: Range<usize>,
    pub total_height: f32,
}

impl VirtualWindow {
    #[must_use]
    pub fn visible_items(&self) -> &[VirtualMessageItem] {
        &self.positions[self.visible.clone()]
    }

    #[must_use]
    pub fn position_of(&self, id: &ItemId) -> Option<&VirtualMessageItem> {
        self.positions.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lay out `items` and pick the slice intersecting the viewport plus slack.
///
/// `height_of` supplies measured-or-estimated heights; anything unusable it
/// returns degrades to `layout.estimated_height` instead of failing the pass.
pub fn compute_window<F>(
    items: &[MessageItem],
    scroll_top: f32,
    viewport_height: f32,
    layout: &WindowLayout,
    mut height_of: F,
) -> VirtualWindow
where
    F: FnMut(&MessageItem) -> f32,
{
    let mut positions = Vec::with_capacity(items.len());
    let mut top = layout.top_padding;
    for (index, item) in items.iter().enumerate() {
        let measured = height_of(item);
        let height = if is_usable_height(measured) { measured } else { layout.estimated_height };
        let position =
            VirtualMessageItem { id: item.id.clone(), index, top, height, is_visible: false };
        top = position.bottom() + layout.gap;
        positions.push(position);
    }

    let total_height = positions
        .last()
        .map_or(layout.top_padding, VirtualMessageItem::bottom)
        + layout.bottom_padding;

    let mut window = VirtualWindow { positions, visible: 0..0, total_height };
    select_visible(&mut window, scroll_top, viewport_height, layout);
    window
}

/// Re-pick the visible range of an existing layout after the offset moved.
pub fn select_visible(
    window: &mut VirtualWindow,
    scroll_top: f32,
    viewport_height: f32,
    layout: &WindowLayout,
) {
    let visible = if window.positions.len() <= layout.windowing_threshold {
        0..window.positions.len()
    } else {
        visible_range(&window.positions, scroll_top, viewport_height, layout.slack())
    };
    for (index, p) in window.positions.iter_mut().enumerate() {
        p.is_visible = visible.contains(&index);
    }
    window.visible = visible;
}

/// Change one item's height in place, shifting everything below it.
pub fn apply_height_delta(window: &mut VirtualWindow, index: usize, height: f32) -> f32 {
    let Some(item) = window.positions.get_mut(index) else {
        return 0.0;
    };
    let delta = height - item.height;
    item.height = height;
    for p in &mut window.positions[index + 1..] {
        p.top += delta;
    }
    window.total_height += delta;
    delta
}

/// Tops increase with index, so both window edges are binary searches.
fn visible_range(
    positions: &[VirtualMessageItem],
    scroll_top: f32,
    viewport_height: f32,
    slack: f32,
) -> Range<usize> {
    let lo = scroll_top - slack;
    let hi = scroll_top + viewport_height + slack;
    let start = positions.partition_point(|p| p.bottom() < lo);
    let end = positions.partition_point(|p| p.top <= hi);
    start..end.max(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageRole;
    use pretty_assertions::assert_eq;

    fn items(n: usize) -> Vec<MessageItem> {
        (0..n)
            .map(|i| MessageItem::new(format!("m{i}"), MessageRole::User, "hi").at_index(i))
            .collect()
    }

    fn layout() -> WindowLayout {
        WindowLayout {
            gap: 10.0,
            top_padding: 5.0,
            bottom_padding: 7.0,
            buffer_items: 5,
            estimated_height: 150.0,
            windowing_threshold: 50,
        }
    }

    #[test]
    fn empty_list_is_just_padding() {
        let window = compute_window(&[], 0.0, 800.0, &layout(), |_| 150.0);
        assert_eq!(window.total_height, 12.0);
        assert_eq!(window.visible, 0..0);
        assert!(window.visible_items().is_empty());
    }

    #[test]
    fn tops_follow_heights_and_gap() {
        let heights = [100.0, 40.0, 250.0, 1.0, 90.0];
        let list = items(heights.len());
        let window = compute_window(&list, 0.0, 800.0, &layout(), |m| heights[m.created_index]);
        assert_eq!(window.positions[0].top, 5.0);
        for pair in window.positions.windows(2) {
            assert_eq!(pair[1].top, pair[0].top + pair[0].height + 10.0);
        }
        let last = &window.positions[4];
        assert_eq!(window.total_height, last.top + last.height + 7.0);
    }

    #[test]
    fn unusable_heights_degrade_to_estimate() {
        let list = items(3);
        let window = compute_window(&list, 0.0, 800.0, &layout(), |m| match m.created_index {
            0 => f32::NAN,
            1 => -4.0,
            _ => f32::INFINITY,
        });
        assert!(window.positions.iter().all(|p| p.height == 150.0));
    }

    #[test]
    fn small_lists_render_everything() {
        let list = items(50);
        let window = compute_window(&list, 0.0, 100.0, &layout(), |_| 150.0);
        assert_eq!(window.visible, 0..50);
        assert!(window.positions.iter().all(|p| p.is_visible));
    }

    #[test]
    fn large_list_window_is_contiguous_and_bounded() {
        let list = items(200);
        let lay = WindowLayout { gap: 0.0, top_padding: 0.0, bottom_padding: 0.0, ..layout() };
        for scroll_top in [0.0, 1234.0, 15_000.0, 29_200.0] {
            let window = compute_window(&list, scroll_top, 800.0, &lay, |_| 150.0);
            let flags: Vec<usize> =
                window.positions.iter().filter(|p| p.is_visible).map(|p| p.index).collect();
            let expected: Vec<usize> = window.visible.clone().collect();
            assert_eq!(flags, expected, "visible flags must match the range at {scroll_top}");
            // 800 viewport + 2 * 750 slack spans at most 17 items of 150.
            assert!(window.visible.len() <= 17, "window too large: {:?}", window.visible);
            assert!(!window.visible.is_empty());
        }
    }

    #[test]
    fn window_edges_use_buffer_slack() {
        let list = items(200);
        let lay = WindowLayout { gap: 0.0, top_padding: 0.0, bottom_padding: 0.0, ..layout() };
        let window = compute_window(&list, 15_000.0, 800.0, &lay, |_| 150.0);
        // lo = 14250: item 94 ends at 14250 and still counts; hi = 16550: item 110 starts at 16500.
        assert_eq!(window.visible, 94..111);
    }

    #[test]
    fn scrolled_past_end_keeps_range_well_formed() {
        let list = items(60);
        let window = compute_window(&list, 1.0e9, 800.0, &layout(), |_| 150.0);
        assert!(window.visible.start <= window.visible.end);
        assert!(window.visible_items().is_empty());
    }

    #[test]
    fn reselecting_after_scroll_moves_the_window() {
        let list = items(200);
        let lay = WindowLayout { gap: 0.0, top_padding: 0.0, bottom_padding: 0.0, ..layout() };
        let mut window = compute_window(&list, 0.0, 800.0, &lay, |_| 150.0);
        select_visible(&mut window, 15_000.0, 800.0, &lay);
        assert_eq!(window.visible, 94..111);
        assert!(!window.positions[0].is_visible);
        assert!(window.positions[100].is_visible);
    }

    #[test]
    fn height_delta_shifts_following_items() {
        let list = items(4);
        let mut window = compute_window(&list, 0.0, 800.0, &layout(), |_| 100.0);
        let before_total = window.total_height;
        assert_eq!(apply_height_delta(&mut window, 1, 160.0), 60.0);
        assert_eq!(window.positions[1].height, 160.0);
        assert_eq!(window.positions[0].top, 5.0);
        assert_eq!(window.positions[2].top, 5.0 + 110.0 + 170.0);
        assert_eq!(window.total_height, before_total + 60.0);
        assert_eq!(apply_height_delta(&mut window, 99, 1.0), 0.0);
    }

    #[test]
    fn position_lookup_by_id() {
        let list = items(3);
        let window = compute_window(&list, 0.0, 800.0, &layout(), |_| 20.0);
        assert_eq!(window.position_of(&ItemId::new("m2")).map(|p| p.index), Some(2));
        assert_eq!(window.position_of(&ItemId::new("nope")), None);
    }
}

//! The demo's sequence of typed items, one of which can be expanded to host
//! the ramp curve editor.

use dear_imgui_rs::{DrawListMut, MouseButton, Ui};
use dear_imsequencer::{
    CurveDelegate, CurveEditor, CustomDrawArea, ItemSpan, Rect, SequenceInterface,
    SequencerError, SequencerResult, lerp,
};

use crate::ramp::RampEdit;

pub const SEQUENCER_ITEM_TYPE_NAMES: [&str; 5] =
    ["Camera", "Music", "ScreenEffect", "FadeIn", "Animation"];

const ITEM_COLOR: u32 = 0xFFAA_8080;
const EXPANDED_HEIGHT: f32 = 300.0;
const CURVE_LABELS: [&str; 3] = ["Translation", "Rotation", "Scale"];
const LABEL_HEIGHT: f32 = 14.0;
const CURVE_EDIT_ID_BASE: usize = 137;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceItem {
    /// Index into [`SEQUENCER_ITEM_TYPE_NAMES`]
    pub kind: usize,
    pub frame_start: i32,
    pub frame_end: i32,
    pub expanded: bool,
}

impl SequenceItem {
    pub const fn new(kind: usize, frame_start: i32, frame_end: i32, expanded: bool) -> Self {
        Self {
            kind,
            frame_start,
            frame_end,
            expanded,
        }
    }

    pub fn type_name(&self) -> &'static str {
        SEQUENCER_ITEM_TYPE_NAMES
            .get(self.kind)
            .copied()
            .unwrap_or("")
    }
}

#[derive(Debug, Default)]
pub struct DemoSequence {
    pub frame_min: i32,
    pub frame_max: i32,
    pub items: Vec<SequenceItem>,
    pub ramp_edit: RampEdit,
    pub curve_editor: CurveEditor,
}

impl DemoSequence {
    /// The five items the demo starts with, over frames `-100..=1000`
    pub fn demo() -> Self {
        Self {
            frame_min: -100,
            frame_max: 1000,
            items: vec![
                SequenceItem::new(0, 10, 30, false),
                SequenceItem::new(1, 20, 30, true),
                SequenceItem::new(3, 12, 60, false),
                SequenceItem::new(2, 61, 90, false),
                SequenceItem::new(4, 90, 99, false),
            ],
            ramp_edit: RampEdit::new(),
            curve_editor: CurveEditor::new(),
        }
    }

    pub fn try_item(&self, index: usize) -> SequencerResult<&SequenceItem> {
        self.items
            .get(index)
            .ok_or_else(|| SequencerError::item_out_of_range(index, self.items.len()))
    }

    /// Store a span, rejecting unknown items and spans ending before they start
    pub fn try_set_item_range(&mut self, index: usize, start: i32, end: i32) -> SequencerResult<()> {
        if start > end {
            return Err(SequencerError::invalid_span(start, end));
        }
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| SequencerError::item_out_of_range(index, len))?;
        item.frame_start = start;
        item.frame_end = end;
        Ok(())
    }

    fn sync_ramp_range(&mut self) {
        self.ramp_edit.set_range(
            [self.frame_min as f32, 0.0],
            [self.frame_max as f32, 1.0],
        );
    }
}

impl SequenceInterface for DemoSequence {
    fn frame_min(&self) -> i32 {
        self.frame_min
    }

    fn frame_max(&self) -> i32 {
        self.frame_max
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> ItemSpan {
        match self.try_item(index) {
            Ok(item) => ItemSpan {
                start: item.frame_start,
                end: item.frame_end,
                kind: item.kind,
                color: ITEM_COLOR,
            },
            Err(_) => ItemSpan {
                start: self.frame_min,
                end: self.frame_min,
                kind: 0,
                color: ITEM_COLOR,
            },
        }
    }

    fn set_item_range(&mut self, index: usize, start: i32, end: i32) {
        // Rejected spans are logged by the error constructors.
        let _ = self.try_set_item_range(index, start, end);
    }

    fn item_type_count(&self) -> usize {
        SEQUENCER_ITEM_TYPE_NAMES.len()
    }

    fn item_type_name(&self, kind: usize) -> &str {
        SEQUENCER_ITEM_TYPE_NAMES.get(kind).copied().unwrap_or("")
    }

    fn item_label(&self, index: usize) -> String {
        let name = self.items.get(index).map_or("", SequenceItem::type_name);
        format!("[{index:02}] {name}")
    }

    fn add(&mut self, kind: usize) {
        self.items.push(SequenceItem::new(kind, 0, 10, false));
    }

    fn del(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    fn duplicate(&mut self, index: usize) {
        if let Some(item) = self.items.get(index).copied() {
            self.items.push(item);
        }
    }

    fn custom_height(&self, index: usize) -> f32 {
        match self.items.get(index) {
            Some(item) if item.expanded => EXPANDED_HEIGHT,
            _ => 0.0,
        }
    }

    fn double_click(&mut self, index: usize) {
        let Some(was_expanded) = self.items.get(index).map(|i| i.expanded) else {
            return;
        };
        if was_expanded {
            self.items[index].expanded = false;
            return;
        }
        for item in &mut self.items {
            item.expanded = false;
        }
        self.items[index].expanded = true;
    }

    fn custom_draw(&mut self, ui: &Ui, index: usize, area: &CustomDrawArea) {
        self.sync_ramp_range();

        let legend = area.legend_rect;
        let mouse = ui.io().mouse_pos();
        let clicked = ui.is_mouse_clicked(MouseButton::Left);
        {
            let draw_list = ui.get_window_draw_list();
            draw_list.push_clip_rect(area.legend_clip_rect.min, area.legend_clip_rect.max, true);
            for (curve, label) in CURVE_LABELS.iter().enumerate() {
                let top = legend.min[1] + curve as f32 * LABEL_HEIGHT;
                let pta = [legend.min[0] + 30.0, top];
                let ptb = [legend.max[0], top + LABEL_HEIGHT];
                let color: u32 = if self.ramp_edit.is_visible(curve) {
                    0xFFFF_FFFF
                } else {
                    0x80FF_FFFF
                };
                draw_list.add_text(pta, color, label);
                if clicked && Rect::new(pta, ptb).contains(mouse) {
                    self.ramp_edit.toggle_visible(curve);
                }
            }
            draw_list.pop_clip_rect();
        }

        ui.set_cursor_screen_pos(area.rect.min);
        let _ = self.curve_editor.edit(
            ui,
            &mut self.ramp_edit,
            area.rect.size(),
            CURVE_EDIT_ID_BASE + index,
            Some(area.clip_rect),
        );
    }

    fn custom_draw_compact(
        &mut self,
        draw_list: &DrawListMut<'_>,
        index: usize,
        rect: Rect,
        clip: Rect,
    ) {
        self.sync_ramp_range();
        let Some(item) = self.items.get(index).copied() else {
            return;
        };
        let span = self.frame_max.saturating_sub(self.frame_min).max(1) as f32;

        draw_list.push_clip_rect(clip.min, clip.max, true);
        for curve in 0..self.ramp_edit.curve_count() {
            for point in self.ramp_edit.points(curve) {
                let x = point[0];
                if x < item.frame_start as f32 || x > item.frame_end as f32 {
                    continue;
                }
                let r = (x - self.frame_min as f32) / span;
                let sx = lerp(rect.min[0], rect.max[0], r);
                draw_list
                    .add_line([sx, rect.min[1] + 6.0], [sx, rect.max[1] - 4.0], 0xAA00_0000u32)
                    .thickness(4.0)
                    .build();
            }
        }
        draw_list.pop_clip_rect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn demo_items() {
        let seq = DemoSequence::demo();
        assert_eq!(seq.frame_min(), -100);
        assert_eq!(seq.frame_max(), 1000);
        assert_eq!(seq.item_count(), 5);
        assert_eq!(seq.item_type_count(), 5);
        assert_eq!(seq.item_label(2), "[02] FadeIn");
        assert_eq!(
            seq.item(1),
            ItemSpan {
                start: 20,
                end: 30,
                kind: 1,
                color: 0xFFAA_8080
            }
        );
        assert_eq!(seq.custom_height(1), 300.0);
        assert_eq!(seq.custom_height(0), 0.0);
    }

    #[test]
    fn add_delete_duplicate() {
        let mut seq = DemoSequence::demo();
        seq.add(4);
        assert_eq!(seq.items[5], SequenceItem::new(4, 0, 10, false));
        seq.duplicate(1);
        assert_eq!(seq.items[6], seq.items[1]);
        seq.del(0);
        assert_eq!(seq.item_count(), 6);
        assert_eq!(seq.items[0].kind, 1);
        seq.del(42);
        assert_eq!(seq.item_count(), 6);
    }

    #[test]
    fn double_click_keeps_one_expanded() {
        let mut seq = DemoSequence::demo();
        seq.double_click(3);
        let expanded: Vec<bool> = seq.items.iter().map(|i| i.expanded).collect();
        assert_eq!(expanded, vec![false, false, false, true, false]);

        seq.double_click(3);
        assert!(seq.items.iter().all(|i| !i.expanded));
        seq.double_click(99);
    }

    #[test]
    fn set_range_and_try_item() {
        let mut seq = DemoSequence::demo();
        seq.set_item_range(4, 95, 120);
        assert_eq!(seq.try_item(4).map(|i| (i.frame_start, i.frame_end)), Ok((95, 120)));
        assert_eq!(
            seq.try_item(5),
            Err(SequencerError::ItemOutOfRange { index: 5, len: 5 })
        );
    }

    #[test]
    fn spans_are_validated() {
        let mut seq = DemoSequence::demo();
        assert_eq!(
            seq.try_set_item_range(0, 40, 20),
            Err(SequencerError::InvalidSpan { start: 40, end: 20 })
        );
        assert_eq!(
            seq.try_set_item_range(9, 0, 5),
            Err(SequencerError::ItemOutOfRange { index: 9, len: 5 })
        );
        seq.set_item_range(0, 40, 20);
        assert_eq!(seq.items[0], SequenceItem::new(0, 10, 30, false));
        assert_eq!(seq.try_set_item_range(0, 5, 5), Ok(()));
        assert_eq!((seq.items[0].frame_start, seq.items[0].frame_end), (5, 5));
    }

    #[test]
    fn unknown_item_reads_as_empty_span() {
        let seq = DemoSequence::demo();
        assert_eq!(
            seq.item(42),
            ItemSpan {
                start: -100,
                end: -100,
                kind: 0,
                color: 0xFFAA_8080
            }
        );
    }

    #[test]
    fn ramp_range_follows_frames() {
        let mut seq = DemoSequence::demo();
        seq.sync_ramp_range();
        assert_eq!(seq.ramp_edit.min(), [-100.0, 0.0]);
        assert_eq!(seq.ramp_edit.max(), [1000.0, 1.0]);
    }
}

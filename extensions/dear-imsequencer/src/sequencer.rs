//! Keyframe sequencer widget
//!
//! A timeline with a legend column on the left and one row per item. Each
//! item is a `[start, end]` frame span drawn as a bar that can be dragged by
//! its start handle, its end handle or as a whole. Rows may request extra
//! height and draw custom content (see [`SequenceInterface::custom_draw`]).

use dear_imgui_rs::{DrawListMut, Key, MouseButton, Ui};

use crate::error::{SequencerError, SequencerResult};
use crate::rect::{Rect, lerp};

bitflags::bitflags! {
    /// Sequencer options flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SequencerOptions: u32 {
        /// No editing allowed
        const EDIT_NONE = 0;
        /// Allow editing start/end points
        const EDIT_STARTEND = 1 << 1;
        /// Allow changing the current frame from the header
        const CHANGE_FRAME = 1 << 3;
        /// Allow adding items
        const ADD = 1 << 4;
        /// Allow deleting and duplicating items
        const DEL = 1 << 5;
        /// Allow copy/paste
        const COPYPASTE = 1 << 6;
        /// Span editing and frame changes
        const EDIT_ALL = Self::EDIT_STARTEND.bits() | Self::CHANGE_FRAME.bits();
    }
}

/// Width of the legend column in pixels
pub const LEGEND_WIDTH: f32 = 200.0;
/// Height of a collapsed row in pixels
pub const ITEM_HEIGHT: f32 = 20.0;
/// Height of the header carrying frame numbers
pub const HEADER_HEIGHT: f32 = 20.0;
/// Height of the horizontal scrollbar
pub const SCROLLBAR_HEIGHT: f32 = 14.0;
/// Smallest allowed width of one frame in pixels
pub const MIN_FRAME_PIXEL_WIDTH: f32 = 0.1;
/// Largest allowed width of one frame in pixels
pub const MAX_FRAME_PIXEL_WIDTH: f32 = 50.0;

const DEFAULT_FRAME_PIXEL_WIDTH: f32 = 10.0;
const MIN_BAR_WIDTH: f32 = 44.0;
const HANDLE_WIDTH: f32 = 14.0;
const GLYPH_SIZE: f32 = 16.0;
const CURSOR_WIDTH: f32 = 8.0;

const COLOR_BACKGROUND: u32 = 0xFF24_2424;
const COLOR_HEADER: u32 = 0xFF3D_3837;
const COLOR_ROW_EVEN: u32 = 0xFF41_3D3D;
const COLOR_ROW_ODD: u32 = 0xFF3A_3636;
const COLOR_ROW_HOVER: u32 = 0x8020_1008;
const COLOR_SELECTION: u32 = 0x8010_80FF;
const COLOR_TICK: u32 = 0xFF60_6060;
const COLOR_GRID: u32 = 0x3060_6060;
const COLOR_FRAME_LABEL: u32 = 0xFFBB_BBBB;
const COLOR_TEXT: u32 = 0xFFFF_FFFF;
const COLOR_CURSOR: u32 = 0xA02A_2AFF;
const COLOR_CURSOR_LABEL: u32 = 0xFF2A_2AFF;
const COLOR_GLYPH: u32 = 0x77A3_B2AA;
const COLOR_GLYPH_HOVER: u32 = 0xAAEA_FFAA;
const COLOR_HOTSPOT: u32 = 0xFF10_80FF;
const COLOR_HOTSPOT_IDLE: u32 = 0xFF00_0000;

/// One item of a sequence as the widget sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpan {
    /// First frame covered by the item
    pub start: i32,
    /// Last frame covered by the item (inclusive)
    pub end: i32,
    /// Type index, used with [`SequenceInterface::item_type_name`]
    pub kind: usize,
    /// Bar color (ABGR packed)
    pub color: u32,
}

/// Screen rectangles handed to [`SequenceInterface::custom_draw`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CustomDrawArea {
    /// Area below the item bar, aligned with the timeline frames
    pub rect: Rect,
    /// Area below the item label in the legend column
    pub legend_rect: Rect,
    /// Visible part of `rect`
    pub clip_rect: Rect,
    /// Visible part of `legend_rect`
    pub legend_clip_rect: Rect,
}

/// Data source and edit sink of a [`Sequencer`]
///
/// Only the frame range and the item spans are required. Everything else has
/// a default that disables the matching feature.
pub trait SequenceInterface {
    fn frame_min(&self) -> i32;
    fn frame_max(&self) -> i32;
    fn item_count(&self) -> usize;
    /// Span, type and color of item `index`
    fn item(&self, index: usize) -> ItemSpan;
    /// Store a new span for item `index` while it is being dragged
    fn set_item_range(&mut self, index: usize, start: i32, end: i32);

    fn item_type_count(&self) -> usize {
        0
    }
    fn item_type_name(&self, _kind: usize) -> &str {
        ""
    }
    fn item_label(&self, _index: usize) -> String {
        String::new()
    }

    fn add(&mut self, _kind: usize) {}
    fn del(&mut self, _index: usize) {}
    fn duplicate(&mut self, _index: usize) {}
    fn copy(&mut self) {}
    fn paste(&mut self) {}

    /// Called once when a drag on item `index` starts
    fn begin_edit(&mut self, _index: usize) {}
    /// Called once when the drag is released
    fn end_edit(&mut self) {}

    /// Extra pixels below the row of item `index`; 0 keeps the row compact
    fn custom_height(&self, _index: usize) -> f32 {
        0.0
    }
    fn double_click(&mut self, _index: usize) {}

    /// Draw the expanded content of item `index`.
    ///
    /// Called after the sequencer released its draw list, so implementations
    /// may grab the window draw list or submit widgets of their own.
    fn custom_draw(&mut self, _ui: &Ui, _index: usize, _area: &CustomDrawArea) {}

    /// Draw over the bar row of a compact item.
    fn custom_draw_compact(
        &mut self,
        _draw_list: &DrawListMut<'_>,
        _index: usize,
        _rect: Rect,
        _clip: Rect,
    ) {
    }
}

/// Caller-owned view state of a sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerView {
    pub current_frame: i32,
    pub expanded: bool,
    pub selected_entry: Option<usize>,
    /// First frame shown at the left edge of the timeline
    pub first_frame: i32,
}

impl Default for SequencerView {
    fn default() -> Self {
        Self {
            current_frame: 0,
            expanded: true,
            selected_entry: None,
            first_frame: 0,
        }
    }
}

impl SequencerView {
    /// Select item `index`, checking it exists in `sequence`
    pub fn select<S: SequenceInterface + ?Sized>(
        &mut self,
        sequence: &S,
        index: usize,
    ) -> SequencerResult<()> {
        let len = sequence.item_count();
        if index >= len {
            return Err(SequencerError::item_out_of_range(index, len));
        }
        self.selected_entry = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_entry = None;
    }

    /// Span of the selected item, if the selection still points at one
    pub fn selected_item<S: SequenceInterface + ?Sized>(&self, sequence: &S) -> Option<ItemSpan> {
        self.selected_entry
            .filter(|&i| i < sequence.item_count())
            .map(|i| sequence.item(i))
    }
}

/// Which part of an item bar is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovingPart {
    Start = 1,
    End = 2,
    Both = 3,
}

impl MovingPart {
    fn moves_start(self) -> bool {
        (self as u8) & 1 != 0
    }

    fn moves_end(self) -> bool {
        (self as u8) & 2 != 0
    }
}

/// Move the dragged part of a span by `diff` frames.
///
/// Only the moved part is clamped: a start stays in `[frame_min, end]`, an
/// end in `[start, frame_max]`. A whole bar keeps its length and moves by the
/// part of `diff` that keeps it inside the range; a bar already past a bound
/// is never pushed further out.
pub fn apply_drag(
    start: i32,
    end: i32,
    part: MovingPart,
    diff: i32,
    frame_min: i32,
    frame_max: i32,
) -> (i32, i32) {
    match part {
        MovingPart::Start => {
            let l = start.saturating_add(diff).min(end).max(frame_min.min(end));
            (l, end)
        }
        MovingPart::End => {
            let r = end.saturating_add(diff).max(start).min(frame_max.max(start));
            (start, r)
        }
        MovingPart::Both => {
            let lowest = (i64::from(frame_min) - i64::from(start)).min(0);
            let highest = (i64::from(frame_max) - i64::from(end)).max(0);
            let diff = i64::from(diff).clamp(lowest, highest);
            (
                saturate(i64::from(start) + diff),
                saturate(i64::from(end) + diff),
            )
        }
    }
}

fn saturate(frame: i64) -> i32 {
    frame.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Horizontal mapping between frames and screen pixels for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineLayout {
    pub frame_min: i32,
    pub frame_max: i32,
    /// `max(frame_max - frame_min, 1)`
    pub frame_count: i32,
    pub pixel_width: f32,
    /// Screen x where the timeline starts (right of the legend)
    pub timeline_x: f32,
    pub timeline_width: f32,
    pub visible_frames: i32,
}

impl TimelineLayout {
    pub fn new(
        frame_min: i32,
        frame_max: i32,
        canvas_x: f32,
        canvas_width: f32,
        pixel_width: f32,
    ) -> Self {
        let pixel_width = pixel_width.max(MIN_FRAME_PIXEL_WIDTH);
        let timeline_width = (canvas_width - LEGEND_WIDTH).max(0.0);
        Self {
            frame_min,
            frame_max,
            frame_count: frame_max.saturating_sub(frame_min).max(1),
            pixel_width,
            timeline_x: canvas_x + LEGEND_WIDTH,
            timeline_width,
            visible_frames: (timeline_width / pixel_width).floor() as i32,
        }
    }

    /// Keep `first` inside `[frame_min, max(frame_min, frame_max - visible)]`.
    pub fn clamp_first_frame(&self, first: i32) -> i32 {
        if self.visible_frames >= self.frame_count {
            return self.frame_min;
        }
        let upper = self
            .frame_max
            .saturating_sub(self.visible_frames)
            .max(self.frame_min);
        first.clamp(self.frame_min, upper)
    }

    pub fn frame_to_x(&self, first_frame: i32, frame: f32) -> f32 {
        self.timeline_x + (frame - first_frame as f32) * self.pixel_width
    }

    pub fn x_to_frame(&self, first_frame: i32, x: f32) -> i32 {
        first_frame.saturating_add(((x - self.timeline_x) / self.pixel_width).floor() as i32)
    }

    /// Frames between labelled ticks and between drawn ticks.
    ///
    /// Labels start every 10 frames and double until they are at least 150
    /// pixels apart.
    pub fn tick_steps(&self) -> (i32, i32) {
        let mut modulo = 10;
        let mut step = 1;
        while (modulo as f32) * self.pixel_width < 150.0 {
            modulo *= 2;
            step *= 2;
        }
        (modulo, step)
    }

    /// Last tick at or before `first_frame`; ticks fall every `step` frames
    /// from `frame_min`.
    pub fn first_tick(&self, first_frame: i32, step: i32) -> i32 {
        let step = i64::from(step.max(1));
        let offset = (i64::from(first_frame) - i64::from(self.frame_min)).max(0);
        let tick = i64::from(self.frame_min) + offset / step * step;
        i32::try_from(tick).unwrap_or(self.frame_min)
    }

    /// Width of the scrollbar thumb
    pub fn bar_width(&self) -> f32 {
        (self.visible_frames as f32 / self.frame_count as f32).min(1.0) * self.timeline_width
    }

    /// Offset of the scrollbar thumb from the timeline start
    pub fn bar_offset(&self, first_frame: i32) -> f32 {
        (i64::from(first_frame) - i64::from(self.frame_min)) as f32 / self.frame_count as f32
            * self.timeline_width
    }

    /// First frame after dragging the scrollbar thumb by `dx` pixels
    pub fn scroll_thumb(&self, first_at_grab: i32, dx: f32) -> i32 {
        let bar = self.bar_width();
        if self.visible_frames <= 0 || bar <= 0.0 {
            return first_at_grab;
        }
        let pixels_per_frame = bar / self.visible_frames as f32;
        self.clamp_first_frame(first_at_grab.saturating_add((dx / pixels_per_frame) as i32))
    }
}

/// Frame pixel width after resizing the scrollbar thumb.
pub fn zoom_for_bar_width(pixel_width: f32, bar_width: f32, new_bar_width: f32) -> f32 {
    if bar_width <= 0.0 {
        return pixel_width;
    }
    let new_bar_width = new_bar_width.max(MIN_BAR_WIDTH);
    (pixel_width * bar_width / new_bar_width).clamp(MIN_FRAME_PIXEL_WIDTH, MAX_FRAME_PIXEL_WIDTH)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RowLayout {
    index: usize,
    top: f32,
    custom_height: f32,
}

impl RowLayout {
    fn band(&self, canvas: Rect) -> Rect {
        Rect::new(
            [canvas.min[0], self.top],
            [canvas.max[0], self.top + ITEM_HEIGHT],
        )
    }

    fn full(&self, canvas: Rect) -> Rect {
        Rect::new(
            [canvas.min[0], self.top],
            [canvas.max[0], self.top + ITEM_HEIGHT + self.custom_height],
        )
    }
}

fn layout_rows<S: SequenceInterface + ?Sized>(sequence: &S, content_y: f32) -> Vec<RowLayout> {
    let mut top = content_y;
    (0..sequence.item_count())
        .map(|index| {
            let custom_height = sequence.custom_height(index).max(0.0);
            let row = RowLayout {
                index,
                top,
                custom_height,
            };
            top += ITEM_HEIGHT + custom_height;
            row
        })
        .collect()
}

/// Bar rectangle of `span`, plus the start/end/whole grab rectangles.
fn bar_rects(layout: &TimelineLayout, first_frame: i32, row: &RowLayout, span: &ItemSpan) -> [Rect; 3] {
    let x0 = layout.frame_to_x(first_frame, span.start as f32);
    let x1 = layout.frame_to_x(first_frame, span.end as f32 + 1.0);
    let bar = Rect::new([x0, row.top + 3.0], [x1, row.top + ITEM_HEIGHT - 1.0]);
    let max_handle = (bar.width() / 3.0).max(0.0);
    let min_handle = max_handle.min(10.0);
    let handle = (layout.pixel_width / 2.0).clamp(min_handle, max_handle);
    [
        Rect::new(bar.min, [bar.min[0] + handle, bar.max[1]]),
        Rect::new([bar.max[0] - handle, bar.min[1]], bar.max),
        bar,
    ]
}

fn glyph_rect(pos: [f32; 2]) -> Rect {
    Rect::from_pos_size(pos, [GLYPH_SIZE, GLYPH_SIZE])
}

fn draw_glyph(draw_list: &DrawListMut<'_>, rect: Rect, plus: bool, hovered: bool) {
    let color = if hovered { COLOR_GLYPH_HOVER } else { COLOR_GLYPH };
    let mid_x = rect.min[0] + GLYPH_SIZE / 2.0 - 0.5;
    let mid_y = rect.min[1] + GLYPH_SIZE / 2.0 - 0.5;
    draw_list
        .add_rect(rect.min, rect.max, color)
        .rounding(4.0)
        .build();
    draw_list
        .add_line([rect.min[0] + 3.0, mid_y], [rect.max[0] - 3.0, mid_y], color)
        .thickness(2.0)
        .build();
    if plus {
        draw_list
            .add_line([mid_x, rect.min[1] + 3.0], [mid_x, rect.max[1] - 3.0], color)
            .thickness(2.0)
            .build();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MovingEntry {
    index: usize,
    part: MovingPart,
    anchor_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollGrab {
    Thumb,
    LeftHandle,
    RightHandle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollDrag {
    grab: ScrollGrab,
    anchor_x: f32,
    first_frame: i32,
    pixel_width: f32,
    bar_width: f32,
    visible_frames: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Panning {
    anchor_x: f32,
    first_frame: i32,
}

#[derive(Debug, Default)]
struct FrameActions {
    delete: Option<usize>,
    duplicate: Option<usize>,
    open_add_popup: bool,
}

/// Sequencer widget
///
/// Holds the interaction state that survives between frames (drags, zoom).
/// The data lives in a [`SequenceInterface`], the view in a [`SequencerView`].
#[derive(Debug)]
pub struct Sequencer {
    frame_pixel_width: f32,
    frame_pixel_width_target: f32,
    moving: Option<MovingEntry>,
    moving_current_frame: bool,
    scroll: Option<ScrollDrag>,
    panning: Option<Panning>,
    popup_open: bool,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            frame_pixel_width: DEFAULT_FRAME_PIXEL_WIDTH,
            frame_pixel_width_target: DEFAULT_FRAME_PIXEL_WIDTH,
            moving: None,
            moving_current_frame: false,
            scroll: None,
            panning: None,
            popup_open: false,
        }
    }

    /// Current width of one frame in pixels
    pub fn frame_pixel_width(&self) -> f32 {
        self.frame_pixel_width
    }

    /// Set the zoom level, clamped to `0.1..=50`
    pub fn set_frame_pixel_width(&mut self, width: f32) {
        let width = width.clamp(MIN_FRAME_PIXEL_WIDTH, MAX_FRAME_PIXEL_WIDTH);
        self.frame_pixel_width = width;
        self.frame_pixel_width_target = width;
    }

    /// True while an item bar is being dragged
    pub fn is_editing(&self) -> bool {
        self.moving.is_some()
    }

    /// Draw the sequencer at the cursor position, filling the available width.
    ///
    /// Returns `true` when the selection changed or an item was edited, added,
    /// deleted, duplicated or pasted.
    pub fn show<S: SequenceInterface + ?Sized>(
        &mut self,
        ui: &Ui,
        sequence: &mut S,
        view: &mut SequencerView,
        options: SequencerOptions,
    ) -> bool {
        let _id = ui.push_id("##sequencer");
        let mut changed = false;

        if view
            .selected_entry
            .is_some_and(|i| i >= sequence.item_count())
        {
            view.selected_entry = None;
        }

        let canvas_pos = ui.cursor_screen_pos();
        let avail = ui.content_region_avail();
        let canvas_width = avail[0].max(LEGEND_WIDTH + 1.0);

        self.frame_pixel_width_target = self
            .frame_pixel_width_target
            .clamp(MIN_FRAME_PIXEL_WIDTH, MAX_FRAME_PIXEL_WIDTH);
        self.frame_pixel_width = lerp(self.frame_pixel_width, self.frame_pixel_width_target, 0.33);

        let layout = TimelineLayout::new(
            sequence.frame_min(),
            sequence.frame_max(),
            canvas_pos[0],
            canvas_width,
            self.frame_pixel_width,
        );
        view.first_frame = layout.clamp_first_frame(view.first_frame);

        let mouse = ui.io().mouse_pos();
        let hovered = ui.is_window_hovered() && !self.popup_open;
        let clicked = hovered && ui.is_mouse_clicked(MouseButton::Left);

        let height = if view.expanded {
            let rows = layout_rows(sequence, canvas_pos[1] + HEADER_HEIGHT);
            let control_height: f32 = rows
                .iter()
                .map(|r| ITEM_HEIGHT + r.custom_height)
                .sum();
            HEADER_HEIGHT + control_height + 2.0 + SCROLLBAR_HEIGHT
        } else {
            ITEM_HEIGHT
        };
        let canvas = Rect::from_pos_size(canvas_pos, [canvas_width, height]);

        let expand_rect = glyph_rect([canvas.min[0] + 2.0, canvas.min[1] + 2.0]);
        if clicked && expand_rect.contains(mouse) {
            view.expanded = !view.expanded;
            tracing::trace!("Sequencer expanded: {}", view.expanded);
        }

        let mut actions = FrameActions::default();
        if view.expanded {
            changed |= self.handle_expanded_input(
                ui,
                sequence,
                view,
                options,
                &layout,
                canvas,
                hovered,
                &mut actions,
            );
        }

        // Layout may have changed through double clicks or edits.
        let rows = layout_rows(sequence, canvas_pos[1] + HEADER_HEIGHT);
        let mut custom_draws = Vec::new();
        {
            let draw_list = ui.get_window_draw_list();
            if view.expanded {
                self.draw_expanded(
                    &draw_list,
                    sequence,
                    view,
                    options,
                    &layout,
                    canvas,
                    &rows,
                    mouse,
                    hovered,
                    &mut custom_draws,
                );
            } else {
                draw_list
                    .add_rect(
                        canvas.min,
                        [canvas.max[0], canvas.min[1] + ITEM_HEIGHT],
                        COLOR_HEADER,
                    )
                    .filled(true)
                    .build();
                let label = format!(
                    "{} Frames / {} entries",
                    layout.frame_count,
                    sequence.item_count()
                );
                draw_list.add_text(
                    [canvas.min[0] + 26.0, canvas.min[1] + 2.0],
                    COLOR_TEXT,
                    label,
                );
            }
            draw_glyph(
                &draw_list,
                expand_rect,
                !view.expanded,
                hovered && expand_rect.contains(mouse),
            );
        }

        for (index, area) in custom_draws {
            sequence.custom_draw(ui, index, &area);
        }

        ui.set_cursor_screen_pos(canvas.min);
        let _ = ui.invisible_button("##canvas", canvas.size());

        if actions.open_add_popup {
            ui.open_popup("addEntry");
        }
        self.popup_open = false;
        if let Some(_popup) = ui.begin_popup("addEntry") {
            self.popup_open = true;
            for kind in 0..sequence.item_type_count() {
                if ui.selectable(sequence.item_type_name(kind)) {
                    sequence.add(kind);
                    view.selected_entry = sequence.item_count().checked_sub(1);
                    tracing::debug!("Sequencer added item of type {}", kind);
                    changed = true;
                }
            }
        }

        if let Some(index) = actions.delete {
            sequence.del(index);
            tracing::debug!("Sequencer deleted item {}", index);
            view.selected_entry = match view.selected_entry {
                Some(sel) if sel == index => None,
                Some(sel) if sel > index => Some(sel - 1),
                other => other.filter(|&sel| sel < sequence.item_count()),
            };
            changed = true;
        }
        if let Some(index) = actions.duplicate {
            sequence.duplicate(index);
            tracing::debug!("Sequencer duplicated item {}", index);
            changed = true;
        }

        changed
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_expanded_input<S: SequenceInterface + ?Sized>(
        &mut self,
        ui: &Ui,
        sequence: &mut S,
        view: &mut SequencerView,
        options: SequencerOptions,
        layout: &TimelineLayout,
        canvas: Rect,
        hovered: bool,
        actions: &mut FrameActions,
    ) -> bool {
        let mut changed = false;
        let mouse = ui.io().mouse_pos();
        let clicked = hovered && ui.is_mouse_clicked(MouseButton::Left);
        let left_down = ui.is_mouse_down(MouseButton::Left);
        let rows = layout_rows(sequence, canvas.min[1] + HEADER_HEIGHT);
        let content_bottom = rows
            .last()
            .map_or(canvas.min[1] + HEADER_HEIGHT, |r| r.top + ITEM_HEIGHT + r.custom_height);
        let header = Rect::new(canvas.min, [canvas.max[0], canvas.min[1] + HEADER_HEIGHT]);
        let timeline_header = Rect::new([layout.timeline_x, header.min[1]], header.max);
        let timeline = Rect::new([layout.timeline_x, canvas.min[1]], [canvas.max[0], content_bottom]);
        let busy = self.moving.is_some() || self.moving_current_frame || self.scroll.is_some();

        // Alt + middle drag pans the timeline.
        let alt = ui.is_key_down(Key::LeftAlt) || ui.is_key_down(Key::RightAlt);
        if self.panning.is_none() && hovered && alt && ui.is_mouse_down(MouseButton::Middle) {
            self.panning = Some(Panning {
                anchor_x: mouse[0],
                first_frame: view.first_frame,
            });
        }
        if let Some(pan) = self.panning {
            if ui.is_mouse_down(MouseButton::Middle) {
                let frames = ((mouse[0] - pan.anchor_x) / layout.pixel_width) as i32;
                view.first_frame = layout.clamp_first_frame(pan.first_frame.saturating_sub(frames));
            } else {
                self.panning = None;
            }
        }

        if hovered && timeline.contains(mouse) {
            let ctrl = ui.is_key_down(Key::LeftCtrl) || ui.is_key_down(Key::RightCtrl);
            let wheel = ui.io().mouse_wheel();
            if ctrl && wheel != 0.0 {
                self.frame_pixel_width_target = (self.frame_pixel_width_target * 1.1f32.powf(wheel))
                    .clamp(MIN_FRAME_PIXEL_WIDTH, MAX_FRAME_PIXEL_WIDTH);
            }
            let wheel_h = ui.io().mouse_wheel_h();
            if wheel_h != 0.0 {
                let (_, step) = layout.tick_steps();
                let frames = (wheel_h * (step * 5) as f32) as i32;
                view.first_frame = layout.clamp_first_frame(view.first_frame.saturating_sub(frames));
            }
        }

        // Current frame
        if options.contains(SequencerOptions::CHANGE_FRAME)
            && !busy
            && clicked
            && timeline_header.contains(mouse)
        {
            self.moving_current_frame = true;
        }
        if self.moving_current_frame {
            if left_down {
                view.current_frame = layout
                    .x_to_frame(view.first_frame, mouse[0])
                    .clamp(layout.frame_min, layout.frame_max.max(layout.frame_min));
            } else {
                self.moving_current_frame = false;
            }
        }

        // Legend header: add, copy, paste
        if options.contains(SequencerOptions::ADD) {
            let add = glyph_rect([
                canvas.min[0] + LEGEND_WIDTH - ITEM_HEIGHT,
                canvas.min[1] + 2.0,
            ]);
            if clicked && add.contains(mouse) {
                actions.open_add_popup = true;
            }
        }
        if options.contains(SequencerOptions::COPYPASTE) && hovered && ui.is_mouse_released(MouseButton::Left) {
            if copy_rect(canvas).contains(mouse) {
                sequence.copy();
                tracing::debug!("Sequencer copy");
            }
            if paste_rect(canvas).contains(mouse) {
                sequence.paste();
                tracing::debug!("Sequencer paste");
                changed = true;
            }
        }

        // Legend rows: delete and duplicate
        if options.contains(SequencerOptions::DEL) && clicked {
            for row in &rows {
                let (del, dup) = row_glyphs(canvas, row);
                if del.contains(mouse) {
                    actions.delete = Some(row.index);
                } else if dup.contains(mouse) {
                    actions.duplicate = Some(row.index);
                }
            }
        }

        // Bars
        let double_clicked = hovered && ui.is_mouse_double_clicked(MouseButton::Left);
        let mut grabbed = false;
        if !busy && (clicked || double_clicked) && timeline.contains(mouse) {
            for row in &rows {
                let span = sequence.item(row.index);
                let rects = bar_rects(layout, view.first_frame, row, &span);
                if double_clicked && rects[2].contains(mouse) {
                    sequence.double_click(row.index);
                    grabbed = true;
                    break;
                }
                if !clicked || !options.contains(SequencerOptions::EDIT_STARTEND) {
                    continue;
                }
                let part = [MovingPart::Start, MovingPart::End, MovingPart::Both]
                    .into_iter()
                    .zip(rects)
                    .find_map(|(part, rc)| rc.contains(mouse).then_some(part));
                if let Some(part) = part {
                    self.moving = Some(MovingEntry {
                        index: row.index,
                        part,
                        anchor_x: mouse[0],
                    });
                    sequence.begin_edit(row.index);
                    tracing::trace!("Sequencer begin edit of item {}", row.index);
                    grabbed = true;
                    break;
                }
            }
        }

        // Row selection
        if clicked && !grabbed && actions.delete.is_none() && actions.duplicate.is_none() {
            if let Some(row) = rows.iter().find(|r| r.band(canvas).contains(mouse)) {
                if view.selected_entry != Some(row.index) {
                    view.selected_entry = Some(row.index);
                    changed = true;
                }
            }
        }

        if let Some(mut moving) = self.moving {
            if moving.index < sequence.item_count() {
                let diff = ((mouse[0] - moving.anchor_x) / layout.pixel_width) as i32;
                if diff != 0 {
                    let span = sequence.item(moving.index);
                    let (start, end) = apply_drag(
                        span.start,
                        span.end,
                        moving.part,
                        diff,
                        layout.frame_min,
                        layout.frame_max,
                    );
                    if (start, end) != (span.start, span.end) {
                        sequence.set_item_range(moving.index, start, end);
                        changed = true;
                    }
                    moving.anchor_x += diff as f32 * layout.pixel_width;
                }
                if view.selected_entry != Some(moving.index) {
                    view.selected_entry = Some(moving.index);
                    changed = true;
                }
                self.moving = Some(moving);
            }
            if !left_down || moving.index >= sequence.item_count() {
                self.moving = None;
                sequence.end_edit();
                tracing::trace!("Sequencer end edit of item {}", moving.index);
            }
        }

        self.handle_scrollbar(ui, view, layout, canvas, content_bottom, mouse, clicked);
        changed
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_scrollbar(
        &mut self,
        ui: &Ui,
        view: &mut SequencerView,
        layout: &TimelineLayout,
        canvas: Rect,
        content_bottom: f32,
        mouse: [f32; 2],
        clicked: bool,
    ) {
        let left_down = ui.is_mouse_down(MouseButton::Left);
        if let Some(drag) = self.scroll {
            if !left_down {
                self.scroll = None;
                return;
            }
            let dx = mouse[0] - drag.anchor_x;
            match drag.grab {
                ScrollGrab::Thumb => {
                    view.first_frame = layout.scroll_thumb(drag.first_frame, dx);
                }
                ScrollGrab::RightHandle => {
                    let mut width = zoom_for_bar_width(drag.pixel_width, drag.bar_width, drag.bar_width + dx);
                    let remaining = layout.frame_max.saturating_sub(view.first_frame);
                    if remaining > 0 {
                        width = width.max(layout.timeline_width / remaining as f32);
                    }
                    self.set_frame_pixel_width(width);
                }
                ScrollGrab::LeftHandle => {
                    let width = zoom_for_bar_width(drag.pixel_width, drag.bar_width, drag.bar_width - dx);
                    let last_frame = drag.first_frame.saturating_add(drag.visible_frames);
                    let visible = (layout.timeline_width / width).floor() as i32;
                    let zoomed = TimelineLayout { pixel_width: width, visible_frames: visible, ..*layout };
                    view.first_frame = zoomed.clamp_first_frame(last_frame.saturating_sub(visible));
                    self.set_frame_pixel_width(width);
                }
            }
            return;
        }

        if !clicked || self.moving.is_some() || self.moving_current_frame {
            return;
        }
        let (thumb, left, right) = scrollbar_rects(layout, view.first_frame, canvas, content_bottom);
        let grab = if left.contains(mouse) {
            ScrollGrab::LeftHandle
        } else if right.contains(mouse) {
            ScrollGrab::RightHandle
        } else if thumb.contains(mouse) {
            ScrollGrab::Thumb
        } else {
            return;
        };
        self.scroll = Some(ScrollDrag {
            grab,
            anchor_x: mouse[0],
            first_frame: view.first_frame,
            pixel_width: self.frame_pixel_width,
            bar_width: layout.bar_width(),
            visible_frames: layout.visible_frames,
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_expanded<S: SequenceInterface + ?Sized>(
        &self,
        draw_list: &DrawListMut<'_>,
        sequence: &mut S,
        view: &SequencerView,
        options: SequencerOptions,
        layout: &TimelineLayout,
        canvas: Rect,
        rows: &[RowLayout],
        mouse: [f32; 2],
        hovered: bool,
        custom_draws: &mut Vec<(usize, CustomDrawArea)>,
    ) {
        let content_bottom = rows
            .last()
            .map_or(canvas.min[1] + HEADER_HEIGHT, |r| r.top + ITEM_HEIGHT + r.custom_height);
        let first = view.first_frame;

        draw_list
            .add_rect(canvas.min, canvas.max, COLOR_BACKGROUND)
            .filled(true)
            .build();
        draw_list
            .add_rect(canvas.min, [canvas.max[0], canvas.min[1] + HEADER_HEIGHT], COLOR_HEADER)
            .filled(true)
            .build();

        if options.contains(SequencerOptions::ADD) {
            let add = glyph_rect([canvas.min[0] + LEGEND_WIDTH - ITEM_HEIGHT, canvas.min[1] + 2.0]);
            draw_glyph(draw_list, add, true, hovered && add.contains(mouse));
        }
        if options.contains(SequencerOptions::COPYPASTE) {
            for (rect, label) in [(copy_rect(canvas), "Copy"), (paste_rect(canvas), "Paste")] {
                let color = if hovered && rect.contains(mouse) {
                    COLOR_HOTSPOT
                } else {
                    COLOR_HOTSPOT_IDLE
                };
                draw_list.add_text(rect.min, color, label);
            }
        }

        // Row backgrounds
        for row in rows {
            let mut color = if row.index % 2 == 1 {
                COLOR_ROW_ODD
            } else {
                COLOR_ROW_EVEN
            };
            let mut min_x = layout.timeline_x;
            if hovered && self.moving.is_none() && row.full(canvas).contains(mouse) {
                color = color.wrapping_add(COLOR_ROW_HOVER);
                min_x = canvas.min[0];
            }
            draw_list
                .add_rect(
                    [min_x, row.top + 1.0],
                    [canvas.max[0], row.top + ITEM_HEIGHT + row.custom_height],
                    color,
                )
                .filled(true)
                .build();
        }

        if let Some(row) = view.selected_entry.and_then(|i| rows.get(i)) {
            let band = row.band(canvas);
            draw_list
                .add_rect(band.min, band.max, COLOR_SELECTION)
                .filled(true)
                .rounding(1.0)
                .build();
        }

        // Legend labels and row buttons
        for row in rows {
            draw_list.add_text(
                [canvas.min[0] + 3.0, row.top + 2.0],
                COLOR_TEXT,
                sequence.item_label(row.index),
            );
            if options.contains(SequencerOptions::DEL) {
                let (del, dup) = row_glyphs(canvas, row);
                draw_glyph(draw_list, del, false, hovered && del.contains(mouse));
                draw_glyph(draw_list, dup, true, hovered && dup.contains(mouse));
            }
        }

        let timeline_clip = Rect::new([layout.timeline_x, canvas.min[1]], [canvas.max[0], content_bottom]);
        draw_list.push_clip_rect(timeline_clip.min, timeline_clip.max, true);

        let (modulo, step) = layout.tick_steps();
        let half_modulo = (modulo / 2).max(1);
        let mut frame = layout.first_tick(first, step);
        while frame <= layout.frame_max {
            let x = layout.frame_to_x(first, frame as f32).floor();
            if x > canvas.max[0] {
                break;
            }
            if x >= layout.timeline_x {
                let major = frame % modulo == 0 || frame == layout.frame_min || frame == layout.frame_max;
                let half = frame % half_modulo == 0;
                let tick_start = if major {
                    4.0
                } else if half {
                    10.0
                } else {
                    14.0
                };
                let tick_end = if major { HEADER_HEIGHT } else { ITEM_HEIGHT };
                draw_list
                    .add_line(
                        [x, canvas.min[1] + tick_start],
                        [x, canvas.min[1] + tick_end - 1.0],
                        COLOR_TICK,
                    )
                    .build();
                draw_list
                    .add_line([x, canvas.min[1] + HEADER_HEIGHT], [x, content_bottom - 1.0], COLOR_GRID)
                    .build();
                if major {
                    draw_list.add_text([x + 3.0, canvas.min[1]], COLOR_FRAME_LABEL, frame.to_string());
                }
            }
            match frame.checked_add(step) {
                Some(next) => frame = next,
                None => break,
            }
        }

        // Bars
        for row in rows {
            let span = sequence.item(row.index);
            let rects = bar_rects(layout, first, row, &span);
            let bar = rects[2];
            let color = span.color | 0xFF00_0000;
            let color_half = (span.color & 0x00FF_FFFF) | 0x4000_0000;
            if bar.min[0] <= canvas.max[0] && bar.max[0] >= layout.timeline_x {
                draw_list
                    .add_rect(bar.min, [bar.max[0], bar.max[1] + row.custom_height], color_half)
                    .filled(true)
                    .rounding(2.0)
                    .build();
                draw_list
                    .add_rect(bar.min, bar.max, color)
                    .filled(true)
                    .rounding(2.0)
                    .build();
            }
            if self.moving.is_none() && hovered && options.contains(SequencerOptions::EDIT_STARTEND) {
                let selected = view.selected_entry == Some(row.index);
                let quad_colors = [
                    COLOR_TEXT,
                    COLOR_TEXT,
                    color.wrapping_add(if selected { 0 } else { 0x0020_2020 }),
                ];
                for (rc, quad) in rects.iter().zip(quad_colors).rev() {
                    if rc.contains(mouse) {
                        draw_list.add_rect(rc.min, rc.max, quad).filled(true).rounding(2.0).build();
                    }
                }
            }
        }

        // Current frame cursor
        if view.current_frame >= first && view.current_frame <= layout.frame_max {
            let x = layout.frame_to_x(first, view.current_frame as f32) + layout.pixel_width / 2.0;
            draw_list
                .add_line([x, canvas.min[1]], [x, content_bottom], COLOR_CURSOR)
                .thickness(CURSOR_WIDTH)
                .build();
            draw_list.add_text(
                [x + 10.0, canvas.min[1] + 2.0],
                COLOR_CURSOR_LABEL,
                view.current_frame.to_string(),
            );
        }
        draw_list.pop_clip_rect();

        // Custom content
        let custom_min_x = layout.frame_to_x(first, layout.frame_min as f32 + 0.5);
        let custom_max_x = layout.frame_to_x(first, layout.frame_max as f32 + 1.5);
        for row in rows {
            if row.custom_height > 0.0 {
                let top = row.top + ITEM_HEIGHT;
                let bottom = top + row.custom_height;
                let legend = Rect::new([canvas.min[0], top], [layout.timeline_x, bottom]);
                custom_draws.push((
                    row.index,
                    CustomDrawArea {
                        rect: Rect::new([custom_min_x, top], [custom_max_x, bottom]),
                        legend_rect: legend,
                        clip_rect: Rect::new([layout.timeline_x, top], [canvas.max[0], bottom]),
                        legend_clip_rect: legend,
                    },
                ));
            } else {
                let rect = Rect::new([custom_min_x, row.top], [custom_max_x, row.top + ITEM_HEIGHT]);
                let clip = Rect::new([layout.timeline_x, row.top], [canvas.max[0], row.top + ITEM_HEIGHT]);
                sequence.custom_draw_compact(draw_list, row.index, rect, clip);
            }
        }

        // Scrollbar
        let (thumb, left, right) = scrollbar_rects(layout, first, canvas, content_bottom);
        let track = Rect::new(
            [layout.timeline_x, content_bottom + 2.0],
            [canvas.max[0], content_bottom + 2.0 + SCROLLBAR_HEIGHT],
        );
        draw_list
            .add_rect(track.min, track.max, 0xFF10_1010u32)
            .filled(true)
            .rounding(8.0)
            .build();
        let grab = self.scroll.map(|s| s.grab);
        let thumb_color = if (hovered && track.contains(mouse)) || grab == Some(ScrollGrab::Thumb) {
            0xFF60_6060u32
        } else {
            0xFF50_5050
        };
        draw_list
            .add_rect(thumb.min, thumb.max, thumb_color)
            .filled(true)
            .rounding(6.0)
            .build();
        for (handle, kind) in [(left, ScrollGrab::LeftHandle), (right, ScrollGrab::RightHandle)] {
            let active = (hovered && handle.contains(mouse)) || grab == Some(kind);
            let color = if active { 0xFFAA_AAAAu32 } else { 0xFF66_6666 };
            draw_list
                .add_rect(handle.min, handle.max, color)
                .filled(true)
                .rounding(6.0)
                .build();
        }
    }
}

fn copy_rect(canvas: Rect) -> Rect {
    Rect::new(
        [canvas.min[0] + 100.0, canvas.min[1] + 2.0],
        [canvas.min[0] + 130.0, canvas.min[1] + ITEM_HEIGHT - 2.0],
    )
}

fn paste_rect(canvas: Rect) -> Rect {
    Rect::new(
        [canvas.min[0] + 140.0, canvas.min[1] + 2.0],
        [canvas.min[0] + 170.0, canvas.min[1] + ITEM_HEIGHT - 2.0],
    )
}

/// Delete and duplicate glyph rectangles of a legend row.
fn row_glyphs(canvas: Rect, row: &RowLayout) -> (Rect, Rect) {
    let y = row.top + 4.0;
    let del = glyph_rect([canvas.min[0] + LEGEND_WIDTH - ITEM_HEIGHT + 2.0 - 10.0, y]);
    let dup = glyph_rect([canvas.min[0] + LEGEND_WIDTH - 2.0 * ITEM_HEIGHT + 2.0 - 10.0, y]);
    (del, dup)
}

/// Thumb, left handle and right handle of the scrollbar.
fn scrollbar_rects(layout: &TimelineLayout, first_frame: i32, canvas: Rect, content_bottom: f32) -> (Rect, Rect, Rect) {
    let top = content_bottom + 3.0;
    let bottom = content_bottom + SCROLLBAR_HEIGHT;
    let x0 = (layout.timeline_x + layout.bar_offset(first_frame)).min(canvas.max[0]);
    let x1 = (x0 + layout.bar_width()).min(canvas.max[0]);
    let thumb = Rect::new([x0, top], [x1, bottom]);
    let left = Rect::new(thumb.min, [(x0 + HANDLE_WIDTH).min(x1), bottom]);
    let right = Rect::new([(x1 - HANDLE_WIDTH).max(x0), top], thumb.max);
    (thumb, left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    struct Spans {
        items: Vec<ItemSpan>,
    }

    impl SequenceInterface for Spans {
        fn frame_min(&self) -> i32 {
            0
        }
        fn frame_max(&self) -> i32 {
            100
        }
        fn item_count(&self) -> usize {
            self.items.len()
        }
        fn item(&self, index: usize) -> ItemSpan {
            self.items[index]
        }
        fn set_item_range(&mut self, index: usize, start: i32, end: i32) {
            self.items[index].start = start;
            self.items[index].end = end;
        }
        fn custom_height(&self, index: usize) -> f32 {
            if index == 1 { 50.0 } else { 0.0 }
        }
    }

    fn span(start: i32, end: i32) -> ItemSpan {
        ItemSpan {
            start,
            end,
            kind: 0,
            color: 0xFFAA_8080,
        }
    }

    #[test]
    fn options_edit_all() {
        assert_eq!(
            SequencerOptions::EDIT_ALL,
            SequencerOptions::EDIT_STARTEND | SequencerOptions::CHANGE_FRAME
        );
        assert_eq!(SequencerOptions::ADD.bits(), 16);
        assert_eq!(SequencerOptions::COPYPASTE.bits(), 64);
    }

    #[test]
    fn drag_start_clamps_to_end() {
        assert_eq!(apply_drag(10, 30, MovingPart::Start, 5, 0, 100), (15, 30));
        assert_eq!(apply_drag(10, 30, MovingPart::Start, 40, 0, 100), (30, 30));
        assert_eq!(apply_drag(10, 30, MovingPart::Start, -20, 0, 100), (0, 30));
    }

    #[test]
    fn drag_end_clamps_to_start_and_max() {
        assert_eq!(apply_drag(10, 30, MovingPart::End, -40, 0, 100), (10, 10));
        assert_eq!(apply_drag(10, 30, MovingPart::End, 500, 0, 100), (10, 100));
    }

    #[test]
    fn drag_both_keeps_length() {
        assert_eq!(apply_drag(10, 30, MovingPart::Both, 7, 0, 100), (17, 37));
        assert_eq!(apply_drag(10, 30, MovingPart::Both, -25, 0, 100), (0, 20));
        assert_eq!(apply_drag(10, 30, MovingPart::Both, 90, 0, 100), (80, 100));
        assert_eq!(apply_drag(10, 30, MovingPart::Both, -200, -100, 1000), (-100, -80));
    }

    #[test]
    fn drag_only_clamps_the_moved_part() {
        // end already past frame_max stays where it is
        assert_eq!(apply_drag(10, 150, MovingPart::Start, 5, 0, 100), (15, 150));
        assert_eq!(apply_drag(-20, 50, MovingPart::End, 10, 0, 100), (-20, 60));
    }

    #[test]
    fn drag_both_never_pushes_a_bar_further_out() {
        // longer than the range: no move keeps it inside, so it stays put
        assert_eq!(apply_drag(0, 150, MovingPart::Both, 10, 0, 100), (0, 150));
        assert_eq!(apply_drag(0, 150, MovingPart::Both, -10, 0, 100), (0, 150));
        // hanging off the left edge: may move back in, not further out
        assert_eq!(apply_drag(-20, 50, MovingPart::Both, -10, 0, 100), (-20, 50));
        assert_eq!(apply_drag(-20, 50, MovingPart::Both, 30, 0, 100), (10, 80));
        assert_eq!(apply_drag(-20, 50, MovingPart::Both, 80, 0, 100), (30, 100));
    }

    #[test]
    fn drag_saturates_at_integer_limits() {
        assert_eq!(
            apply_drag(0, 10, MovingPart::Both, i32::MAX, i32::MIN, i32::MAX),
            (i32::MAX - 10, i32::MAX)
        );
        assert_eq!(
            apply_drag(10, 20, MovingPart::Both, i32::MIN, i32::MIN, i32::MAX),
            (i32::MIN + 10, i32::MIN + 20)
        );
        assert_eq!(
            apply_drag(0, 10, MovingPart::End, i32::MAX, i32::MIN, i32::MAX),
            (0, i32::MAX)
        );
    }

    #[test]
    fn layout_survives_extreme_frame_ranges() {
        let layout = TimelineLayout::new(i32::MIN, i32::MAX, 0.0, 600.0, 10.0);
        assert_eq!(layout.frame_count, i32::MAX);
        assert_eq!(layout.clamp_first_frame(0), 0);
        assert_eq!(layout.clamp_first_frame(i32::MAX), i32::MAX - 40);
        assert!(layout.bar_offset(i32::MAX - 40).is_finite());
        assert_eq!(layout.x_to_frame(i32::MAX, 1.0e6), i32::MAX);
        assert_eq!(layout.scroll_thumb(i32::MAX - 40, 1.0e9), i32::MAX - 40);

        let flipped = TimelineLayout::new(i32::MAX, i32::MIN, 0.0, 600.0, 10.0);
        assert_eq!(flipped.frame_count, 1);
    }

    #[test]
    fn first_tick_starts_next_to_the_first_frame() {
        let layout = TimelineLayout::new(-100, 1000, 0.0, 600.0, 10.0);
        assert_eq!(layout.first_tick(-100, 2), -100);
        assert_eq!(layout.first_tick(7, 2), 6);
        assert_eq!(layout.first_tick(7, 5), 5);
        let wide = TimelineLayout::new(i32::MIN, i32::MAX, 0.0, 600.0, 10.0);
        assert_eq!(wide.first_tick(i32::MAX, 1), i32::MAX);
        assert_eq!(wide.first_tick(i32::MIN, 4), i32::MIN);
    }

    #[test]
    fn layout_visible_frames_and_clamp() {
        let layout = TimelineLayout::new(-100, 1000, 0.0, 600.0, 10.0);
        assert_eq!(layout.frame_count, 1100);
        assert_eq!(layout.visible_frames, 40);
        assert_eq!(layout.clamp_first_frame(-500), -100);
        assert_eq!(layout.clamp_first_frame(2000), 960);
        assert_eq!(layout.clamp_first_frame(0), 0);
    }

    #[test]
    fn layout_everything_visible_pins_first_frame() {
        let layout = TimelineLayout::new(0, 20, 0.0, 600.0, 10.0);
        assert_eq!(layout.clamp_first_frame(15), 0);
        let degenerate = TimelineLayout::new(50, 10, 0.0, 600.0, 10.0);
        assert_eq!(degenerate.frame_count, 1);
        assert_eq!(degenerate.clamp_first_frame(3), 50);
    }

    #[test]
    fn frame_x_mapping() {
        let layout = TimelineLayout::new(0, 100, 10.0, 600.0, 10.0);
        assert_relative_eq!(layout.timeline_x, 210.0);
        assert_relative_eq!(layout.frame_to_x(5, 7.0), 230.0);
        assert_eq!(layout.x_to_frame(5, 235.0), 7);
        assert_eq!(layout.x_to_frame(5, 205.0), 4);
    }

    #[test]
    fn tick_steps_double_until_wide_enough() {
        let layout = TimelineLayout::new(0, 100, 0.0, 600.0, 10.0);
        assert_eq!(layout.tick_steps(), (20, 2));
        let layout = TimelineLayout::new(0, 100, 0.0, 600.0, 20.0);
        assert_eq!(layout.tick_steps(), (10, 1));
        let layout = TimelineLayout::new(0, 100, 0.0, 600.0, 1.0);
        assert_eq!(layout.tick_steps(), (160, 16));
    }

    #[test]
    fn scrollbar_geometry() {
        let layout = TimelineLayout::new(0, 400, 0.0, 600.0, 10.0);
        // 40 of 400 frames visible
        assert_relative_eq!(layout.bar_width(), 40.0);
        assert_relative_eq!(layout.bar_offset(100), 100.0);
        assert_eq!(layout.scroll_thumb(100, 20.0), 120);
        assert_eq!(layout.scroll_thumb(100, 10_000.0), 360);
    }

    #[test]
    fn zoom_from_scrollbar_resize() {
        assert_relative_eq!(zoom_for_bar_width(10.0, 100.0, 200.0), 5.0);
        assert_relative_eq!(zoom_for_bar_width(10.0, 100.0, 10.0), 10.0 * 100.0 / MIN_BAR_WIDTH);
        assert_relative_eq!(zoom_for_bar_width(10.0, 100.0, 1.0e6), MIN_FRAME_PIXEL_WIDTH);
        assert_relative_eq!(zoom_for_bar_width(10.0, 0.0, 50.0), 10.0);
    }

    #[test]
    fn rows_stack_custom_heights() {
        let seq = Spans {
            items: vec![span(0, 10), span(5, 20), span(30, 40)],
        };
        let rows = layout_rows(&seq, 100.0);
        let tops: Vec<f32> = rows.iter().map(|r| r.top).collect();
        assert_eq!(tops, vec![100.0, 120.0, 190.0]);
    }

    #[test]
    fn bar_handles_split_the_bar() {
        let layout = TimelineLayout::new(0, 100, 0.0, 600.0, 10.0);
        let row = RowLayout {
            index: 0,
            top: 50.0,
            custom_height: 0.0,
        };
        let [start, end, whole] = bar_rects(&layout, 0, &row, &span(10, 19));
        assert_relative_eq!(whole.min[0], 300.0);
        assert_relative_eq!(whole.max[0], 400.0);
        assert_relative_eq!(start.width(), 10.0);
        assert_relative_eq!(end.min[0], 390.0);
        assert_relative_eq!(whole.min[1], 53.0);
    }

    #[test]
    fn view_selection_is_checked() {
        let seq = Spans {
            items: vec![span(0, 10)],
        };
        let mut view = SequencerView::default();
        assert!(view.select(&seq, 0).is_ok());
        assert_eq!(view.selected_item(&seq), Some(span(0, 10)));
        assert_eq!(
            view.select(&seq, 3),
            Err(SequencerError::ItemOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(view.selected_entry, Some(0));
        view.clear_selection();
        assert_eq!(view.selected_item(&seq), None);
    }

    #[test]
    fn zoom_setter_clamps() {
        let mut sequencer = Sequencer::new();
        sequencer.set_frame_pixel_width(500.0);
        assert_relative_eq!(sequencer.frame_pixel_width(), MAX_FRAME_PIXEL_WIDTH);
        sequencer.set_frame_pixel_width(0.0);
        assert_relative_eq!(sequencer.frame_pixel_width(), MIN_FRAME_PIXEL_WIDTH);
        assert!(!sequencer.is_editing());
    }
}

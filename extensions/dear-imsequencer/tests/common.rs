#![allow(dead_code)]

use dear_imgui_rs::{BackendFlags, Context, MouseButton};
use dear_imsequencer::{CurveDelegate, CurveType, CustomDrawArea, ItemSpan, Rect, SequenceInterface};
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Dear ImGui contexts are global; tests touching one run one at a time.
pub fn test_guard() -> MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner())
}

pub fn new_test_ctx() -> Context {
    let mut ctx = Context::create();
    {
        let io = ctx.io_mut();
        io.set_display_size([1024.0, 768.0]);
        io.set_delta_time(1.0 / 60.0);
        let mut backend_flags = io.backend_flags();
        backend_flags.insert(BackendFlags::HAS_MOUSE_CURSORS | BackendFlags::HAS_SET_MOUSE_POS);
        io.set_backend_flags(backend_flags);
        // Queued events apply in the frame they were queued for.
        io.set_config_input_trickle_event_queue(false);
        io.add_focus_event(true);
        io.add_mouse_pos_event([0.0, 0.0]);
    }
    let _ = ctx.font_atlas_mut().build();
    let _ = ctx.set_ini_filename::<std::path::PathBuf>(None);
    ctx
}

pub fn queue_mouse_left(ctx: &mut Context, pos: [f32; 2], down: bool) {
    let io = ctx.io_mut();
    io.set_delta_time(1.0 / 60.0);
    io.add_mouse_pos_event(pos);
    io.add_mouse_button_event(MouseButton::Left, down);
}

/// Three spans, by default over `-100..=1000`; item `tall` carries a 120 px
/// custom area.
pub struct Track {
    pub range: (i32, i32),
    pub spans: Vec<(i32, i32)>,
    pub tall: Option<usize>,
    pub custom_draws: usize,
    pub compact_draws: usize,
    pub added: Vec<usize>,
    pub double_clicks: Vec<usize>,
}

impl Track {
    pub fn new() -> Self {
        Self {
            range: (-100, 1000),
            spans: vec![(10, 30), (12, 60), (61, 90)],
            tall: Some(1),
            custom_draws: 0,
            compact_draws: 0,
            added: Vec::new(),
            double_clicks: Vec::new(),
        }
    }
}

impl SequenceInterface for Track {
    fn frame_min(&self) -> i32 {
        self.range.0
    }
    fn frame_max(&self) -> i32 {
        self.range.1
    }
    fn item_count(&self) -> usize {
        self.spans.len()
    }
    fn item(&self, index: usize) -> ItemSpan {
        let (start, end) = self.spans[index];
        ItemSpan {
            start,
            end,
            kind: index % 2,
            color: 0xFFAA_8080,
        }
    }
    fn set_item_range(&mut self, index: usize, start: i32, end: i32) {
        self.spans[index] = (start, end);
    }
    fn item_type_count(&self) -> usize {
        2
    }
    fn item_type_name(&self, kind: usize) -> &str {
        ["Camera", "Music"][kind]
    }
    fn add(&mut self, kind: usize) {
        self.spans.push((0, 10));
        self.added.push(kind);
    }
    fn del(&mut self, index: usize) {
        if index < self.spans.len() {
            self.spans.remove(index);
        }
    }
    fn duplicate(&mut self, index: usize) {
        if let Some(&span) = self.spans.get(index) {
            self.spans.push(span);
        }
    }
    fn custom_height(&self, index: usize) -> f32 {
        if self.tall == Some(index) { 120.0 } else { 0.0 }
    }
    fn double_click(&mut self, index: usize) {
        self.double_clicks.push(index);
        self.tall = if self.tall == Some(index) { None } else { Some(index) };
    }
    fn custom_draw(&mut self, _ui: &dear_imgui_rs::Ui, _index: usize, _area: &CustomDrawArea) {
        self.custom_draws += 1;
    }
    fn custom_draw_compact(
        &mut self,
        _draw_list: &dear_imgui_rs::DrawListMut<'_>,
        _index: usize,
        _rect: Rect,
        _clip: Rect,
    ) {
        self.compact_draws += 1;
    }
}

/// Curves over `[0, 0]..[100, 1]` whose points are edited in place.
pub struct Ramp {
    pub points: Vec<Vec<[f32; 2]>>,
}

impl CurveDelegate for Ramp {
    fn curve_count(&self) -> usize {
        self.points.len()
    }
    fn curve_type(&self, _curve_index: usize) -> CurveType {
        CurveType::Smooth
    }
    fn min(&self) -> [f32; 2] {
        [0.0, 0.0]
    }
    fn max(&self) -> [f32; 2] {
        [100.0, 1.0]
    }
    fn curve_color(&self, curve_index: usize) -> u32 {
        [0xFF00_00FF, 0xFF00_FF00][curve_index % 2]
    }
    fn points(&self, curve_index: usize) -> &[[f32; 2]] {
        &self.points[curve_index]
    }
    fn edit_point(&mut self, curve_index: usize, point_index: usize, value: [f32; 2]) -> usize {
        self.points[curve_index][point_index] = value;
        point_index
    }
    fn add_point(&mut self, curve_index: usize, value: [f32; 2]) {
        self.points[curve_index].push(value);
    }
}

pub fn ramp() -> Ramp {
    Ramp {
        points: vec![
            vec![[0.0, 0.0], [50.0, 0.8], [100.0, 0.2]],
            vec![[10.0, 1.0], [90.0, 0.0]],
        ],
    }
}

/// One curve kept sorted by x, like a keyframe track.
pub struct SortedRamp {
    pub points: Vec<[f32; 2]>,
}

impl CurveDelegate for SortedRamp {
    fn curve_count(&self) -> usize {
        1
    }
    fn min(&self) -> [f32; 2] {
        [0.0, 0.0]
    }
    fn max(&self) -> [f32; 2] {
        [100.0, 1.0]
    }
    fn curve_color(&self, _curve_index: usize) -> u32 {
        0xFF00_00FF
    }
    fn points(&self, _curve_index: usize) -> &[[f32; 2]] {
        &self.points
    }
    fn edit_point(&mut self, _curve_index: usize, point_index: usize, value: [f32; 2]) -> usize {
        self.points[point_index] = value;
        self.points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        self.points
            .iter()
            .position(|p| *p == value)
            .unwrap_or(point_index)
    }
    fn add_point(&mut self, _curve_index: usize, value: [f32; 2]) {
        self.points.push(value);
        self.points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    }
}

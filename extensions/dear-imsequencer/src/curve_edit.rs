//! Curve editor widget
//!
//! Edits piecewise curves through their control points. Points are owned by a
//! [`CurveDelegate`]; the editor only keeps the selection and the state of the
//! drag in progress.
//!
//! The editor runs in two modes:
//! - standalone, inside its own child window, with wheel zoom and middle
//!   mouse panning
//! - embedded (a clip rectangle is given), drawing into the current window at
//!   the cursor position. This is how a sequencer row hosts it.

use std::collections::BTreeSet;

use dear_imgui_rs::{DrawListMut, Key, MouseButton, Ui, WindowFlags};

use crate::error::{SequencerError, SequencerResult};
use crate::rect::{Rect, lerp};

/// Distance in pixels under which a curve counts as hovered
pub const CURVE_HOVER_DISTANCE: f32 = 8.0;
/// Number of line segments used per curve segment for interpolated curves
pub const SUB_STEPS: usize = 20;

const POINT_RADIUS: f32 = 4.5;
const POINT_HOVER_HALF_SIZE: f32 = 5.0;

/// Curve types supported by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurveType {
    /// Points only, no curve
    None,
    /// Steps: value holds until the next point
    Discrete,
    /// Straight lines between points
    #[default]
    Linear,
    /// Smoothstep eased between points
    Smooth,
    /// Eased like `Smooth`; control tangents are not edited
    Bezier,
}

/// Reference to one control point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditPoint {
    pub curve_index: usize,
    pub point_index: usize,
}

impl EditPoint {
    pub const fn new(curve_index: usize, point_index: usize) -> Self {
        Self {
            curve_index,
            point_index,
        }
    }
}

/// Data source and edit sink of a [`CurveEditor`]
pub trait CurveDelegate {
    fn curve_count(&self) -> usize;
    fn is_visible(&self, _curve_index: usize) -> bool {
        true
    }
    fn curve_type(&self, _curve_index: usize) -> CurveType {
        CurveType::Linear
    }
    /// Lower-left corner of the displayed value range
    fn min(&self) -> [f32; 2];
    /// Upper-right corner of the displayed value range
    fn max(&self) -> [f32; 2];
    /// Called when the user zooms or pans; ignore it to keep the range fixed
    fn set_range(&mut self, _min: [f32; 2], _max: [f32; 2]) {}
    fn point_count(&self, curve_index: usize) -> usize {
        self.points(curve_index).len()
    }
    fn curve_color(&self, curve_index: usize) -> u32;
    /// Points of a curve, sorted by x
    fn points(&self, curve_index: usize) -> &[[f32; 2]];
    /// Move a point and return its index after the curve was re-sorted
    fn edit_point(&mut self, curve_index: usize, point_index: usize, value: [f32; 2]) -> usize;
    fn add_point(&mut self, curve_index: usize, value: [f32; 2]);
    fn background_color(&self) -> u32 {
        0xFF20_2020
    }
    fn begin_edit(&mut self, _curve_index: usize) {}
    fn end_edit(&mut self) {}
}

/// Hermite smoothstep of `x` between two edges
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span.abs() <= f32::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Point at parameter `t` of the segment `a -> b` for the given curve type
pub fn interpolate(curve_type: CurveType, a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    let t = t.clamp(0.0, 1.0);
    let x = lerp(a[0], b[0], t);
    let y = match curve_type {
        CurveType::Discrete => {
            if t < 1.0 {
                a[1]
            } else {
                b[1]
            }
        }
        CurveType::Smooth | CurveType::Bezier => lerp(a[1], b[1], smoothstep(0.0, 1.0, t)),
        CurveType::None | CurveType::Linear => lerp(a[1], b[1], t),
    };
    [x, y]
}

fn safe_range(min: [f32; 2], max: [f32; 2]) -> [f32; 2] {
    let fix = |r: f32| if r.abs() <= f32::EPSILON { 1.0 } else { r };
    [fix(max[0] - min[0]), fix(max[1] - min[1])]
}

/// Map a value into the unit square, y pointing down.
pub fn value_to_point(value: [f32; 2], min: [f32; 2], max: [f32; 2]) -> [f32; 2] {
    let range = safe_range(min, max);
    [
        (value[0] - min[0]) / range[0],
        1.0 - (value[1] - min[1]) / range[1],
    ]
}

/// Inverse of [`value_to_point`]
pub fn point_to_value(point: [f32; 2], min: [f32; 2], max: [f32; 2]) -> [f32; 2] {
    let range = safe_range(min, max);
    [
        min[0] + point[0] * range[0],
        min[1] + (1.0 - point[1]) * range[1],
    ]
}

/// Distance from `p` to the segment `a -> b`
pub fn distance_to_segment(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let len_sq = ab[0] * ab[0] + ab[1] * ab[1];
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((ap[0] * ab[0] + ap[1] * ab[1]) / len_sq).clamp(0.0, 1.0)
    };
    let closest = [a[0] + ab[0] * t, a[1] + ab[1] * t];
    ((p[0] - closest[0]).powi(2) + (p[1] - closest[1]).powi(2)).sqrt()
}

/// Mapping between curve values and a screen region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveView {
    pub region: Rect,
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl CurveView {
    pub fn new(region: Rect, min: [f32; 2], max: [f32; 2]) -> Self {
        Self { region, min, max }
    }

    pub fn to_screen(&self, value: [f32; 2]) -> [f32; 2] {
        let p = value_to_point(value, self.min, self.max);
        [
            self.region.min[0] + p[0] * self.region.width(),
            self.region.min[1] + p[1] * self.region.height(),
        ]
    }

    pub fn to_value(&self, screen: [f32; 2]) -> [f32; 2] {
        let size = [self.region.width().max(1.0), self.region.height().max(1.0)];
        let p = [
            (screen[0] - self.region.min[0]) / size[0],
            (screen[1] - self.region.min[1]) / size[1],
        ];
        point_to_value(p, self.min, self.max)
    }

    /// Value delta matching a screen delta
    pub fn delta_to_value(&self, delta: [f32; 2]) -> [f32; 2] {
        let range = safe_range(self.min, self.max);
        let size = [self.region.width().max(1.0), self.region.height().max(1.0)];
        [delta[0] / size[0] * range[0], -delta[1] / size[1] * range[1]]
    }

    /// Screen polyline of a curve
    pub fn curve_polyline(&self, curve_type: CurveType, points: &[[f32; 2]]) -> Vec<[f32; 2]> {
        let mut out = Vec::new();
        let Some(first) = points.first() else {
            return out;
        };
        out.push(self.to_screen(*first));
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            match curve_type {
                CurveType::Discrete => {
                    out.push(self.to_screen([b[0], a[1]]));
                    out.push(self.to_screen(b));
                }
                CurveType::Smooth | CurveType::Bezier => {
                    for step in 1..=SUB_STEPS {
                        let t = step as f32 / SUB_STEPS as f32;
                        out.push(self.to_screen(interpolate(curve_type, a, b, t)));
                    }
                }
                CurveType::None | CurveType::Linear => out.push(self.to_screen(b)),
            }
        }
        out
    }

    fn zoomed(&self, anchor: [f32; 2], factor: f32) -> ([f32; 2], [f32; 2]) {
        let scale = |lo: f32, hi: f32, c: f32| (c + (lo - c) * factor, c + (hi - c) * factor);
        let (x0, x1) = scale(self.min[0], self.max[0], anchor[0]);
        let (y0, y1) = scale(self.min[1], self.max[1], anchor[1]);
        ([x0, y0], [x1, y1])
    }
}

/// Visible point under `mouse`, if any
pub fn hovered_point<D: CurveDelegate + ?Sized>(
    delegate: &D,
    view: &CurveView,
    mouse: [f32; 2],
) -> Option<EditPoint> {
    (0..delegate.curve_count())
        .filter(|&c| delegate.is_visible(c))
        .flat_map(|c| {
            delegate
                .points(c)
                .iter()
                .enumerate()
                .map(move |(p, v)| (EditPoint::new(c, p), *v))
        })
        .find(|(_, v)| {
            let s = view.to_screen(*v);
            (s[0] - mouse[0]).abs() <= POINT_HOVER_HALF_SIZE
                && (s[1] - mouse[1]).abs() <= POINT_HOVER_HALF_SIZE
        })
        .map(|(ep, _)| ep)
}

/// Closest visible curve within [`CURVE_HOVER_DISTANCE`] of `mouse`
pub fn hovered_curve<D: CurveDelegate + ?Sized>(
    delegate: &D,
    view: &CurveView,
    mouse: [f32; 2],
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for c in 0..delegate.curve_count() {
        let curve_type = delegate.curve_type(c);
        if !delegate.is_visible(c) || curve_type == CurveType::None {
            continue;
        }
        let line = view.curve_polyline(curve_type, delegate.points(c));
        let distance = line
            .windows(2)
            .map(|s| distance_to_segment(mouse, s[0], s[1]))
            .fold(f32::INFINITY, f32::min);
        if distance <= CURVE_HOVER_DISTANCE && best.is_none_or(|(_, d)| distance < d) {
            best = Some((c, distance));
        }
    }
    best.map(|(c, _)| c)
}

/// Visible points whose screen position lies inside `rect`
pub fn points_in_rect<D: CurveDelegate + ?Sized>(
    delegate: &D,
    view: &CurveView,
    rect: Rect,
) -> Vec<EditPoint> {
    let mut out = Vec::new();
    for c in (0..delegate.curve_count()).filter(|&c| delegate.is_visible(c)) {
        for (p, v) in delegate.points(c).iter().enumerate() {
            if rect.contains(view.to_screen(*v)) {
                out.push(EditPoint::new(c, p));
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
struct PointDrag {
    anchor: [f32; 2],
    last_delta: [f32; 2],
    points: Vec<(EditPoint, [f32; 2])>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pan {
    anchor: [f32; 2],
    min: [f32; 2],
    max: [f32; 2],
}

/// Curve editor widget state
#[derive(Debug, Default)]
pub struct CurveEditor {
    selection: BTreeSet<EditPoint>,
    drag: Option<PointDrag>,
    rect_select: Option<[f32; 2]>,
    pan: Option<Pan>,
}

impl CurveEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected points, ordered by curve then point
    pub fn selection(&self) -> impl Iterator<Item = &EditPoint> {
        self.selection.iter()
    }

    pub fn is_selected(&self, point: EditPoint) -> bool {
        self.selection.contains(&point)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Replace the selection, checking every point exists in `delegate`
    pub fn set_selection<D, I>(&mut self, delegate: &D, points: I) -> SequencerResult<()>
    where
        D: CurveDelegate + ?Sized,
        I: IntoIterator<Item = EditPoint>,
    {
        let mut selection = BTreeSet::new();
        for ep in points {
            let curves = delegate.curve_count();
            if ep.curve_index >= curves {
                return Err(SequencerError::curve_out_of_range(ep.curve_index, curves));
            }
            let len = delegate.point_count(ep.curve_index);
            if ep.point_index >= len {
                return Err(SequencerError::point_out_of_range(
                    ep.curve_index,
                    ep.point_index,
                    len,
                ));
            }
            selection.insert(ep);
        }
        self.selection = selection;
        Ok(())
    }

    /// True while selected points are being dragged
    pub fn is_editing(&self) -> bool {
        self.drag.is_some()
    }

    /// Draw and edit the curves of `delegate` in a `size` region.
    ///
    /// Without `clip` the editor lives in its own child window. With `clip`
    /// it draws at the cursor position of the current window, clipped to that
    /// rectangle. Returns `true` if any point was edited or added.
    pub fn edit<D: CurveDelegate + ?Sized>(
        &mut self,
        ui: &Ui,
        delegate: &mut D,
        size: [f32; 2],
        id: usize,
        clip: Option<Rect>,
    ) -> bool {
        let size = [size[0].max(1.0), size[1].max(1.0)];
        let _id = ui.push_id(id);
        match clip {
            Some(clip) => self.edit_region(ui, delegate, size, Some(clip)),
            None => ui
                .child_window(format!("##curve_edit_{id}"))
                .size(size)
                .border(false)
                .flags(WindowFlags::NO_SCROLLBAR | WindowFlags::NO_SCROLL_WITH_MOUSE | WindowFlags::NO_MOVE)
                .build(ui, || {
                    let avail = ui.content_region_avail();
                    let inner = [avail[0].max(1.0), avail[1].max(1.0)];
                    self.edit_region(ui, delegate, inner, None)
                })
                .unwrap_or(false),
        }
    }

    fn edit_region<D: CurveDelegate + ?Sized>(
        &mut self,
        ui: &Ui,
        delegate: &mut D,
        size: [f32; 2],
        clip: Option<Rect>,
    ) -> bool {
        let mut changed = false;
        let origin = ui.cursor_screen_pos();
        let region = Rect::from_pos_size(origin, size);
        let _ = ui.invisible_button("##curve_canvas", size);
        let hovered = ui.is_item_hovered();
        let visible_area = clip.map_or(region, |c| region.clip(&c));

        let mouse = ui.io().mouse_pos();
        let mouse_in = visible_area.contains(mouse);
        let clicked = hovered && mouse_in && ui.is_mouse_clicked(MouseButton::Left);
        let double_clicked = hovered && mouse_in && ui.is_mouse_double_clicked(MouseButton::Left);
        let left_down = ui.is_mouse_down(MouseButton::Left);

        // Points must not hang on to indices of curves that shrank.
        self.selection.retain(|ep| {
            ep.curve_index < delegate.curve_count() && ep.point_index < delegate.point_count(ep.curve_index)
        });

        if clip.is_none() {
            self.handle_zoom_pan(ui, delegate, region, mouse, hovered && mouse_in);
        }
        let view = CurveView::new(region, delegate.min(), delegate.max());

        let point_under_mouse = if mouse_in {
            hovered_point(delegate, &view, mouse)
        } else {
            None
        };
        let curve_under_mouse = if mouse_in && point_under_mouse.is_none() {
            hovered_curve(delegate, &view, mouse)
        } else {
            None
        };

        if double_clicked && point_under_mouse.is_none() {
            if let Some(curve) = curve_under_mouse {
                let value = view.to_value(mouse);
                delegate.add_point(curve, value);
                tracing::debug!("Added point {:?} to curve {}", value, curve);
                changed = true;
            }
        } else if clicked && self.drag.is_none() {
            if let Some(ep) = point_under_mouse {
                let shift = ui.is_key_down(Key::LeftShift) || ui.is_key_down(Key::RightShift);
                if shift {
                    self.selection.insert(ep);
                } else if !self.selection.contains(&ep) {
                    self.selection.clear();
                    self.selection.insert(ep);
                }
                let points = self
                    .selection
                    .iter()
                    .map(|ep| (*ep, delegate.points(ep.curve_index)[ep.point_index]))
                    .collect();
                delegate.begin_edit(ep.curve_index);
                self.drag = Some(PointDrag {
                    anchor: mouse,
                    last_delta: [0.0, 0.0],
                    points,
                });
            } else {
                self.rect_select = Some(mouse);
            }
        }

        if let Some(mut drag) = self.drag.take() {
            let delta = view.delta_to_value([mouse[0] - drag.anchor[0], mouse[1] - drag.anchor[1]]);
            if delta != drag.last_delta {
                for i in 0..drag.points.len() {
                    let (ep, original) = drag.points[i];
                    let value = [original[0] + delta[0], original[1] + delta[1]];
                    let moved_to = delegate.edit_point(ep.curve_index, ep.point_index, value);
                    for (j, (other, _)) in drag.points.iter_mut().enumerate() {
                        if j != i && other.curve_index == ep.curve_index {
                            other.point_index =
                                index_after_move(other.point_index, ep.point_index, moved_to);
                        }
                    }
                    drag.points[i].0.point_index = moved_to;
                }
                drag.last_delta = delta;
                self.selection = drag.points.iter().map(|(ep, _)| *ep).collect();
                changed = true;
            }
            if left_down {
                self.drag = Some(drag);
            } else {
                delegate.end_edit();
                tracing::trace!("Curve edit released ({} points)", drag.points.len());
            }
        }

        let mut selection_rect = None;
        if let Some(start) = self.rect_select {
            let rect = Rect::from_corners(start, mouse);
            if left_down {
                selection_rect = Some(rect);
            } else {
                let shift = ui.is_key_down(Key::LeftShift) || ui.is_key_down(Key::RightShift);
                if !shift {
                    self.selection.clear();
                }
                self.selection.extend(points_in_rect(delegate, &view, rect));
                self.rect_select = None;
            }
        }

        let draw_list = ui.get_window_draw_list();
        draw_list.push_clip_rect(visible_area.min, visible_area.max, true);
        self.draw(&draw_list, delegate, &view, point_under_mouse, curve_under_mouse);
        if let Some(rect) = selection_rect {
            draw_list
                .add_rect(rect.min, rect.max, 0x40FF_0000u32)
                .filled(true)
                .build();
            draw_list.add_rect(rect.min, rect.max, 0xFFFF_0000u32).build();
        }
        draw_list.pop_clip_rect();

        changed
    }

    fn handle_zoom_pan<D: CurveDelegate + ?Sized>(
        &mut self,
        ui: &Ui,
        delegate: &mut D,
        region: Rect,
        mouse: [f32; 2],
        hovered: bool,
    ) {
        let view = CurveView::new(region, delegate.min(), delegate.max());
        if hovered {
            let wheel = ui.io().mouse_wheel();
            if wheel != 0.0 {
                let (min, max) = view.zoomed(view.to_value(mouse), 1.1f32.powf(-wheel));
                delegate.set_range(min, max);
            }
            if self.pan.is_none() && ui.is_mouse_clicked(MouseButton::Middle) {
                self.pan = Some(Pan {
                    anchor: mouse,
                    min: view.min,
                    max: view.max,
                });
            }
        }
        if let Some(pan) = self.pan {
            if ui.is_mouse_down(MouseButton::Middle) {
                let grab_view = CurveView::new(region, pan.min, pan.max);
                let d = grab_view.delta_to_value([mouse[0] - pan.anchor[0], mouse[1] - pan.anchor[1]]);
                delegate.set_range(
                    [pan.min[0] - d[0], pan.min[1] - d[1]],
                    [pan.max[0] - d[0], pan.max[1] - d[1]],
                );
            } else {
                self.pan = None;
            }
        }
    }

    fn draw<D: CurveDelegate + ?Sized>(
        &self,
        draw_list: &DrawListMut<'_>,
        delegate: &D,
        view: &CurveView,
        point_under_mouse: Option<EditPoint>,
        curve_under_mouse: Option<usize>,
    ) {
        let region = view.region;
        draw_list
            .add_rect(region.min, region.max, delegate.background_color())
            .filled(true)
            .build();
        for k in 0..=4 {
            let y = region.min[1] + region.height() * k as f32 / 4.0;
            let color = if k == 2 { 0x40FF_FFFFu32 } else { 0x20FF_FFFF };
            draw_list
                .add_line([region.min[0], y], [region.max[0], y], color)
                .build();
        }

        let curves: Vec<usize> = (0..delegate.curve_count())
            .filter(|&c| delegate.is_visible(c) && Some(c) != curve_under_mouse)
            .chain(curve_under_mouse)
            .collect();

        for &c in &curves {
            let curve_type = delegate.curve_type(c);
            let points = delegate.points(c);
            let color = delegate.curve_color(c);
            if curve_type != CurveType::None {
                let thickness = if Some(c) == curve_under_mouse { 3.0 } else { 1.3 };
                let line = view.curve_polyline(curve_type, points);
                if let (Some(first), Some(last)) = (line.first(), line.last()) {
                    let faded = (color & 0x00FF_FFFF) | 0x8000_0000;
                    draw_list
                        .add_line([region.min[0], first[1]], *first, faded)
                        .thickness(thickness)
                        .build();
                    draw_list
                        .add_line(*last, [region.max[0], last[1]], faded)
                        .thickness(thickness)
                        .build();
                }
                if line.len() > 1 {
                    draw_list.add_polyline(line, color).thickness(thickness).build();
                }
            }
            for (p, v) in points.iter().enumerate() {
                let ep = EditPoint::new(c, p);
                draw_point(
                    draw_list,
                    view.to_screen(*v),
                    self.selection.contains(&ep),
                    point_under_mouse == Some(ep),
                );
            }
        }
    }
}

/// Index of a point once the curve moved another point from `from` to `to`
fn index_after_move(index: usize, from: usize, to: usize) -> usize {
    if from < to && index > from && index <= to {
        index - 1
    } else if to < from && index >= to && index < from {
        index + 1
    } else {
        index
    }
}

fn draw_point(draw_list: &DrawListMut<'_>, center: [f32; 2], selected: bool, hovered: bool) {
    let r = POINT_RADIUS;
    let diamond = vec![
        [center[0] + r, center[1]],
        [center[0], center[1] + r],
        [center[0] - r, center[1]],
        [center[0], center[1] - r],
    ];
    let mut outline = diamond.clone();
    outline.push(diamond[0]);
    draw_list.add_polyline(diamond, 0xFF00_0000u32).filled(true).build();
    let (color, thickness) = if selected {
        (0xFFFF_FFFFu32, 3.0)
    } else if hovered {
        (0xFF80_B0FF, 2.0)
    } else {
        (0xFF00_80FF, 2.0)
    };
    draw_list.add_polyline(outline, color).thickness(thickness).build();
}

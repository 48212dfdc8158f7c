//! Three fixed-capacity curves fed to the curve editor.

use dear_imsequencer::{CurveDelegate, CurveType};

/// Capacity of every curve
pub const MAX_POINTS: usize = 8;
pub const CURVE_COUNT: usize = 3;

const CURVE_COLORS: [u32; CURVE_COUNT] = [0xFF00_00FF, 0xFF00_FF00, 0xFFFF_0000];

#[derive(Debug, Clone, PartialEq)]
pub struct RampEdit {
    points: [Vec<[f32; 2]>; CURVE_COUNT],
    visible: [bool; CURVE_COUNT],
    min: [f32; 2],
    max: [f32; 2],
}

impl Default for RampEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl RampEdit {
    pub fn new() -> Self {
        Self {
            points: [
                vec![[-10.0, 0.0], [20.0, 0.6], [25.0, 0.2], [70.0, 0.4], [120.0, 1.0]],
                vec![[-50.0, 0.2], [33.0, 0.7], [80.0, 0.2], [82.0, 0.8]],
                vec![
                    [40.0, 0.0],
                    [60.0, 0.1],
                    [90.0, 0.82],
                    [150.0, 0.24],
                    [200.0, 0.34],
                    [250.0, 0.12],
                ],
            ],
            visible: [true; CURVE_COUNT],
            min: [0.0, 0.0],
            max: [1.0, 1.0],
        }
    }

    pub fn toggle_visible(&mut self, curve_index: usize) {
        if let Some(v) = self.visible.get_mut(curve_index) {
            *v = !*v;
        }
    }

    fn sort(&mut self, curve_index: usize) {
        self.points[curve_index].sort_by(|a, b| a[0].total_cmp(&b[0]));
    }
}

impl CurveDelegate for RampEdit {
    fn curve_count(&self) -> usize {
        CURVE_COUNT
    }

    fn is_visible(&self, curve_index: usize) -> bool {
        self.visible.get(curve_index).copied().unwrap_or(false)
    }

    fn curve_type(&self, _curve_index: usize) -> CurveType {
        CurveType::Smooth
    }

    fn min(&self) -> [f32; 2] {
        self.min
    }

    fn max(&self) -> [f32; 2] {
        self.max
    }

    fn set_range(&mut self, min: [f32; 2], max: [f32; 2]) {
        self.min = min;
        self.max = max;
    }

    fn curve_color(&self, curve_index: usize) -> u32 {
        CURVE_COLORS[curve_index % CURVE_COUNT]
    }

    fn points(&self, curve_index: usize) -> &[[f32; 2]] {
        self.points.get(curve_index).map_or(&[], Vec::as_slice)
    }

    fn edit_point(&mut self, curve_index: usize, point_index: usize, value: [f32; 2]) -> usize {
        let Some(point) = self
            .points
            .get_mut(curve_index)
            .and_then(|c| c.get_mut(point_index))
        else {
            return point_index;
        };
        *point = value;
        self.sort(curve_index);
        let index = self.points[curve_index]
            .iter()
            .position(|p| p[0] == value[0])
            .unwrap_or(point_index);
        tracing::trace!("Ramp curve {} point {} -> {}", curve_index, point_index, index);
        index
    }

    fn add_point(&mut self, curve_index: usize, value: [f32; 2]) {
        let Some(curve) = self.points.get_mut(curve_index) else {
            return;
        };
        if curve.len() >= MAX_POINTS {
            tracing::debug!("Ramp curve {} is full, point dropped", curve_index);
            return;
        }
        curve.push(value);
        self.sort(curve_index);
    }

    fn background_color(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn initial_curves() {
        let ramp = RampEdit::new();
        assert_eq!(ramp.curve_count(), 3);
        assert_eq!(ramp.point_count(0), 5);
        assert_eq!(ramp.point_count(1), 4);
        assert_eq!(ramp.point_count(2), 6);
        assert_eq!(ramp.curve_color(1), 0xFF00_FF00);
        assert_eq!(ramp.curve_type(2), CurveType::Smooth);
        assert_eq!(ramp.background_color(), 0);
        assert_eq!((ramp.min(), ramp.max()), ([0.0, 0.0], [1.0, 1.0]));
        assert!((0..3).all(|c| ramp.is_visible(c)));
    }

    #[test]
    fn edit_point_resorts_and_tracks_index() {
        let mut ramp = RampEdit::new();
        let index = ramp.edit_point(0, 0, [30.0, 0.5]);
        assert_eq!(index, 2);
        assert_eq!(ramp.points(0)[2], [30.0, 0.5]);
        let xs: Vec<f32> = ramp.points(0).iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![20.0, 25.0, 30.0, 70.0, 120.0]);
    }

    #[test]
    fn edit_point_keeps_order_of_equal_x() {
        let mut ramp = RampEdit::new();
        let index = ramp.edit_point(1, 3, [80.0, 0.9]);
        assert_eq!(index, 2);
        assert_eq!(ramp.points(1)[2], [80.0, 0.2]);
        assert_eq!(ramp.points(1)[3], [80.0, 0.9]);
    }

    #[test]
    fn add_point_respects_capacity() {
        let mut ramp = RampEdit::new();
        ramp.add_point(2, [0.0, 0.5]);
        ramp.add_point(2, [300.0, 0.5]);
        assert_eq!(ramp.point_count(2), MAX_POINTS);
        assert_eq!(ramp.points(2)[0], [0.0, 0.5]);
        ramp.add_point(2, [100.0, 0.5]);
        assert_eq!(ramp.point_count(2), MAX_POINTS);
    }

    #[test]
    fn visibility_and_range() {
        let mut ramp = RampEdit::new();
        ramp.toggle_visible(1);
        assert!(!ramp.is_visible(1));
        ramp.toggle_visible(1);
        assert!(ramp.is_visible(1));
        ramp.toggle_visible(9);

        ramp.set_range([-100.0, 0.0], [1000.0, 1.0]);
        assert_eq!(ramp.min(), [-100.0, 0.0]);
        assert_eq!(ramp.max(), [1000.0, 1.0]);
    }
}

//! Screen-space rectangles shared by the sequencer and the curve editor.

/// Axis-aligned rectangle in screen coordinates (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Upper-left corner
    pub min: [f32; 2],
    /// Lower-right corner
    pub max: [f32; 2],
}

impl Rect {
    pub const fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    pub fn from_pos_size(pos: [f32; 2], size: [f32; 2]) -> Self {
        Self {
            min: pos,
            max: [pos[0] + size[0], pos[1] + size[1]],
        }
    }

    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    pub fn size(&self) -> [f32; 2] {
        [self.width(), self.height()]
    }

    /// Min-inclusive, max-exclusive containment (Dear ImGui's `ImRect::Contains`)
    pub fn contains(&self, p: [f32; 2]) -> bool {
        p[0] >= self.min[0] && p[1] >= self.min[1] && p[0] < self.max[0] && p[1] < self.max[1]
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        other.min[1] < self.max[1]
            && other.max[1] > self.min[1]
            && other.min[0] < self.max[0]
            && other.max[0] > self.min[0]
    }

    /// Intersection with `other`; collapses to an empty rect when disjoint.
    pub fn clip(&self, other: &Rect) -> Rect {
        let min = [self.min[0].max(other.min[0]), self.min[1].max(other.min[1])];
        let max = [
            self.max[0].min(other.max[0]).max(min[0]),
            self.max[1].min(other.max[1]).max(min[1]),
        ];
        Rect { min, max }
    }

    pub fn translate(&self, d: [f32; 2]) -> Rect {
        Rect {
            min: [self.min[0] + d[0], self.min[1] + d[1]],
            max: [self.max[0] + d[0], self.max[1] + d[1]],
        }
    }

    /// Rectangle spanned by two arbitrary corners.
    pub fn from_corners(a: [f32; 2], b: [f32; 2]) -> Rect {
        Rect {
            min: [a[0].min(b[0]), a[1].min(b[1])],
            max: [a[0].max(b[0]), a[1].max(b[1])],
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

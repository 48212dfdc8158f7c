//! Camera matrices in ImGuizmo layout (column-major `[f32; 16]`).

use glam::Vec3;

pub type Matrix = [f32; 16];

#[rustfmt::skip]
pub const IDENTITY: Matrix = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

const PI: f32 = 3.141592;

pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, znear: f32, zfar: f32) -> Matrix {
    let temp = 2.0 * znear;
    let temp2 = right - left;
    let temp3 = top - bottom;
    let temp4 = zfar - znear;
    let mut m = [0.0; 16];
    m[0] = temp / temp2;
    m[5] = temp / temp3;
    m[8] = (right + left) / temp2;
    m[9] = (top + bottom) / temp3;
    m[10] = (-zfar - znear) / temp4;
    m[11] = -1.0;
    m[14] = (-temp * zfar) / temp4;
    m
}

/// Perspective projection. `fovy_deg` is fed whole to `tan`, so the actual
/// vertical field of view is wider than the number suggests.
pub fn perspective(fovy_deg: f32, aspect: f32, znear: f32, zfar: f32) -> Matrix {
    let ymax = znear * (fovy_deg * PI / 180.0).tan();
    let xmax = ymax * aspect;
    frustum(-xmax, xmax, -ymax, ymax, znear, zfar)
}

pub fn orthographic(l: f32, r: f32, b: f32, t: f32, zn: f32, zf: f32) -> Matrix {
    let mut m = [0.0; 16];
    m[0] = 2.0 / (r - l);
    m[5] = 2.0 / (t - b);
    m[10] = 1.0 / (zf - zn);
    m[12] = (l + r) / (l - r);
    m[13] = (t + b) / (b - t);
    m[14] = zn / (zn - zf);
    m[15] = 1.0;
    m
}

// Zero vectors stay zero instead of turning into NaN.
fn normalize(v: Vec3) -> Vec3 {
    v / (v.length() + f32::EPSILON)
}

/// View matrix looking from `eye` at `at`.
pub fn look_at(eye: [f32; 3], at: [f32; 3], up: [f32; 3]) -> Matrix {
    let eye = Vec3::from_array(eye);
    let z = normalize(eye - Vec3::from_array(at));
    let y = normalize(Vec3::from_array(up));
    let x = normalize(y.cross(z));
    let y = normalize(z.cross(x));

    #[rustfmt::skip]
    let m = [
        x.x, y.x, z.x, 0.0,
        x.y, y.y, z.y, 0.0,
        x.z, y.z, z.z, 0.0,
        -x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0,
    ];
    m
}

/// Rotation of `angle` radians about +Y.
pub fn rotation_y(angle: f32) -> Matrix {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY;
    m[0] = c;
    m[2] = -s;
    m[8] = s;
    m[10] = c;
    m
}

/// Camera orbiting the origin, driven by the "Editor" window sliders.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrbitCamera {
    pub is_perspective: bool,
    /// Field of view in degrees, perspective only
    pub fov: f32,
    /// Half width of the orthographic volume
    pub view_width: f32,
    /// Radians
    pub y_angle: f32,
    /// Radians
    pub x_angle: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            is_perspective: false,
            fov: 27.0,
            view_width: 10.0,
            y_angle: 165.0_f32.to_radians(),
            x_angle: 52.0_f32.to_radians(),
            distance: 8.0,
        }
    }
}

impl OrbitCamera {
    pub fn projection(&self, display_size: [f32; 2]) -> Matrix {
        let [w, h] = display_size;
        let degenerate = w <= 0.0 || h <= 0.0;
        if self.is_perspective {
            let aspect = if degenerate { 1.0 } else { w / h };
            perspective(self.fov, aspect, 0.1, 100.0)
        } else {
            let vw = self.view_width;
            let vh = if degenerate { vw } else { vw * h / w };
            orthographic(-vw, vw, -vh, vh, -vw, vw)
        }
    }

    pub fn eye(&self) -> [f32; 3] {
        let (sy, cy) = self.y_angle.sin_cos();
        let (sx, cx) = self.x_angle.sin_cos();
        [cy * cx * self.distance, sx * self.distance, sy * cx * self.distance]
    }

    pub fn view(&self) -> Matrix {
        look_at(self.eye(), [0.0; 3], [0.0, 1.0, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn transform_point(m: &Matrix, p: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (row, o) in out.iter_mut().enumerate() {
            *o = m[row] * p[0] + m[4 + row] * p[1] + m[8 + row] * p[2] + m[12 + row];
        }
        out
    }

    #[test]
    fn frustum_entries() {
        let m = frustum(-1.0, 1.0, -2.0, 2.0, 1.0, 11.0);
        assert_relative_eq!(m[0], 1.0);
        assert_relative_eq!(m[5], 0.5);
        assert_relative_eq!(m[8], 0.0);
        assert_relative_eq!(m[9], 0.0);
        assert_relative_eq!(m[10], -1.2);
        assert_relative_eq!(m[11], -1.0);
        assert_relative_eq!(m[14], -2.2);
        assert_eq!(m[15], 0.0);
    }

    #[test]
    fn perspective_uses_full_angle() {
        let m = perspective(45.0, 2.0, 1.0, 100.0);
        let ymax = (45.0 * PI / 180.0).tan();
        assert_relative_eq!(m[5], 1.0 / ymax, epsilon = 1e-5);
        assert_relative_eq!(m[0], 1.0 / (ymax * 2.0), epsilon = 1e-5);
    }

    #[test]
    fn orthographic_entries() {
        let m = orthographic(-10.0, 10.0, -5.0, 5.0, -10.0, 10.0);
        assert_relative_eq!(m[0], 0.1);
        assert_relative_eq!(m[5], 0.2);
        assert_relative_eq!(m[10], 0.05);
        assert_relative_eq!(m[12], 0.0);
        assert_relative_eq!(m[13], 0.0);
        assert_relative_eq!(m[14], 0.5);
        assert_eq!(m[15], 1.0);
    }

    #[test]
    fn look_at_moves_target_onto_negative_z() {
        let eye = [3.0, 4.0, 5.0];
        let m = look_at(eye, [0.0; 3], [0.0, 1.0, 0.0]);
        let target = transform_point(&m, [0.0; 3]);
        let dist = (3.0f32 * 3.0 + 16.0 + 25.0).sqrt();
        assert_relative_eq!(target[0], 0.0, epsilon = 1e-4);
        assert_relative_eq!(target[1], 0.0, epsilon = 1e-4);
        assert_relative_eq!(target[2], -dist, epsilon = 1e-4);
        let at_eye = transform_point(&m, eye);
        for c in at_eye {
            assert_relative_eq!(c, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn look_at_degenerate_eye_is_zero_not_nan() {
        let m = look_at([0.0; 3], [0.0; 3], [0.0, 1.0, 0.0]);
        assert!(m.iter().all(|v| v.is_finite()));
        assert_eq!(m[2], 0.0);
    }

    #[test]
    fn rotation_y_zero_is_identity() {
        assert_eq!(rotation_y(0.0), IDENTITY);
        let quarter = rotation_y(std::f32::consts::FRAC_PI_2);
        let p = transform_point(&quarter, [1.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(p[2], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn orbit_camera_defaults_and_eye() {
        let cam = OrbitCamera::default();
        assert!(!cam.is_perspective);
        assert_relative_eq!(cam.y_angle.to_degrees(), 165.0, epsilon = 1e-4);
        let eye = cam.eye();
        let len = (eye[0] * eye[0] + eye[1] * eye[1] + eye[2] * eye[2]).sqrt();
        assert_relative_eq!(len, cam.distance, epsilon = 1e-4);
        assert_relative_eq!(eye[1], 52.0_f32.to_radians().sin() * 8.0, epsilon = 1e-4);
    }

    #[test]
    fn orbit_projection_handles_degenerate_display() {
        let mut cam = OrbitCamera::default();
        let ortho = cam.projection([1280.0, 720.0]);
        assert_relative_eq!(ortho[0], 0.1);
        assert_relative_eq!(ortho[5], 1.0 / (10.0 * 720.0 / 1280.0), epsilon = 1e-5);
        assert!(cam.projection([0.0, 0.0]).iter().all(|v| v.is_finite()));

        cam.is_perspective = true;
        let p = cam.projection([0.0, 100.0]);
        assert!(p.iter().all(|v| v.is_finite()));
        assert_relative_eq!(p[0], p[5], epsilon = 1e-5);
    }
}

//! Runner configuration.

use std::path::PathBuf;

use crate::camera::OrbitCamera;

/// Redraw behaviour of the event loop
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RedrawMode {
    /// Always redraw (ControlFlow::Poll)
    Poll,
    /// Redraw on input only (ControlFlow::Wait)
    Wait,
    /// Redraw at most `fps` times per second (ControlFlow::WaitUntil)
    WaitUntil { fps: f32 },
}

/// Built-in Dear ImGui color themes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Theme {
    Dark,
    Light,
    Classic,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemoConfig {
    pub window_title: String,
    /// Logical size
    pub window_size: (f64, f64),
    pub clear_color: [f32; 4],
    /// `None` disables `imgui.ini` persistence
    pub ini_filename: Option<PathBuf>,
    pub theme: Option<Theme>,
    pub redraw: RedrawMode,
    /// Request an sRGB framebuffer
    pub srgb: bool,
    pub camera: OrbitCamera,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window_title: "imguizmo example".to_owned(),
            window_size: (1280.0, 720.0),
            clear_color: [0.45, 0.4, 0.4, 1.0],
            ini_filename: None,
            theme: Some(Theme::Dark),
            redraw: RedrawMode::Poll,
            srgb: true,
            camera: OrbitCamera::default(),
        }
    }
}

impl DemoConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_ini_filename(mut self, path: Option<PathBuf>) -> Self {
        self.ini_filename = path;
        self
    }

    pub fn with_theme(mut self, theme: Option<Theme>) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_redraw(mut self, redraw: RedrawMode) -> Self {
        self.redraw = redraw;
        self
    }

    pub fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }

    pub fn with_camera(mut self, camera: OrbitCamera) -> Self {
        self.camera = camera;
        self
    }

    /// Physical framebuffer size used before the first resize event
    pub(crate) fn initial_surface_size(&self) -> (u32, u32) {
        let (w, h) = self.window_size;
        ((w.round() as u32).max(1), (h.round() as u32).max(1))
    }
}

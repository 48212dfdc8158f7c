use thiserror::Error;

/// Failures of window, GL context and renderer setup, and of frame rendering
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window creation failed: {0}")]
    Window(String),
    #[error("No suitable GL config: {0}")]
    GlConfig(String),
    #[error("GL error: {0}")]
    Gl(#[from] glutin::error::Error),
    #[error("Window handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),
    #[error("Renderer initialization failed: {0}")]
    RendererInit(#[from] dear_imgui_glow::InitError),
    #[error("Rendering failed: {0}")]
    Render(#[from] dear_imgui_glow::RenderError),
    #[error("Dear ImGui error: {0}")]
    ImGui(String),
}

pub type DemoResult<T> = Result<T, DemoError>;

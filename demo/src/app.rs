//! Winit + glutin + glow runner hosting [`DemoState`].

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dear_imgui_glow::GlowRenderer;
use dear_imgui_glow::glow::{self, HasContext};
use dear_imgui_rs::{Context, Ui};
use dear_imgui_winit::{HiDpiMode, WinitPlatform};
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};
use raw_window_handle::HasWindowHandle;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::config::{DemoConfig, RedrawMode, Theme};
use crate::error::{DemoError, DemoResult};
use crate::state::DemoState;

struct ImguiState {
    context: Context,
    platform: WinitPlatform,
    renderer: GlowRenderer,
    last_frame: Instant,
    pending_theme: Option<Theme>,
}

struct AppWindow {
    window: Arc<Window>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    imgui: ImguiState,
}

// glutin fails the build before calling the picker when no config matches.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best })
        .unwrap_or_else(|| unreachable!("glutin offered no GL config"))
}

fn apply_theme(ui: &Ui, theme: Theme) {
    match theme {
        Theme::Dark => ui.style_colors_dark(),
        Theme::Light => ui.style_colors_light(),
        Theme::Classic => ui.style_colors_classic(),
    }
}

impl AppWindow {
    fn new(event_loop: &ActiveEventLoop, cfg: &DemoConfig) -> DemoResult<Self> {
        let (width, height) = cfg.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(cfg.window_title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let (window, gl_config) = glutin_winit::DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|e| DemoError::GlConfig(e.to_string()))?;
        let window = window
            .map(Arc::new)
            .ok_or_else(|| DemoError::Window("display builder returned no window".into()))?;

        let raw_handle = window.window_handle()?.as_raw();
        let context_attribs = ContextAttributesBuilder::new().build(Some(raw_handle));
        let context = unsafe {
            gl_config
                .display()
                .create_context(&gl_config, &context_attribs)?
        };

        let (sw, sh) = cfg.initial_surface_size();
        let surface_attribs = SurfaceAttributesBuilder::<WindowSurface>::new()
            .with_srgb(Some(cfg.srgb))
            .build(
                raw_handle,
                NonZeroU32::new(sw).unwrap_or(NonZeroU32::MIN),
                NonZeroU32::new(sh).unwrap_or(NonZeroU32::MIN),
            );
        let surface = unsafe {
            gl_config
                .display()
                .create_window_surface(&gl_config, &surface_attribs)?
        };
        let context = context.make_current(&surface)?;
        info!("GL context created ({} samples)", gl_config.num_samples());

        let mut imgui_context = Context::create();
        imgui_context
            .set_ini_filename(cfg.ini_filename.clone())
            .map_err(|e| DemoError::ImGui(e.to_string()))?;

        let mut platform = WinitPlatform::new(&mut imgui_context);
        platform.attach_window(&window, HiDpiMode::Default, &mut imgui_context);

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s| {
                context.display().get_proc_address(s).cast()
            })
        };
        let mut renderer = GlowRenderer::new(gl, &mut imgui_context)?;
        renderer.set_framebuffer_srgb_enabled(cfg.srgb);
        renderer.new_frame()?;

        Ok(Self {
            window,
            surface,
            context,
            imgui: ImguiState {
                context: imgui_context,
                platform,
                renderer,
                last_frame: Instant::now(),
                pending_theme: cfg.theme,
            },
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if let (Some(w), Some(h)) = (
            NonZeroU32::new(new_size.width),
            NonZeroU32::new(new_size.height),
        ) {
            self.surface.resize(&self.context, w, h);
        }
    }

    fn render(&mut self, state: &mut DemoState, clear_color: [f32; 4]) -> DemoResult<()> {
        let now = Instant::now();
        let delta_time = now - self.imgui.last_frame;
        self.imgui
            .context
            .io_mut()
            .set_delta_time(delta_time.as_secs_f32().max(f32::EPSILON));
        self.imgui.last_frame = now;

        self.imgui
            .platform
            .prepare_frame(&self.window, &mut self.imgui.context);
        let ui = self.imgui.context.frame();

        if let Some(theme) = self.imgui.pending_theme.take() {
            apply_theme(ui, theme);
        }
        state.frame(ui);

        if let Some(gl) = self.imgui.renderer.gl_context() {
            let [r, g, b, a] = clear_color;
            unsafe {
                gl.clear_color(r, g, b, a);
                gl.clear(glow::COLOR_BUFFER_BIT);
            }
        }

        self.imgui.platform.prepare_render_with_ui(ui, &self.window);
        let draw_data = self.imgui.context.render();

        self.imgui.renderer.new_frame()?;
        self.imgui.renderer.render(&draw_data)?;

        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}

struct App {
    cfg: DemoConfig,
    state: DemoState,
    window: Option<AppWindow>,
    last_wake: Instant,
    /// First fatal error; returned from [`run`] once the loop exits
    fatal: Option<DemoError>,
}

impl App {
    fn new(cfg: DemoConfig) -> Self {
        let state = DemoState::new(cfg.camera);
        Self {
            cfg,
            state,
            window: None,
            last_wake: Instant::now(),
            fatal: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match AppWindow::new(event_loop, &self.cfg) {
            Ok(window) => {
                window.window.request_redraw();
                self.window = Some(window);
                info!("Window created");
            }
            Err(e) => {
                error!("Failed to create window: {e}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_mut() else {
            return;
        };

        let full_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        window
            .imgui
            .platform
            .handle_event(&mut window.imgui.context, &window.window, &full_event);

        match event {
            WindowEvent::Resized(physical_size) => {
                window.resize(physical_size);
                window.window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = window.window.inner_size();
                window.resize(new_size);
                window.window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.logical_key == Key::Named(NamedKey::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = window.render(&mut self.state, self.cfg.clear_color) {
                    error!("Render error: {e}");
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        let now = Instant::now();
        let schedule = RedrawSchedule::next(self.cfg.redraw, self.last_wake, now);
        if schedule.redraw {
            window.window.request_redraw();
            self.last_wake = now;
        }
        if let Some(deadline) = schedule.wake_at {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}

/// What `about_to_wait` does for a [`RedrawMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RedrawSchedule {
    redraw: bool,
    /// `WaitUntil` deadline to arm, if any
    wake_at: Option<Instant>,
}

impl RedrawSchedule {
    fn next(mode: RedrawMode, last_wake: Instant, now: Instant) -> Self {
        match mode {
            RedrawMode::Poll => Self {
                redraw: true,
                wake_at: None,
            },
            RedrawMode::Wait => Self {
                redraw: false,
                wake_at: None,
            },
            RedrawMode::WaitUntil { fps } => {
                let frame = Duration::from_secs_f32(1.0 / fps.max(1.0));
                let redraw = now.saturating_duration_since(last_wake) >= frame;
                let wake_at = if redraw { now + frame } else { last_wake + frame };
                Self {
                    redraw,
                    wake_at: Some(wake_at),
                }
            }
        }
    }
}

/// Open the demo window and run until it closes.
///
/// Window or GL context creation failure ends the loop and is returned.
pub fn run(cfg: DemoConfig) -> DemoResult<()> {
    let event_loop = EventLoop::new()?;
    match cfg.redraw {
        RedrawMode::Poll => event_loop.set_control_flow(ControlFlow::Poll),
        RedrawMode::Wait => event_loop.set_control_flow(ControlFlow::Wait),
        RedrawMode::WaitUntil { .. } => event_loop.set_control_flow(ControlFlow::WaitUntil(
            Instant::now() + Duration::from_millis(16),
        )),
    }

    let mut app = App::new(cfg);
    info!("Starting imguizmo demo event loop");
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn poll_redraws_without_deadline() {
        let now = Instant::now();
        let schedule = RedrawSchedule::next(RedrawMode::Poll, now, now);
        assert_eq!(
            schedule,
            RedrawSchedule {
                redraw: true,
                wake_at: None
            }
        );
        assert!(!RedrawSchedule::next(RedrawMode::Wait, now, now).redraw);
    }

    #[test]
    fn wait_until_caps_the_frame_rate() {
        let mode = RedrawMode::WaitUntil { fps: 10.0 };
        let frame = Duration::from_secs_f32(1.0 / 10.0);
        let last_wake = Instant::now();

        // Woken early by input: no frame yet, sleep until the interval ends.
        let early = last_wake + Duration::from_millis(30);
        assert_eq!(
            RedrawSchedule::next(mode, last_wake, early),
            RedrawSchedule {
                redraw: false,
                wake_at: Some(last_wake + frame)
            }
        );

        let due = last_wake + Duration::from_millis(120);
        assert_eq!(
            RedrawSchedule::next(mode, last_wake, due),
            RedrawSchedule {
                redraw: true,
                wake_at: Some(due + frame)
            }
        );
    }

    #[test]
    fn wait_until_clamps_fps_to_one() {
        let last_wake = Instant::now();
        let schedule =
            RedrawSchedule::next(RedrawMode::WaitUntil { fps: 0.0 }, last_wake, last_wake);
        assert!(!schedule.redraw);
        assert_eq!(schedule.wake_at, Some(last_wake + Duration::from_secs(1)));
    }
}

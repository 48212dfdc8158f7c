use dear_imgui_rs::Context;
use imguizmo_demo::{DemoState, OrbitCamera, TransformHotkey, camera};
use pretty_assertions::assert_eq;
use std::sync::{Mutex, MutexGuard, OnceLock};

fn test_guard() -> MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner())
}

fn new_test_ctx() -> Context {
    let mut ctx = Context::create();
    {
        let io = ctx.io_mut();
        io.set_display_size([1280.0, 720.0]);
        io.set_delta_time(1.0 / 60.0);
    }
    let _ = ctx.font_atlas_mut().build();
    let _ = ctx.set_ini_filename::<std::path::PathBuf>(None);
    ctx
}

#[test]
fn demo_frames_run_headless() {
    let _guard = test_guard();
    let mut ctx = new_test_ctx();
    let mut state = DemoState::default();

    for _ in 0..3 {
        let ui = ctx.frame();
        state.frame(ui);
        let _ = ctx.render();
    }

    assert_eq!(state.object_matrix, camera::IDENTITY);
    assert_eq!(state.sequence.items.len(), 5);
    assert_eq!(state.view.current_frame, 100);
    assert_eq!(state.camera_projection, state.camera.projection([1280.0, 720.0]));
}

#[test]
fn perspective_frame_with_scale_gizmo_and_snapping() {
    let _guard = test_guard();
    let mut ctx = new_test_ctx();
    let camera = OrbitCamera {
        is_perspective: true,
        ..OrbitCamera::default()
    };
    let mut state = DemoState::new(camera);
    state.transform.handle_hotkey(TransformHotkey::Scale);
    state.transform.handle_hotkey(TransformHotkey::ToggleSnap);
    state.transform.bound_sizing = true;
    state.view.selected_entry = Some(1);

    let ui = ctx.frame();
    state.frame(ui);
    let _ = ctx.render();

    assert_eq!(
        state.selection_text().as_deref(),
        Some("I am a Music, please edit me")
    );
    assert_eq!(state.camera_projection, state.camera.projection([1280.0, 720.0]));
}

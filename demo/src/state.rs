//! Everything the demo keeps between frames and the per-frame UI.

use dear_imgui_rs::{Condition, Ui};
use dear_imguizmo::{GizmoUi, GuizmoExt};
use dear_imsequencer::{Sequencer, SequencerOptions, SequencerView};

use crate::camera::{self, Matrix, OrbitCamera};
use crate::sequence::DemoSequence;
use crate::transform::TransformEditor;

const GRID_SIZE: f32 = 10.0;

pub struct DemoState {
    pub object_matrix: Matrix,
    pub camera: OrbitCamera,
    pub camera_view: Matrix,
    pub camera_projection: Matrix,
    pub transform: TransformEditor,
    pub sequence: DemoSequence,
    pub sequencer: Sequencer,
    pub view: SequencerView,
}

impl Default for DemoState {
    fn default() -> Self {
        Self::new(OrbitCamera::default())
    }
}

impl DemoState {
    pub fn new(camera: OrbitCamera) -> Self {
        Self {
            object_matrix: camera::rotation_y(0.0),
            camera,
            camera_view: camera.view(),
            camera_projection: camera::IDENTITY,
            transform: TransformEditor::new(),
            sequence: DemoSequence::demo(),
            sequencer: Sequencer::new(),
            view: SequencerView {
                current_frame: 100,
                expanded: true,
                selected_entry: None,
                first_frame: 0,
            },
        }
    }

    /// Recompute projection and view for the current display size.
    pub fn update_camera(&mut self, display_size: [f32; 2]) {
        self.camera_projection = self.camera.projection(display_size);
        self.camera_view = self.camera.view();
    }

    /// "I am a <type>, please edit me" for the selected entry
    pub fn selection_text(&self) -> Option<String> {
        let index = self.view.selected_entry?;
        let item = self.sequence.try_item(index).ok()?;
        Some(format!("I am a {}, please edit me", item.type_name()))
    }

    pub fn frame(&mut self, ui: &Ui) {
        self.update_camera(ui.io().display_size());

        let gizmo = ui.guizmo();
        gizmo.set_orthographic(!self.camera.is_perspective);
        gizmo.set_drawlist_background();
        let [w, h] = ui.io().display_size();
        gizmo.set_rect(0.0, 0.0, w, h);
        gizmo.draw_cubes(
            &self.camera_view,
            &self.camera_projection,
            &[self.object_matrix],
        );
        gizmo.draw_grid(
            &self.camera_view,
            &self.camera_projection,
            &camera::IDENTITY,
            GRID_SIZE,
        );

        ui.window("Editor")
            .position([10.0, 10.0], Condition::FirstUseEver)
            .size([320.0, 340.0], Condition::FirstUseEver)
            .build(|| self.editor_window(ui, &gizmo));

        ui.window("Sequencer")
            .position([10.0, 350.0], Condition::FirstUseEver)
            .size([940.0, 480.0], Condition::FirstUseEver)
            .build(|| self.sequencer_window(ui));
    }

    fn editor_window(&mut self, ui: &Ui, gizmo: &GizmoUi<'_>) {
        ui.text("Camera");
        if ui.radio_button("Perspective", self.camera.is_perspective) {
            self.camera.is_perspective = true;
        }
        ui.same_line();
        if ui.radio_button("Orthographic", !self.camera.is_perspective) {
            self.camera.is_perspective = false;
        }
        if self.camera.is_perspective {
            ui.slider_f32("Fov", &mut self.camera.fov, 20.0, 110.0);
        } else {
            ui.slider_f32("Ortho width", &mut self.camera.view_width, 1.0, 20.0);
        }
        slider_angle(ui, "Camera X", &mut self.camera.x_angle, 0.0, 179.0);
        slider_angle(ui, "Camera Y", &mut self.camera.y_angle, -360.0, 360.0);
        ui.slider_f32("Distance", &mut self.camera.distance, 1.0, 10.0);
        let [mx, my] = ui.io().mouse_pos();
        ui.text(format!("X: {mx:.6} Y: {my:.6}"));
        ui.separator();

        // Slider edits apply this frame.
        self.camera_view = self.camera.view();
        self.camera_projection = self.camera.projection(ui.io().display_size());

        if self.transform.edit(
            ui,
            gizmo,
            &self.camera_view,
            &self.camera_projection,
            &mut self.object_matrix,
        ) {
            tracing::trace!("Object matrix edited");
        }
    }

    fn sequencer_window(&mut self, ui: &Ui) {
        {
            let _width = ui.push_item_width(130.0);
            ui.input_int("Frame Min", &mut self.sequence.frame_min);
            ui.same_line();
            ui.input_int("Frame ", &mut self.view.current_frame);
            ui.same_line();
            ui.input_int("Frame Max", &mut self.sequence.frame_max);
        }

        let options = SequencerOptions::EDIT_STARTEND
            | SequencerOptions::ADD
            | SequencerOptions::DEL
            | SequencerOptions::COPYPASTE
            | SequencerOptions::CHANGE_FRAME;
        if self
            .sequencer
            .show(ui, &mut self.sequence, &mut self.view, options)
        {
            tracing::debug!("Sequencer selection: {:?}", self.view.selected_entry);
        }

        if let Some(text) = self.selection_text() {
            ui.text(text);
        }
    }
}

/// Angle slider in degrees over a value stored in radians
fn slider_angle(ui: &Ui, label: &str, radians: &mut f32, min_deg: f32, max_deg: f32) -> bool {
    let mut degrees = radians.to_degrees();
    let changed = ui.slider_f32(label, &mut degrees, min_deg, max_deg);
    if changed {
        *radians = degrees.to_radians();
    }
    changed
}

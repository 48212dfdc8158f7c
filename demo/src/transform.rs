//! Gizmo operation, mode and snapping state plus the widgets editing them.

use dear_imgui_rs::{Key, Ui};
use dear_imguizmo::{GizmoUi, Mode, Operation};

use crate::camera::Matrix;

/// Gizmo operation picked in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformOperation {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl TransformOperation {
    pub fn to_gizmo(self) -> Operation {
        match self {
            Self::Translate => Operation::TRANSLATE,
            Self::Rotate => Operation::ROTATE,
            Self::Scale => Operation::SCALE,
        }
    }
}

/// Keyboard shortcuts of the transform editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformHotkey {
    /// `Z`
    Translate,
    /// `E`
    Rotate,
    /// `R`
    Scale,
    /// `S`
    ToggleSnap,
}

impl TransformHotkey {
    const BINDINGS: [(Key, TransformHotkey); 4] = [
        (Key::Z, TransformHotkey::Translate),
        (Key::E, TransformHotkey::Rotate),
        (Key::R, TransformHotkey::Scale),
        (Key::S, TransformHotkey::ToggleSnap),
    ];

    /// Hotkeys pressed this frame
    pub fn pressed(ui: &Ui) -> impl Iterator<Item = TransformHotkey> + '_ {
        Self::BINDINGS
            .into_iter()
            .filter(|(key, _)| ui.is_key_pressed(*key))
            .map(|(_, hotkey)| hotkey)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformEditor {
    pub operation: TransformOperation,
    pub mode: Mode,
    pub use_snap: bool,
    pub snap: [f32; 3],
    pub bounds: [f32; 6],
    pub bounds_snap: [f32; 3],
    pub bound_sizing: bool,
    pub bound_sizing_snap: bool,
}

impl Default for TransformEditor {
    fn default() -> Self {
        Self {
            operation: TransformOperation::Translate,
            mode: Mode::Local,
            use_snap: false,
            snap: [1.0, 1.0, 1.0],
            bounds: [-0.5, -0.5, -0.5, 0.5, 0.5, 0.5],
            bounds_snap: [0.1, 0.1, 0.1],
            bound_sizing: false,
            bound_sizing_snap: false,
        }
    }
}

impl TransformEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_hotkey(&mut self, hotkey: TransformHotkey) {
        match hotkey {
            TransformHotkey::Translate => self.operation = TransformOperation::Translate,
            TransformHotkey::Rotate => self.operation = TransformOperation::Rotate,
            TransformHotkey::Scale => self.operation = TransformOperation::Scale,
            TransformHotkey::ToggleSnap => self.use_snap = !self.use_snap,
        }
        tracing::trace!("Transform hotkey {:?} -> {:?}", hotkey, self.operation);
    }

    pub fn snap(&self) -> Option<&[f32; 3]> {
        self.use_snap.then_some(&self.snap)
    }

    pub fn local_bounds(&self) -> Option<&[f32; 6]> {
        self.bound_sizing.then_some(&self.bounds)
    }

    /// Bounds snapping, passed whenever its checkbox is set even with bound
    /// sizing off.
    pub fn bounds_snap(&self) -> Option<&[f32; 3]> {
        self.bound_sizing_snap.then_some(&self.bounds_snap)
    }

    pub fn shows_mode_selector(&self) -> bool {
        self.operation != TransformOperation::Scale
    }

    pub fn snap_label(&self) -> &'static str {
        match self.operation {
            TransformOperation::Translate => "Snap",
            TransformOperation::Rotate => "Angle Snap",
            TransformOperation::Scale => "Scale Snap",
        }
    }

    /// Operation radios, matrix components, snapping widgets, then the gizmo
    /// itself over the whole display. Returns `true` when `matrix` changed.
    pub fn edit(
        &mut self,
        ui: &Ui,
        gizmo: &GizmoUi<'_>,
        view: &Matrix,
        projection: &Matrix,
        matrix: &mut Matrix,
    ) -> bool {
        let before = *matrix;

        let hotkeys: Vec<_> = TransformHotkey::pressed(ui).collect();
        for hotkey in hotkeys
            .iter()
            .copied()
            .filter(|h| *h != TransformHotkey::ToggleSnap)
        {
            self.handle_hotkey(hotkey);
        }

        let ops = [
            ("Translate", TransformOperation::Translate),
            ("Rotate", TransformOperation::Rotate),
            ("Scale", TransformOperation::Scale),
        ];
        for (i, (label, op)) in ops.into_iter().enumerate() {
            if i > 0 {
                ui.same_line();
            }
            if ui.radio_button(label, self.operation == op) {
                self.operation = op;
            }
        }

        let (mut tr, mut rt, mut sc) = dear_imguizmo::decompose_matrix(matrix);
        let mut components_changed = ui.input_scalar_n("Tr", &mut tr).build();
        components_changed |= ui.input_scalar_n("Rt", &mut rt).build();
        components_changed |= ui.input_scalar_n("Sc", &mut sc).build();
        if components_changed {
            *matrix = dear_imguizmo::recompose_matrix(&tr, &rt, &sc);
        }

        if self.shows_mode_selector() {
            if ui.radio_button("Local", self.mode == Mode::Local) {
                self.mode = Mode::Local;
            }
            ui.same_line();
            if ui.radio_button("World", self.mode == Mode::World) {
                self.mode = Mode::World;
            }
        }

        if hotkeys.contains(&TransformHotkey::ToggleSnap) {
            self.handle_hotkey(TransformHotkey::ToggleSnap);
        }
        let snapping_changed = self.edit_snap(ui) | self.edit_bound_sizing(ui);
        if snapping_changed {
            tracing::trace!("Snapping edited: {:?}", self.snap());
        }

        let [w, h] = ui.io().display_size();
        gizmo.set_rect(0.0, 0.0, w, h);
        let used = gizmo.manipulate(
            view,
            projection,
            self.operation.to_gizmo(),
            self.mode,
            matrix,
            None,
            self.snap(),
            self.local_bounds(),
            self.bounds_snap(),
        );
        if used {
            tracing::trace!("Gizmo {:?} in {:?} mode", self.operation, self.mode);
        }

        *matrix != before
    }

    /// Snap toggle and the snap value of the current operation
    fn edit_snap(&mut self, ui: &Ui) -> bool {
        let mut changed = ui.checkbox("##use_snap", &mut self.use_snap);
        ui.same_line();
        let label = self.snap_label();
        changed |= match self.operation {
            TransformOperation::Translate => ui.input_scalar_n(label, &mut self.snap).build(),
            TransformOperation::Rotate | TransformOperation::Scale => {
                ui.input_float(label, &mut self.snap[0])
            }
        };
        changed
    }

    fn edit_bound_sizing(&mut self, ui: &Ui) -> bool {
        let mut changed = ui.checkbox("Bound Sizing", &mut self.bound_sizing);
        if self.bound_sizing {
            let _id = ui.push_id(3);
            changed |= ui.checkbox("##bound_sizing_snap", &mut self.bound_sizing_snap);
            ui.same_line();
            changed |= ui.input_scalar_n("Snap", &mut self.bounds_snap).build();
        }
        changed
    }
}

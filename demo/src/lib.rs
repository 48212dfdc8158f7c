//! ImGuizmo demo harness
//!
//! A single window hosting a translate/rotate/scale gizmo over a cube and a
//! grid, an "Editor" window for the camera and the transform, and a
//! "Sequencer" window with a keyframe timeline whose expanded item embeds a
//! curve editor.
//!
//! ```no_run
//! use imguizmo_demo::{DemoConfig, run};
//!
//! run(DemoConfig::default().with_title("gizmo")).ok();
//! ```

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod ramp;
pub mod sequence;
pub mod state;
pub mod transform;

pub use app::run;
pub use camera::OrbitCamera;
pub use config::{DemoConfig, RedrawMode, Theme};
pub use error::{DemoError, DemoResult};
pub use ramp::RampEdit;
pub use sequence::{DemoSequence, SEQUENCER_ITEM_TYPE_NAMES, SequenceItem};
pub use state::DemoState;
pub use transform::{TransformEditor, TransformHotkey, TransformOperation};

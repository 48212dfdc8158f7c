//! # Dear ImSequencer - timeline and curve widgets for dear-imgui-rs
//!
//! Pure Rust sequencer and curve editor widgets drawn with `dear-imgui-rs`
//! draw lists. They follow the callback style of the ImGuizmo companions:
//! the widget owns only interaction state, the data stays with the caller
//! behind a delegate trait.
//!
//! ## Features
//!
//! - [`Sequencer`]: keyframe timeline with draggable item spans, add/delete/
//!   duplicate, copy/paste hooks, current frame cursor, zoomable scrollbar and
//!   per-row custom drawing
//! - [`CurveEditor`]: edits piecewise curves (discrete, linear, smooth) with
//!   point selection, dragging, rectangle selection and point insertion
//!
//! ## Quick Start
//!
//! ```no_run
//! use dear_imgui_rs::*;
//! use dear_imsequencer::*;
//!
//! struct Clips(Vec<(i32, i32)>);
//!
//! impl SequenceInterface for Clips {
//!     fn frame_min(&self) -> i32 { 0 }
//!     fn frame_max(&self) -> i32 { 100 }
//!     fn item_count(&self) -> usize { self.0.len() }
//!     fn item(&self, index: usize) -> ItemSpan {
//!         let (start, end) = self.0[index];
//!         ItemSpan { start, end, kind: 0, color: 0xFFAA8080 }
//!     }
//!     fn set_item_range(&mut self, index: usize, start: i32, end: i32) {
//!         self.0[index] = (start, end);
//!     }
//! }
//!
//! let mut ctx = Context::create();
//! let mut clips = Clips(vec![(10, 30)]);
//! let mut sequencer = Sequencer::new();
//! let mut view = SequencerView::default();
//!
//! let ui = ctx.frame();
//! ui.window("Timeline").build(|| {
//!     sequencer.show(ui, &mut clips, &mut view, SequencerOptions::EDIT_ALL);
//! });
//! ```

pub mod curve_edit;
pub mod error;
pub mod rect;
pub mod sequencer;

pub use curve_edit::{
    CurveDelegate, CurveEditor, CurveType, CurveView, EditPoint, distance_to_segment,
    interpolate, point_to_value, smoothstep, value_to_point,
};
pub use error::{SequencerError, SequencerResult};
pub use rect::{Rect, lerp};
pub use sequencer::{
    CustomDrawArea, ItemSpan, MovingPart, SequenceInterface, Sequencer, SequencerOptions,
    SequencerView, TimelineLayout, apply_drag,
};

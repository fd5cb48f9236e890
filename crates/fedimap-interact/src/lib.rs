//! Fedimap Interaction State
//!
//! Owns the live interaction state of the map independent of any specific
//! rendering library:
//!
//! - **Selection**: node/edge selection with precise tap transition rules
//!   ([`SelectionMachine`]).
//! - **Focus**: a time-boxed highlight for programmatic navigation (search
//!   results, deep links), orthogonal to selection ([`FocusController`]).
//! - **Hover**: an always-available overlay that never fights the selection
//!   highlight.
//! - **Pan inertia**: decaying camera velocity after a drag release
//!   ([`Inertia`], [`PanController`]).
//!
//! The rendering backend feeds raw pointer events in and applies the
//! returned effects; it holds no interaction state of its own.

mod focus;
mod inertia;
mod selection;

pub use focus::{FocusController, FocusEvent, FOCUS_DURATION};
pub use inertia::{Inertia, InertiaConfig, PanController};
pub use selection::{Effect, Highlight, HoverResponse, Selection, SelectionMachine, UiEvent};

//! Shared runtime utilities.
//!
//! Every timer family in the map (probe debounce, focus expiry, inertia
//! frames) runs through [`ResettableTask`], so cancellation-on-teardown is a
//! single call site instead of a checklist of scattered handles. Stale
//! async completions are fenced with [`Generation`].

mod generation;
mod task;

pub use generation::Generation;
pub use task::ResettableTask;

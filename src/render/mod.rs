//! Rendering
//!
//! Split in two: [`scenery`] holds the scrolling decoration state and is
//! platform-free (unit-testable), [`canvas`] is the wasm-only Canvas-2D
//! painter that draws it.

pub mod scenery;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use scenery::Scenery;

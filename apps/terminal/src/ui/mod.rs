//! UI layer: text rendering of the active page.

pub mod render;

pub use render::render;

//! Controller layer: typed commands parsed from input and their application to the view.

pub mod commands;
pub mod orchestration;

//! Diagram text rendering.

pub mod plantuml;

pub use plantuml::{render_diagram, PlantUml, DEFAULT_TITLE};

//! The clustered decliker map: an engine-agnostic controller and the maplibre-gl
//! adapter it drives in the browser.

pub mod controller;
pub mod engine;
pub mod maplibre;
pub mod style;

pub use controller::{MapConfig, MapController};

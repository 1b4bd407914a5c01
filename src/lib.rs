//! Terminal 3D globe with administrative boundary overlays shown at
//! zoom-dependent levels of detail.
//!
//! - [`geo`]: lon/lat to sphere projection
//! - [`data`]: GeoJSON boundary loading and line building
//! - [`map`]: scene, orbit camera, zoom/LOD controller, rasteriser
//! - [`app`] / [`ui`]: input handling and ratatui drawing

pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod logging;
pub mod map;
pub mod ui;

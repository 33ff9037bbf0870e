//! # Point Zer0
//!
//! A procedural celestial canvas. Nebulae, galaxies, black holes, star
//! clusters, pulsars and quasars are generated from a seed, rasterised once
//! into an offscreen world buffer, and viewed through a pan/zoom window that
//! wraps around the world like a torus.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pointzero::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     pointzero::run(CanvasConfig::default().with_seed(7))
//! }
//! ```
//!
//! ## Headless use
//!
//! Everything except presentation lives in [`CanvasController`], which needs
//! no window or GPU:
//!
//! ```ignore
//! let mut canvas = CanvasController::new(800, 600, CanvasConfig::default().with_seed(1))?;
//! let id = canvas.add_galaxy(400.0, 300.0);
//! canvas.cycle_hue(id);
//! canvas.export_to("sky.png")?;
//! ```
//!
//! ## Layout
//!
//! | Layer | Modules |
//! |-------|---------|
//! | Model | [`object`], [`generate`], [`cycle`], [`names`], [`world`] |
//! | Drawing | [`raster`], [`noise`], [`compositor`] |
//! | View | [`viewport`], [`selection`] |
//! | Control | [`controller`], [`input`], [`config`], [`export`] |
//!
//! The windowed app (winit + wgpu, optional egui overlay behind the `egui`
//! feature) is started with [`run`].

mod app;
pub mod compositor;
pub mod config;
pub mod controller;
pub mod cycle;
pub mod error;
pub mod export;
pub mod generate;
mod gpu;
pub mod input;
pub mod names;
pub mod noise;
pub mod object;
#[cfg(feature = "egui")]
mod overlay;
pub mod raster;
pub mod selection;
pub mod shader;
pub mod time;
pub mod viewport;
pub mod world;

pub use app::run;
pub use compositor::{Compositor, RedrawStats};
pub use config::CanvasConfig;
pub use controller::{CanvasController, FramePlan, Highlight, Mutation};
pub use error::{AppError, CanvasError, ConfigError, ExportError, GpuError};
pub use export::{ExportSummary, LegendEntry};
pub use glam::Vec2;
pub use object::{CelestialObject, ObjectId, ObjectKind, ObjectParams};
pub use raster::Raster;
pub use selection::{Selection, SelectionPhase};
pub use viewport::{Blit, ViewportState};
pub use world::World;

/// Convenient imports for applications and demos.
pub mod prelude {
    pub use crate::config::CanvasConfig;
    pub use crate::controller::{CanvasController, FramePlan, Mutation};
    pub use crate::error::{AppError, CanvasError, ExportError};
    pub use crate::object::{CelestialObject, ObjectId, ObjectKind};
    pub use crate::selection::SelectionPhase;
    pub use crate::time::FrameClock;
    pub use glam::Vec2;
}

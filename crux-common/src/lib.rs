//! # Crux Common Library
//!
//! Shared code for the Crux wall viewer including:
//! - Wall-space geometry and dataset row types
//! - Tension derivation and spline path construction
//! - Viewport state machine (cursor-anchored zoom, clamped pan)
//! - Attempt grouping, scene assembly with hover attributes
//! - Dataset loading and configuration resolution

pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod model;
pub mod scene;
pub mod spline;
pub mod tension;
pub mod viewport;

pub use error::{Error, Result};
pub use index::{AttemptGroup, AttemptIndex};
pub use model::{Point, PointSequence};
pub use scene::{build_scene, Scene, Selection};
pub use spline::{build_path, PathDescription};
pub use tension::tension;
pub use viewport::{ViewBox, ViewportController};

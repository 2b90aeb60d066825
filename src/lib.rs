//! ta-unit-view
//!
//! Rendering core for Total Annihilation style unit models. A unit is a tree
//! of rigid pieces, each carrying a handful of planar polygons. This crate
//! turns such a tree into static GPU-ready triangle and line lists once, and
//! then re-poses it every frame by recomputing one world matrix per piece.
//! Nothing here owns a window; hosts drive the passes and submit the draws.
//!
//! High-level modules
//! - `data_structures`: the piece tree, per-unit poses, texture lookup and unit type ids
//! - `math`: matrix helpers, the game's oblique projection and piece local transforms
//! - `transform`: per-frame world matrix propagation with hidden subtree discard
//! - `tessellate`: fill and outline vertex generation plus raw vertex layouts
//! - `config`: viewer settings with defaults
//! - `render`: single-unit view composition (draw modes, scene matrices, grid)
//! - `drawable`: per-type batching of many units for a map view
//! - `backend`: wgpu buffers for one unit model
//!

pub mod backend;
pub mod config;
pub mod data_structures;
pub mod drawable;
pub mod math;
pub mod render;
pub mod tessellate;
pub mod transform;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;

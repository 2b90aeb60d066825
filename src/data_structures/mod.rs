//! Unit data: the shared model and everything hanging off it.
//!
//! - `model` is the validated piece tree with its primitives and vertices
//! - `instance` holds the per-unit pose of every piece
//! - `texture` maps a primitive's texture reference to atlas UV corners
//! - `unit_type` identifies which model a unit on the map uses

pub mod instance;
pub mod model;
pub mod texture;
pub mod unit_type;

//! Viewer settings.
//!
//! Plain data with sensible defaults. Hosts create a [`ViewerConfig`] once,
//! tweak the public fields they care about and hand references to the view,
//! batching and backend code.

use cgmath::Vector3;

/// Size of the reference grid drawn under a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    /// Cells along X.
    pub width: u32,
    /// Cells along Y.
    pub height: u32,
    /// Cell edge length in world units, one game footprint square.
    pub spacing: u32,
}

impl GridConfig {
    /// Largest number of cells along either side of the grid.
    pub const MAX_CELLS: u32 = 1024;
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            spacing: 16,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    /// Capacity of the `pieces` matrix array in the unit shaders.
    pub max_pieces: usize,
    /// Near plane of the orthographic scene projection.
    pub near: f32,
    /// Far plane of the orthographic scene projection.
    pub far: f32,
    pub grid: GridConfig,
    pub light_position: Vector3<f32>,
    pub clear_colour: [f32; 4],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_pieces: 40,
            near: -1024.0,
            far: 256.0,
            grid: GridConfig::default(),
            light_position: Vector3::new(50.0, 50.0, 100.0),
            clear_colour: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

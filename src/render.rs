//! Single-unit view composition.
//!
//! This module describes *what* the unit viewer draws each frame without
//! touching a GPU: the scene matrices for the current [`UnitViewState`], the
//! ordered [`DrawPass`]es for the selected [`DrawMode`] and the line list of
//! the [`WorldSpaceGrid`] the unit stands on. A backend turns these into
//! uniforms and draw calls.
//!
//! # Key types
//!
//! - [`UnitViewState`] holds the user-controlled view settings
//! - [`DrawPass`] is one draw of either the filled or the outline buffers
//! - [`WorldSpaceGrid`] is the reference grid as a line list
//!

use anyhow::{Result, ensure};
use cgmath::{Matrix4, Vector3};

use crate::{
    config::{GridConfig, ViewerConfig},
    math::{self, TA_PERSPECTIVE},
};

/// Flat colour of an untextured unit.
pub const UNIT_COLOUR: [f32; 4] = [0.95, 0.85, 0.80, 1.0];
/// Colour of wireframe and outline edges.
pub const EDGE_COLOUR: [f32; 4] = [0.4, 0.35, 0.3, 1.0];
/// Zero alpha tells the unit shader to sample the texture instead.
pub const TEXTURED_COLOUR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
pub const GRID_COLOUR: [f32; 4] = [0.9, 0.9, 0.9, 1.0];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawMode {
    #[default]
    Solid,
    Wireframe,
    /// Solid fill with the edges drawn on top.
    Outlined,
}

/// Which prebuilt buffer a pass draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Geometry {
    /// The triangle list from [`crate::tessellate::collect_vertex_attributes`].
    Filled,
    /// The line list from [`crate::tessellate::collect_outlines`].
    Outline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    Unlit,
    Lit,
}

/// One draw of the unit, in submission order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawPass {
    pub geometry: Geometry,
    pub object_colour: [f32; 4],
    /// Depth bias `(factor, units)` so edges drawn afterwards win the depth test.
    pub polygon_offset: Option<(f32, f32)>,
}

/// View settings of the single-unit viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitViewState {
    pub draw_mode: DrawMode,
    pub textured: bool,
    pub lighted: bool,
    /// Rotation of the scene about the vertical axis, in degrees.
    pub rotate_z: f32,
    /// Scroll of the grid under the unit, in world units.
    pub movement: f32,
    /// Visible scene extent in world units.
    pub scene_size: [f32; 2],
    /// Framebuffer size in pixels.
    pub viewport_size: [u32; 2],
}

impl Default for UnitViewState {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::default(),
            textured: true,
            lighted: true,
            rotate_z: 0.0,
            movement: 0.0,
            scene_size: [640.0, 480.0],
            viewport_size: [640, 480],
        }
    }
}

impl UnitViewState {
    /// Orthographic projection with the origin at the top-left of the scene.
    pub fn projection(&self, config: &ViewerConfig) -> Matrix4<f32> {
        let [w, h] = self.scene_size;
        math::ortho(0.0, w, h, 0.0, config.near, config.far)
    }

    /// Centres the scene, applies the game's oblique view and the user's spin.
    pub fn scene_view(&self) -> Matrix4<f32> {
        let [w, h] = self.scene_size;
        let centering = math::translation(w / 2.0, h / 2.0, 0.0);
        (centering * TA_PERSPECTIVE) * math::rotation_z(-self.rotate_z)
    }

    /// Scene view shifted so the grid is centred under the unit.
    pub fn grid_view(&self, grid: &WorldSpaceGrid) -> Matrix4<f32> {
        let [w, h] = grid.size();
        self.scene_view() * math::translation(-w / 2.0, -h / 2.0, 0.0)
    }

    /// Scrolls the grid and drops it just below the unit's footprint.
    pub fn grid_model(&self) -> Matrix4<f32> {
        math::translation(0.0, self.movement, -0.5)
    }

    /// Camera position used for specular lighting.
    pub fn view_position(&self) -> Vector3<f32> {
        let [w, h] = self.scene_size;
        Vector3::new(w / 2.0, h / 2.0, 0.0)
    }

    pub fn shading(&self) -> Shading {
        if self.lighted {
            Shading::Lit
        } else {
            Shading::Unlit
        }
    }

    pub fn draw_passes(&self) -> Vec<DrawPass> {
        let fill_colour = if self.textured {
            TEXTURED_COLOUR
        } else {
            UNIT_COLOUR
        };
        match self.draw_mode {
            DrawMode::Solid => vec![DrawPass {
                geometry: Geometry::Filled,
                object_colour: fill_colour,
                polygon_offset: None,
            }],
            DrawMode::Wireframe => vec![DrawPass {
                geometry: Geometry::Outline,
                object_colour: EDGE_COLOUR,
                polygon_offset: None,
            }],
            DrawMode::Outlined => vec![
                DrawPass {
                    geometry: Geometry::Filled,
                    object_colour: fill_colour,
                    polygon_offset: Some((1.0, 1.0)),
                },
                DrawPass {
                    geometry: Geometry::Outline,
                    // untextured fill is already unit coloured, so edges use the darker tone
                    object_colour: if self.textured {
                        UNIT_COLOUR
                    } else {
                        EDGE_COLOUR
                    },
                    polygon_offset: None,
                },
            ],
        }
    }
}

/// Square reference grid on the z = 0 plane as a line list.
///
/// Shared edges are emitted once: the first row adds its top edges, the
/// first column its left edges and every cell its right and bottom edges.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSpaceGrid {
    cells: [u32; 2],
    spacing: u32,
    vertices: Vec<[f32; 3]>,
}

impl WorldSpaceGrid {
    pub fn new(config: &GridConfig) -> Result<Self> {
        ensure!(
            config.width <= GridConfig::MAX_CELLS && config.height <= GridConfig::MAX_CELLS,
            "grid of {}x{} cells exceeds the {} cells allowed per side",
            config.width,
            config.height,
            GridConfig::MAX_CELLS
        );
        let (width, height) = (config.width as usize, config.height as usize);
        let capacity = 2 * width + 2 * height + 4 * width * height;
        let mut vertices = Vec::with_capacity(capacity);

        let spacing = config.spacing as f32;
        let vertex = |w: usize, h: usize| [w as f32 * spacing, h as f32 * spacing, 0.0];
        let mut line = |a: [f32; 3], b: [f32; 3]| {
            vertices.push(a);
            vertices.push(b);
        };

        for h in 0..height {
            for w in 0..width {
                if h == 0 {
                    line(vertex(w, h), vertex(w + 1, h));
                }
                line(vertex(w + 1, h), vertex(w + 1, h + 1));
                line(vertex(w + 1, h + 1), vertex(w, h + 1));
                if w == 0 {
                    line(vertex(w, h + 1), vertex(w, h));
                }
            }
        }

        Ok(Self {
            cells: [config.width, config.height],
            spacing: config.spacing,
            vertices,
        })
    }

    /// Extent in world units.
    pub fn size(&self) -> [f32; 2] {
        let spacing = self.spacing as f32;
        [self.cells[0] as f32 * spacing, self.cells[1] as f32 * spacing]
    }

    pub fn cells(&self) -> [u32; 2] {
        self.cells
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }
}

//! Turns a unit's polygons into GPU-ready triangle and line lists.
//!
//! Both passes walk the pieces in pre-order and tag every emitted vertex with
//! the index of the piece that owns it. The vertex shader uses that tag to
//! pick the piece's world matrix out of the per-frame transform array, so one
//! static buffer can be drawn in any pose.
//!
//! Fill layout is a plain triangle list (no index buffer): one
//! position/normal/texcoord/piece tuple per corner, shared vertices repeated.

use cgmath::{Vector2, Vector3};

use crate::{
    data_structures::{
        model::{MAX_PIECE_COUNT, PieceIndex, Primitive, UnitModel},
        texture::{TextureCoordinates, UvQuad},
    },
    math,
};

pub const POSITION_LOCATION: u32 = 0;
pub const NORMAL_LOCATION: u32 = 1;
pub const TEX_COORDS_LOCATION: u32 = 2;
pub const PIECE_LOCATION: u32 = 3;

/// Describes how a raw vertex type is laid out in a vertex buffer.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// Parallel attribute arrays of a filled model, one entry per triangle corner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexArrays {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub piece_indices: Vec<u8>,
}

impl VertexArrays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
            tex_coords: Vec::with_capacity(capacity),
            piece_indices: Vec::with_capacity(capacity),
        }
    }

    /// Number of vertices (not triangles).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.len() / 3
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.tex_coords.clear();
        self.piece_indices.clear();
    }

    fn push_triangle(
        &mut self,
        corners: [(Vector2<f32>, Vector3<f32>); 3],
        normal: Vector3<f32>,
        piece: u8,
    ) {
        for (tex_coord, position) in corners {
            self.positions.push(position.into());
            self.tex_coords.push(tex_coord.into());
            self.normals.push(normal.into());
            self.piece_indices.push(piece);
        }
    }

    /// Interleaves the arrays into the layout of [`UnitVertex::desc`].
    pub fn to_unit_vertices(&self) -> Vec<UnitVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.tex_coords)
            .zip(&self.piece_indices)
            .map(|(((&position, &normal), &tex_coords), &piece)| UnitVertex {
                position,
                normal,
                tex_coords,
                piece: piece as u32,
            })
            .collect()
    }
}

/// Line list of polygon edges, two entries per segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutlineArrays {
    pub positions: Vec<[f32; 3]>,
    pub piece_indices: Vec<u8>,
}

impl OutlineArrays {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            piece_indices: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.len() / 2
    }

    fn push_line(&mut self, a: Vector3<f32>, b: Vector3<f32>, piece: u8) {
        self.positions.push(a.into());
        self.positions.push(b.into());
        self.piece_indices.push(piece);
        self.piece_indices.push(piece);
    }

    pub fn to_outline_vertices(&self) -> Vec<OutlineVertex> {
        self.positions
            .iter()
            .zip(&self.piece_indices)
            .map(|(&position, &piece)| OutlineVertex {
                position,
                piece: piece as u32,
            })
            .collect()
    }
}

fn piece_tag(idx: PieceIndex) -> u8 {
    debug_assert!(idx < MAX_PIECE_COUNT, "piece index {} does not fit a u8", idx);
    idx as u8
}

/// Number of fill vertices [`collect_vertex_attributes`] will emit.
pub fn count_vertices(model: &UnitModel) -> usize {
    model
        .primitives()
        .iter()
        .enumerate()
        .filter(|(idx, _)| model.is_drawable(*idx))
        .map(|(_, primitive)| primitive.indices.len().saturating_sub(2) * 3)
        .sum()
}

/// Number of outline vertices [`collect_outlines`] will emit.
pub fn count_outline_vertices(model: &UnitModel) -> usize {
    model
        .primitives()
        .iter()
        .enumerate()
        .filter(|(idx, primitive)| model.is_drawable(*idx) && primitive.indices.len() >= 2)
        .map(|(_, primitive)| primitive.indices.len() * 2)
        .sum()
}

/// Tessellates every drawable primitive of `model` into a triangle list.
///
/// The ground plate is skipped. Primitives with fewer than three vertices
/// produce no triangles.
pub fn collect_vertex_attributes<T>(model: &UnitModel, textures: &T) -> VertexArrays
where
    T: TextureCoordinates + ?Sized,
{
    let mut arrays = VertexArrays::with_capacity(count_vertices(model));

    for piece_idx in model.iter_preorder() {
        let piece = piece_tag(piece_idx);
        for &primitive_idx in &model.piece(piece_idx).primitives {
            if !model.is_drawable(primitive_idx) {
                continue;
            }
            let primitive = model.primitive(primitive_idx);
            let tex_coords = textures.texture_coordinates(primitive.texture);
            tessellate_primitive(model.vertices(), primitive, tex_coords, piece, &mut arrays);
        }
    }

    log::debug!(
        "Tessellated {} pieces into {} triangles",
        model.piece_count(),
        arrays.triangle_count()
    );
    arrays
}

/// Corners are emitted as (0, 2, 1): the game winds polygons the other way
/// round from the renderer. Texture corners follow the same pattern, and a
/// fan reuses corners 0, 2, 1 for every triangle.
fn tessellate_primitive(
    vertices: &[Vector3<f32>],
    primitive: &Primitive,
    uv: UvQuad,
    piece: u8,
    arrays: &mut VertexArrays,
) {
    let v = |i: usize| vertices[primitive.indices[i]];

    match primitive.indices.len() {
        // points, and lines used as emitter directions
        0..=2 => (),
        3 => {
            let normal = math::face_normal(v(0), v(2), v(1));
            arrays.push_triangle([(uv[0], v(0)), (uv[2], v(2)), (uv[1], v(1))], normal, piece);
        }
        4 => {
            let normal = math::face_normal(v(0), v(2), v(1));
            arrays.push_triangle([(uv[0], v(0)), (uv[2], v(2)), (uv[1], v(1))], normal, piece);
            arrays.push_triangle([(uv[0], v(0)), (uv[3], v(3)), (uv[2], v(2))], normal, piece);
        }
        n => {
            let normal = math::face_normal(v(0), v(2), v(1));
            for k in 2..n {
                arrays.push_triangle(
                    [(uv[0], v(0)), (uv[2], v(k)), (uv[1], v(k - 1))],
                    normal,
                    piece,
                );
            }
        }
    }
}

/// Builds the wireframe: every edge of every drawable primitive, including
/// the closing edge from the last vertex back to the first.
pub fn collect_outlines(model: &UnitModel) -> OutlineArrays {
    let mut arrays = OutlineArrays::with_capacity(count_outline_vertices(model));

    for piece_idx in model.iter_preorder() {
        let piece = piece_tag(piece_idx);
        for &primitive_idx in &model.piece(piece_idx).primitives {
            if !model.is_drawable(primitive_idx) {
                continue;
            }
            let indices = &model.primitive(primitive_idx).indices;
            if indices.len() < 2 {
                continue;
            }
            let v = |i: usize| model.vertices()[indices[i]];
            for k in 1..indices.len() {
                arrays.push_line(v(k - 1), v(k), piece);
            }
            arrays.push_line(v(indices.len() - 1), v(0), piece);
        }
    }

    log::debug!(
        "Collected {} outline segments from {} pieces",
        arrays.segment_count(),
        model.piece_count()
    );
    arrays
}

/**
 * The raw fill vertex as stored in GPU memory.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UnitVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub piece: u32,
}

/**
 * Locations match the attribute slots every unit shader expects:
 * 0 position, 1 normal, 2 texture coordinates, 3 piece index.
 */
impl Vertex for UnitVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<UnitVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: POSITION_LOCATION,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: NORMAL_LOCATION,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: TEX_COORDS_LOCATION,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: PIECE_LOCATION,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}

/**
 * The raw outline vertex. Outlines are unlit and untextured so only position
 * and piece index are stored.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OutlineVertex {
    pub position: [f32; 3],
    pub piece: u32,
}

impl Vertex for OutlineVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<OutlineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: POSITION_LOCATION,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: PIECE_LOCATION,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}

//! wgpu resources of one unit model shown in the viewer.
//!
//! [`BufferedModel`] uploads the static fill and outline buffers once and keeps
//! a `pieces` uniform array that is rewritten in place every frame from the
//! unit's pose. All geometry and matrix math comes from the backend-agnostic
//! [`crate::tessellate`] and [`crate::transform`] passes.

use anyhow::{Result, ensure};
use wgpu::util::DeviceExt;

use crate::{
    config::ViewerConfig,
    data_structures::{instance::UnitInstance, model::UnitModel, texture::TextureCoordinates},
    math,
    tessellate::{self, OutlineVertex, UnitVertex},
    transform::{PieceTransformRaw, PieceTransforms},
};

/// Bind group slot of the `pieces` uniform array in the unit shaders.
pub const PIECES_BIND_GROUP: u32 = 1;

/// Layout of the `pieces` uniform: one `array<mat4x4<f32>, N>` at binding 0.
pub fn pieces_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("pieces_bind_group_layout"),
    })
}

pub struct BufferedModel {
    vertex_buffer: wgpu::Buffer,
    element_count: u32,
    outline_buffer: wgpu::Buffer,
    outline_count: u32,
    transforms: PieceTransforms,
    raw_transforms: Vec<PieceTransformRaw>,
    transform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl BufferedModel {
    pub fn new<T>(
        device: &wgpu::Device,
        pieces_layout: &wgpu::BindGroupLayout,
        model: &UnitModel,
        textures: &T,
        config: &ViewerConfig,
    ) -> Result<Self>
    where
        T: TextureCoordinates + ?Sized,
    {
        ensure!(
            model.piece_count() <= config.max_pieces,
            "model has {} pieces but the unit shader holds only {} piece transforms",
            model.piece_count(),
            config.max_pieces
        );

        let vertices = tessellate::collect_vertex_attributes(model, textures).to_unit_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Unit Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let outline = tessellate::collect_outlines(model).to_outline_vertices();
        let outline_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Unit Outline Buffer"),
            contents: bytemuck::cast_slice(&outline),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // the uniform always spans the shader's full array
        let raw_transforms =
            vec![PieceTransformRaw::from(&math::identity()); config.max_pieces];
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Piece Transform Buffer"),
            contents: bytemuck::cast_slice(&raw_transforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: pieces_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
            label: Some("pieces_bind_group"),
        });

        log::debug!(
            "Uploaded unit model: {} fill vertices, {} outline vertices",
            vertices.len(),
            outline.len()
        );

        Ok(Self {
            vertex_buffer,
            element_count: vertices.len() as u32,
            outline_buffer,
            outline_count: outline.len() as u32,
            transforms: PieceTransforms::for_model(model),
            raw_transforms,
            transform_buffer,
            bind_group,
        })
    }

    /// Re-poses the unit. Call [`Self::write_transforms`] before drawing.
    pub fn apply_changes(&mut self, model: &UnitModel, instance: &UnitInstance) {
        self.transforms.apply(model, instance);
        for (raw, matrix) in self
            .raw_transforms
            .iter_mut()
            .zip(self.transforms.matrices())
        {
            *raw = PieceTransformRaw::from(matrix);
        }
    }

    pub fn write_transforms(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.transform_buffer,
            0,
            bytemuck::cast_slice(&self.raw_transforms),
        );
    }

    pub fn transforms(&self) -> &PieceTransforms {
        &self.transforms
    }

    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    pub fn outline_count(&self) -> u32 {
        self.outline_count
    }

    pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
        use crate::tessellate::Vertex;
        [UnitVertex::desc(), OutlineVertex::desc()]
    }

    pub fn draw_filled(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.element_count == 0 {
            return;
        }
        render_pass.set_bind_group(PIECES_BIND_GROUP, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.element_count, 0..1);
    }

    pub fn draw_wireframe(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.outline_count == 0 {
            return;
        }
        render_pass.set_bind_group(PIECES_BIND_GROUP, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.outline_buffer.slice(..));
        render_pass.draw(0..self.outline_count, 0..1);
    }
}

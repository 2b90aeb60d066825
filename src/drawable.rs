//! Batching of many units for a map view.
//!
//! Models are tessellated once per unit type. Each frame every visible unit
//! becomes an [`InstanceDraw`]: its view-projection matrix, its normal matrix
//! and its posed piece transforms. The draws are grouped by unit type so a
//! backend binds each model's buffers once and issues one draw per unit.

use std::{collections::HashMap, sync::Arc};

use anyhow::{Result, ensure};
use cgmath::{Matrix3, Matrix4, Vector3};

use crate::{
    config::ViewerConfig,
    data_structures::{
        instance::UnitInstance, model::UnitModel, texture::TextureCoordinates,
        unit_type::UnitTypeId,
    },
    math::{self, TA_PERSPECTIVE},
    tessellate::{self, VertexArrays},
    transform::PieceTransforms,
};

/// The part of the map currently on screen, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub origin: [f32; 2],
    pub size: [f32; 2],
}

/// A unit placed on the map.
#[derive(Clone, Debug)]
pub struct UnitObject {
    pub unit_type: UnitTypeId,
    pub position: Vector3<f32>,
    pub pose: UnitInstance,
}

/// Everything needed to draw one unit this frame.
#[derive(Clone, Debug)]
pub struct InstanceDraw {
    pub vp_matrix: Matrix4<f32>,
    pub normal_matrix: Matrix3<f32>,
    pub transforms: PieceTransforms,
}

/// A unit type's shared model and its static fill geometry.
#[derive(Clone, Debug)]
pub struct DrawableModel {
    pub model: Arc<UnitModel>,
    pub vertices: VertexArrays,
}

#[derive(Debug, Default)]
struct Batch {
    slots: Vec<InstanceDraw>,
    used: usize,
}

/// Per-type draw lists of one frame.
///
/// Keep one around and pass it to every [`UnitDrawable::setup_next_frame`]:
/// slots from the previous frame are overwritten instead of reallocated.
#[derive(Debug, Default)]
pub struct FrameState {
    batches: HashMap<UnitTypeId, Batch>,
}

impl FrameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self, unit_type: &UnitTypeId) -> &[InstanceDraw] {
        match self.batches.get(unit_type) {
            Some(batch) => &batch.slots[..batch.used],
            None => &[],
        }
    }

    /// Non-empty batches, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&UnitTypeId, &[InstanceDraw])> {
        self.batches
            .iter()
            .filter(|(_, batch)| batch.used > 0)
            .map(|(id, batch)| (id, &batch.slots[..batch.used]))
    }

    pub fn instance_count(&self) -> usize {
        self.batches.values().map(|batch| batch.used).sum()
    }

    fn begin(&mut self) {
        self.batches.values_mut().for_each(|batch| batch.used = 0);
    }
}

/// All unit types a map view can draw.
#[derive(Debug, Default)]
pub struct UnitDrawable {
    models: HashMap<UnitTypeId, DrawableModel>,
    config: ViewerConfig,
}

impl UnitDrawable {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            models: HashMap::new(),
            config,
        }
    }

    /// Registers (or replaces) the model of a unit type and tessellates it.
    ///
    /// Models with more pieces than the shaders hold transforms for are
    /// rejected, as the backend would reject them at upload.
    pub fn insert<T>(
        &mut self,
        unit_type: UnitTypeId,
        model: Arc<UnitModel>,
        textures: &T,
    ) -> Result<()>
    where
        T: TextureCoordinates + ?Sized,
    {
        ensure!(
            model.piece_count() <= self.config.max_pieces,
            "unit type {} has {} pieces but the unit shader holds only {} piece transforms",
            unit_type,
            model.piece_count(),
            self.config.max_pieces
        );
        let vertices = tessellate::collect_vertex_attributes(&model, textures);
        log::debug!("Registered unit type {}", unit_type);
        self.models
            .insert(unit_type, DrawableModel { model, vertices });
        Ok(())
    }

    pub fn model(&self, unit_type: &UnitTypeId) -> Option<&DrawableModel> {
        self.models.get(unit_type)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Screen-space projection of the map viewport.
    pub fn projection(&self, viewport: &Viewport) -> Matrix4<f32> {
        let [w, h] = viewport.size;
        math::ortho(0.0, w, h, 0.0, self.config.near, self.config.far)
    }

    /// Fills `frame` with one draw per unit whose type has a model.
    pub fn setup_next_frame(&self, viewport: &Viewport, objects: &[UnitObject], frame: &mut FrameState) {
        let projection = self.projection(viewport);
        frame.begin();

        for unit in objects {
            let Some(drawable) = self.models.get(&unit.unit_type) else {
                log::trace!("No model for unit type {}, skipping", unit.unit_type);
                continue;
            };
            let model = &drawable.model;

            let view = math::translation(
                unit.position.x - viewport.origin[0],
                unit.position.y - viewport.origin[1],
                0.0,
            ) * TA_PERSPECTIVE;
            let vp_matrix = projection * view;
            let normal_matrix = math::normal_matrix(&view);

            if !frame.batches.contains_key(&unit.unit_type) {
                frame.batches.insert(unit.unit_type.clone(), Batch::default());
            }
            let Some(batch) = frame.batches.get_mut(&unit.unit_type) else {
                continue;
            };
            if batch.used == batch.slots.len() {
                batch.slots.push(InstanceDraw {
                    vp_matrix,
                    normal_matrix,
                    transforms: PieceTransforms::for_model(model),
                });
            }
            let draw = &mut batch.slots[batch.used];
            if draw.transforms.len() != model.piece_count() {
                draw.transforms = PieceTransforms::for_model(model);
            }
            draw.vp_matrix = vp_matrix;
            draw.normal_matrix = normal_matrix;
            draw.transforms.apply(model, &unit.pose);
            batch.used += 1;
        }

        log::trace!("Prepared {} unit draws", frame.instance_count());
    }
}

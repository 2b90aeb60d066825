//! World transforms of a posed unit.
//!
//! [`PieceTransforms`] holds one matrix per piece and is rewritten in place
//! every frame from the model and the instance pose. Each piece's matrix is its
//! parent's matrix times its own local transform; the root's parent is the
//! identity. A hidden piece drags its whole subtree to [`discard_transform`]
//! so that nothing of it ends up inside the view volume.

use std::ops::Index;

use cgmath::Matrix4;

use crate::{
    data_structures::{
        instance::UnitInstance,
        model::{PieceIndex, UnitModel},
    },
    math,
};

/// Depth hidden pieces are pushed to, far outside any scene's depth range.
pub const DISCARD_DEPTH: f32 = -1000.0;

pub fn discard_transform() -> Matrix4<f32> {
    math::translation(0.0, 0.0, DISCARD_DEPTH)
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    piece: PieceIndex,
    parent: Matrix4<f32>,
    discarded: bool,
}

/// One world matrix per piece of a single unit instance.
#[derive(Clone, Debug)]
pub struct PieceTransforms {
    matrices: Vec<Matrix4<f32>>,
    stack: Vec<Pending>,
}

impl PieceTransforms {
    pub fn new(piece_count: usize) -> Self {
        Self {
            matrices: vec![math::identity(); piece_count],
            stack: Vec::with_capacity(piece_count),
        }
    }

    pub fn for_model(model: &UnitModel) -> Self {
        Self::new(model.piece_count())
    }

    /// Recomputes every piece's world matrix from `instance`.
    ///
    /// # Panics
    ///
    /// If this array was sized for a different piece count or `instance`
    /// has fewer pieces than `model`.
    pub fn apply(&mut self, model: &UnitModel, instance: &UnitInstance) {
        assert_eq!(
            self.matrices.len(),
            model.piece_count(),
            "transform array holds {} matrices but the model has {} pieces",
            self.matrices.len(),
            model.piece_count()
        );
        assert!(
            instance.len() >= model.piece_count(),
            "pose covers {} pieces but the model has {}",
            instance.len(),
            model.piece_count()
        );

        self.stack.clear();
        self.stack.push(Pending {
            piece: model.root(),
            parent: math::identity(),
            discarded: false,
        });

        while let Some(Pending {
            piece,
            parent,
            discarded,
        }) = self.stack.pop()
        {
            let state = instance.piece(piece);
            let discarded = discarded || state.hidden;
            let world = if discarded {
                discard_transform()
            } else {
                parent * state.local_transform(model.piece(piece).offset)
            };
            self.matrices[piece] = world;

            // reversed so siblings pop in child-list order
            self.stack
                .extend(model.piece(piece).children.iter().rev().map(|&child| Pending {
                    piece: child,
                    parent: world,
                    discarded,
                }));
        }
        log::trace!("Applied pose to {} pieces", self.matrices.len());
    }

    pub fn matrices(&self) -> &[Matrix4<f32>] {
        &self.matrices
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn to_raw(&self) -> Vec<PieceTransformRaw> {
        self.matrices.iter().map(PieceTransformRaw::from).collect()
    }
}

impl Index<PieceIndex> for PieceTransforms {
    type Output = Matrix4<f32>;

    fn index(&self, idx: PieceIndex) -> &Self::Output {
        &self.matrices[idx]
    }
}

/// Convenience for one-off evaluation: allocates and fills a fresh array.
pub fn world_transforms(model: &UnitModel, instance: &UnitInstance) -> PieceTransforms {
    let mut transforms = PieceTransforms::for_model(model);
    transforms.apply(model, instance);
    transforms
}

/**
 * The raw piece matrix as it is stored in the `pieces` uniform array on the GPU.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PieceTransformRaw {
    pub matrix: [[f32; 4]; 4],
}

impl From<&Matrix4<f32>> for PieceTransformRaw {
    fn from(matrix: &Matrix4<f32>) -> Self {
        Self {
            matrix: (*matrix).into(),
        }
    }
}

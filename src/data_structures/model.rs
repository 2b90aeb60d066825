//! The static piece tree of a unit model.
//!
//! A [`UnitModel`] is an arena: pieces, primitives and vertices live in flat
//! vectors and refer to each other by index. The tree is validated once on
//! construction; the per-frame passes then index into it freely and treat any
//! inconsistency as a programming error.

use anyhow::{Result, bail, ensure};
use cgmath::Vector3;

/// Index of a piece inside [`UnitModel::pieces`].
pub type PieceIndex = usize;
/// Index of a primitive inside [`UnitModel::primitives`].
pub type PrimitiveIndex = usize;

/// Piece indices are uploaded to the GPU as `u8`.
pub const MAX_PIECE_COUNT: usize = u8::MAX as usize + 1;

/// One rigid part of a unit (a turret, a barrel, a leg segment...).
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub name: String,
    /// Rest-pose translation relative to the parent piece.
    pub offset: Vector3<f32>,
    pub primitives: Vec<PrimitiveIndex>,
    pub children: Vec<PieceIndex>,
}

impl Piece {
    pub fn new(name: impl Into<String>, offset: Vector3<f32>) -> Self {
        Self {
            name: name.into(),
            offset,
            primitives: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// A planar polygon. Winding order matters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Primitive {
    pub indices: Vec<usize>,
    pub texture: Option<usize>,
}

/// Immutable piece tree, safe to share between any number of unit instances.
#[derive(Clone, Debug)]
pub struct UnitModel {
    pieces: Vec<Piece>,
    primitives: Vec<Primitive>,
    vertices: Vec<Vector3<f32>>,
    root: PieceIndex,
    ground_plate: Option<PrimitiveIndex>,
    parents: Vec<Option<PieceIndex>>,
}

impl UnitModel {
    /// Validates and assembles a piece tree.
    ///
    /// Every piece must be reachable from `root` exactly once and every
    /// primitive must be owned by exactly one piece.
    pub fn new(
        pieces: Vec<Piece>,
        primitives: Vec<Primitive>,
        vertices: Vec<Vector3<f32>>,
        root: PieceIndex,
        ground_plate: Option<PrimitiveIndex>,
    ) -> Result<Self> {
        ensure!(!pieces.is_empty(), "a unit model needs at least one piece");
        ensure!(
            pieces.len() <= MAX_PIECE_COUNT,
            "model has {} pieces but piece indices are limited to {}",
            pieces.len(),
            MAX_PIECE_COUNT
        );
        ensure!(
            root < pieces.len(),
            "root piece {} is out of bounds for {} pieces",
            root,
            pieces.len()
        );
        if let Some(plate) = ground_plate {
            ensure!(
                plate < primitives.len(),
                "ground plate {} is out of bounds for {} primitives",
                plate,
                primitives.len()
            );
        }
        for (idx, primitive) in primitives.iter().enumerate() {
            if let Some(&vertex) = primitive.indices.iter().find(|&&v| v >= vertices.len()) {
                bail!(
                    "primitive {} references vertex {} but the model has {} vertices",
                    idx,
                    vertex,
                    vertices.len()
                );
            }
        }

        let mut parents = vec![None; pieces.len()];
        let mut visited = vec![false; pieces.len()];
        let mut owners: Vec<Option<PieceIndex>> = vec![None; primitives.len()];
        let mut stack = vec![root];
        visited[root] = true;

        while let Some(idx) = stack.pop() {
            let piece = &pieces[idx];
            for &primitive in &piece.primitives {
                ensure!(
                    primitive < primitives.len(),
                    "piece {} ({}) references primitive {} but the model has {} primitives",
                    idx,
                    piece.name,
                    primitive,
                    primitives.len()
                );
                if let Some(owner) = owners[primitive] {
                    bail!(
                        "primitive {} is owned by both piece {} and piece {}",
                        primitive,
                        owner,
                        idx
                    );
                }
                owners[primitive] = Some(idx);
            }
            for &child in &piece.children {
                ensure!(
                    child < pieces.len(),
                    "piece {} ({}) has child {} but the model has {} pieces",
                    idx,
                    piece.name,
                    child,
                    pieces.len()
                );
                ensure!(
                    !visited[child],
                    "piece {} is reached more than once, the pieces do not form a tree",
                    child
                );
                visited[child] = true;
                parents[child] = Some(idx);
                stack.push(child);
            }
        }

        if let Some(orphan) = visited.iter().position(|seen| !seen) {
            bail!(
                "piece {} ({}) is not reachable from root piece {}",
                orphan,
                pieces[orphan].name,
                root
            );
        }
        if let Some(unowned) = owners.iter().position(Option::is_none) {
            bail!("primitive {} does not belong to any piece", unowned);
        }

        log::debug!(
            "Loaded unit model with {} pieces, {} primitives and {} vertices",
            pieces.len(),
            primitives.len(),
            vertices.len()
        );

        Ok(Self {
            pieces,
            primitives,
            vertices,
            root,
            ground_plate,
            parents,
        })
    }

    pub fn root(&self) -> PieceIndex {
        self.root
    }

    /// The placement footprint primitive, never drawn.
    pub fn ground_plate(&self) -> Option<PrimitiveIndex> {
        self.ground_plate
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, idx: PieceIndex) -> &Piece {
        &self.pieces[idx]
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn primitive(&self, idx: PrimitiveIndex) -> &Primitive {
        &self.primitives[idx]
    }

    pub fn vertices(&self) -> &[Vector3<f32>] {
        &self.vertices
    }

    pub fn parent(&self, idx: PieceIndex) -> Option<PieceIndex> {
        self.parents[idx]
    }

    /// Looks a piece up by name, ignoring case like the game's scripts do.
    pub fn piece_index(&self, name: &str) -> Option<PieceIndex> {
        self.pieces
            .iter()
            .position(|piece| piece.name.eq_ignore_ascii_case(name))
    }

    /// Pieces in depth-first pre-order starting at the root. Siblings keep
    /// their child-list order.
    pub fn iter_preorder(&self) -> PreOrder<'_> {
        PreOrder {
            model: self,
            stack: vec![self.root],
        }
    }

    /// Whether a primitive takes part in fill and outline generation.
    pub fn is_drawable(&self, primitive: PrimitiveIndex) -> bool {
        self.ground_plate != Some(primitive)
    }
}

/// Depth-first pre-order walk over a [`UnitModel`], see [`UnitModel::iter_preorder`].
pub struct PreOrder<'a> {
    model: &'a UnitModel,
    stack: Vec<PieceIndex>,
}

impl Iterator for PreOrder<'_> {
    type Item = PieceIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        self.stack
            .extend(self.model.pieces[idx].children.iter().rev().copied());
        Some(idx)
    }
}

//! Per-instance animation state of a unit.
//!
//! A unit model is shared; every unit on screen owns one [`UnitInstance`]
//! holding the pose of each of its pieces. The animation driver mutates the
//! pose every frame and the transform pass reads it.

use cgmath::{Matrix4, Vector3, Zero};

use crate::{
    data_structures::model::{PieceIndex, UnitModel},
    math,
};

/// Pose of a single piece: hidden flag, translation away from the rest pose
/// and rotation in degrees about the three model axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieceState {
    pub hidden: bool,
    pub movement: Vector3<f32>,
    pub turn: Vector3<f32>,
}

impl PieceState {
    /// Visible, unmoved and unturned.
    pub fn new() -> Self {
        Self {
            hidden: false,
            movement: Vector3::zero(),
            turn: Vector3::zero(),
        }
    }

    /// Local transform of a visible piece resting at `offset`.
    pub fn local_transform(&self, offset: Vector3<f32>) -> Matrix4<f32> {
        math::piece_transform(offset, self.movement, self.turn)
    }
}

impl Default for PieceState {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for PieceState {
    fn from(turn: Vector3<f32>) -> Self {
        PieceState {
            turn,
            ..Default::default()
        }
    }
}

/// Pose of every piece of one unit, indexed like [`UnitModel::pieces`].
///
/// Sized once at creation; the piece slice can be mutated but never resized.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitInstance {
    pieces: Vec<PieceState>,
}

impl UnitInstance {
    pub fn new(model: &UnitModel) -> Self {
        Self::with_piece_count(model.piece_count())
    }

    pub fn with_piece_count(count: usize) -> Self {
        Self {
            pieces: vec![PieceState::default(); count],
        }
    }

    pub fn pieces(&self) -> &[PieceState] {
        &self.pieces
    }

    pub fn pieces_mut(&mut self) -> &mut [PieceState] {
        &mut self.pieces
    }

    pub fn piece(&self, idx: PieceIndex) -> &PieceState {
        &self.pieces[idx]
    }

    pub fn piece_mut(&mut self, idx: PieceIndex) -> &mut PieceState {
        &mut self.pieces[idx]
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn set_hidden(&mut self, idx: PieceIndex, hidden: bool) {
        self.pieces[idx].hidden = hidden;
    }

    /// Puts every piece back into its rest pose.
    pub fn reset(&mut self) {
        self.pieces.fill(PieceState::default());
    }
}

#![allow(dead_code)]

use cgmath::{Matrix4, Vector3};
use ta_unit_view::data_structures::model::{Piece, Primitive, UnitModel};

pub(crate) const EPSILON: f32 = 1e-4;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn assert_matrix_eq(actual: &Matrix4<f32>, expected: &Matrix4<f32>) {
    let a: &[[f32; 4]; 4] = actual.as_ref();
    let e: &[[f32; 4]; 4] = expected.as_ref();
    for col in 0..4 {
        for row in 0..4 {
            assert!(
                (a[col][row] - e[col][row]).abs() < EPSILON,
                "matrices differ at column {}, row {}:\nactual   {:?}\nexpected {:?}",
                col,
                row,
                actual,
                expected
            );
        }
    }
}

pub(crate) fn assert_vec_eq(actual: [f32; 3], expected: [f32; 3]) {
    for i in 0..3 {
        assert!(
            (actual[i] - expected[i]).abs() < EPSILON,
            "vectors differ: {:?} vs {:?}",
            actual,
            expected
        );
    }
}

fn primitive(indices: &[usize], texture: Option<usize>) -> Primitive {
    Primitive {
        indices: indices.to_vec(),
        texture,
    }
}

/// Root piece at the origin with one triangle, and a child at (1, 2, 3)
/// with a second triangle.
pub(crate) fn two_piece_model() -> UnitModel {
    let mut base = Piece::new("base", Vector3::new(0.0, 0.0, 0.0));
    base.primitives = vec![0];
    base.children = vec![1];
    let mut turret = Piece::new("turret", Vector3::new(1.0, 2.0, 3.0));
    turret.primitives = vec![1];

    let vertices = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ];
    UnitModel::new(
        vec![base, turret],
        vec![primitive(&[0, 1, 2], Some(0)), primitive(&[0, 2, 3], Some(1))],
        vertices,
        0,
        None,
    )
    .expect("two piece model is valid")
}

/// `count` pieces, each the only child of the previous one, every piece
/// offset by (1, 0, 0) from its parent and carrying no geometry.
pub(crate) fn chain_model(count: usize) -> UnitModel {
    let pieces = (0..count)
        .map(|i| {
            let mut piece = Piece::new(format!("p{}", i), Vector3::new(1.0, 0.0, 0.0));
            if i + 1 < count {
                piece.children = vec![i + 1];
            }
            piece
        })
        .collect();
    UnitModel::new(pieces, Vec::new(), Vec::new(), 0, None).expect("chain model is valid")
}

/// A single piece owning one primitive per entry of `sizes`. Primitive `k`
/// uses `sizes[k]` fresh vertices laid out on a unit circle in the z = 0
/// plane.
pub(crate) fn polygon_model(sizes: &[usize], ground_plate: Option<usize>) -> UnitModel {
    let mut vertices = Vec::new();
    let mut primitives = Vec::new();
    for &n in sizes {
        let start = vertices.len();
        for k in 0..n {
            let angle = (k as f32) * std::f32::consts::TAU / (n.max(1) as f32);
            vertices.push(Vector3::new(angle.cos(), angle.sin(), 0.0));
        }
        primitives.push(primitive(&(start..start + n).collect::<Vec<_>>(), None));
    }
    let mut piece = Piece::new("body", Vector3::new(0.0, 0.0, 0.0));
    piece.primitives = (0..sizes.len()).collect();
    UnitModel::new(vec![piece], primitives, vertices, 0, ground_plate)
        .expect("polygon model is valid")
}

/// One piece with the given vertices forming a single primitive.
pub(crate) fn single_primitive_model(vertices: Vec<Vector3<f32>>, texture: Option<usize>) -> UnitModel {
    let indices: Vec<usize> = (0..vertices.len()).collect();
    let mut piece = Piece::new("body", Vector3::new(0.0, 0.0, 0.0));
    piece.primitives = vec![0];
    UnitModel::new(vec![piece], vec![primitive(&indices, texture)], vertices, 0, None)
        .expect("single primitive model is valid")
}

/// Root with two branches: `left` (1) carrying `claw` (3), and `right` (2).
/// Offsets are (1, 0, 0), (0, 1, 0) and (0, 0, 1) for pieces 1, 2 and 3.
pub(crate) fn branching_model() -> UnitModel {
    let mut base = Piece::new("base", Vector3::new(0.0, 0.0, 0.0));
    base.children = vec![1, 2];
    let mut left = Piece::new("left", Vector3::new(1.0, 0.0, 0.0));
    left.children = vec![3];
    let right = Piece::new("right", Vector3::new(0.0, 1.0, 0.0));
    let claw = Piece::new("claw", Vector3::new(0.0, 0.0, 1.0));
    UnitModel::new(vec![base, left, right, claw], Vec::new(), Vec::new(), 0, None)
        .expect("branching model is valid")
}

//! Geometry helpers shared by the transform and tessellation passes.
//!
//! Everything here is a pure function over `cgmath` types. Degenerate input
//! (zero-length edges, collinear points, singular matrices) never panics.

use cgmath::{Matrix, Matrix3, Matrix4, Rad, SquareMatrix, Vector3, Vector4};

/// Converts an OpenGL clip-space matrix (z in -1..1) to wgpu's (z in 0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::from_cols(
    Vector4::new(1.0, 0.0, 0.0, 0.0),
    Vector4::new(0.0, 1.0, 0.0, 0.0),
    Vector4::new(0.0, 0.0, 0.5, 0.0),
    Vector4::new(0.0, 0.0, 0.5, 1.0),
);

/// The game's oblique top-down projection: X is mirrored and height (Z)
/// pushes a point up the screen by half its value.
#[rustfmt::skip]
pub const TA_PERSPECTIVE: Matrix4<f32> = Matrix4::from_cols(
    Vector4::new(-1.0,  0.0, 0.0, 0.0),
    Vector4::new( 0.0,  1.0, 0.0, 0.0),
    Vector4::new( 0.0, -0.5, 1.0, 0.0),
    Vector4::new( 0.0,  0.0, 0.0, 1.0),
);

pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

/// Rotation about the Z axis by `degrees`.
pub fn rotation_z(degrees: f32) -> Matrix4<f32> {
    Matrix4::from_angle_z(Rad(degrees.to_radians()))
}

/// Orthographic projection into wgpu clip space.
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX * cgmath::ortho(left, right, bottom, top, near, far)
}

/// Builds a piece's local transform from its pose.
///
/// `turn` is in degrees per axis. The rotation block is the game's fixed
/// three-axis composition in the renderer's axis order, so `turn.x` spins
/// about X, `turn.y` about Z and `turn.z` about Y. The translation column
/// applies the matching axis swap to `move`: `offset.y - move.z` and
/// `offset.z + move.y`.
#[rustfmt::skip]
pub fn piece_transform(offset: Vector3<f32>, movement: Vector3<f32>, turn: Vector3<f32>) -> Matrix4<f32> {
    let (sx, cx) = turn.x.to_radians().sin_cos();
    let (sy, cy) = turn.y.to_radians().sin_cos();
    let (sz, cz) = turn.z.to_radians().sin_cos();

    Matrix4::new(
        cy * cz,
        (sy * cx) + (sx * cy * sz),
        (sx * sy) - (cx * cy * sz),
        0.0,

        -sy * cz,
        (cx * cy) - (sx * sy * sz),
        (sx * cy) + (cx * sy * sz),
        0.0,

        sz,
        -sx * cz,
        cx * cz,
        0.0,

        offset.x - movement.x,
        offset.y - movement.z,
        offset.z + movement.y,
        1.0,
    )
}

/// Flat face normal of the triangle `(a, b, c)`: `(b - a) × (c - a)`.
///
/// The result is not normalised; collinear points give the zero vector.
pub fn face_normal(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Vector3<f32> {
    let u = b - a;
    let v = c - a;
    u.cross(v)
}

pub fn upper_left(m: &Matrix4<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

/// Inverse-transpose of the upper-left 3x3 block, used to carry normals
/// through `m`. A singular block falls back to identity.
pub fn normal_matrix(m: &Matrix4<f32>) -> Matrix3<f32> {
    match upper_left(m).invert() {
        Some(inverse) => inverse.transpose(),
        None => {
            log::warn!("Singular view matrix, normals will be left untransformed.");
            Matrix3::identity()
        }
    }
}

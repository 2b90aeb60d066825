use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use ta_unit_view::{
    data_structures::instance::{PieceState, UnitInstance},
    math,
    transform::{DISCARD_DEPTH, PieceTransforms, discard_transform, world_transforms},
};

use crate::common::test_utils::{
    assert_matrix_eq, assert_vec_eq, branching_model, chain_model, init_logger, two_piece_model,
};

mod common;

#[test]
fn rest_pose_is_pure_offset_translation() {
    init_logger();
    let model = two_piece_model();
    let instance = UnitInstance::new(&model);

    let transforms = world_transforms(&model, &instance);

    assert_eq!(transforms.len(), 2);
    assert_matrix_eq(&transforms[0], &Matrix4::identity());
    assert_matrix_eq(&transforms[1], &math::translation(1.0, 2.0, 3.0));
}

#[test]
fn root_world_equals_its_local_transform() {
    let model = two_piece_model();
    let mut instance = UnitInstance::new(&model);
    *instance.piece_mut(0) = PieceState {
        hidden: false,
        movement: Vector3::new(1.0, 2.0, 3.0),
        turn: Vector3::new(10.0, 20.0, 30.0),
    };

    let transforms = world_transforms(&model, &instance);

    let local = instance.piece(0).local_transform(model.piece(0).offset);
    assert_matrix_eq(&transforms[0], &local);
}

#[test]
fn child_world_is_parent_world_times_child_local() {
    let model = two_piece_model();
    let mut instance = UnitInstance::new(&model);
    instance.piece_mut(0).turn = Vector3::new(15.0, 30.0, 45.0);
    instance.piece_mut(0).movement = Vector3::new(-2.0, 0.5, 4.0);
    instance.piece_mut(1).turn = Vector3::new(0.0, 90.0, 0.0);
    instance.piece_mut(1).movement = Vector3::new(1.0, 1.0, 1.0);

    let transforms = world_transforms(&model, &instance);

    let local = instance.piece(1).local_transform(model.piece(1).offset);
    assert_matrix_eq(&transforms[1], &(transforms[0] * local));
}

#[test]
fn rotating_the_root_carries_the_child_offset() {
    let model = two_piece_model();
    let mut instance = UnitInstance::new(&model);
    instance.piece_mut(0).turn = Vector3::new(0.0, 90.0, 0.0);

    let transforms = world_transforms(&model, &instance);

    let translation = transforms[1].w;
    assert_vec_eq([translation.x, translation.y, translation.z], [-2.0, 1.0, 3.0]);
    assert_matrix_eq(
        &transforms[1],
        &(Matrix4::from_angle_z(Deg(90.0)) * math::translation(1.0, 2.0, 3.0)),
    );
}

#[test]
fn offsets_accumulate_along_a_chain() {
    let model = chain_model(4);
    let instance = UnitInstance::new(&model);

    let transforms = world_transforms(&model, &instance);

    for (idx, matrix) in transforms.matrices().iter().enumerate() {
        assert_matrix_eq(matrix, &math::translation((idx + 1) as f32, 0.0, 0.0));
    }
}

#[test]
fn movement_swaps_the_y_and_z_axes() {
    let local = math::piece_transform(
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(4.0, 5.0, 6.0),
        Vector3::new(0.0, 0.0, 0.0),
    );

    assert_matrix_eq(&local, &math::translation(-3.0, -4.0, 8.0));
}

#[test]
fn single_axis_turns_match_axis_rotations() {
    let offset = Vector3::new(0.0, 0.0, 0.0);
    let still = Vector3::new(0.0, 0.0, 0.0);

    for angle in [30.0_f32, 90.0, -45.0, 180.0] {
        assert_matrix_eq(
            &math::piece_transform(offset, still, Vector3::new(angle, 0.0, 0.0)),
            &Matrix4::from_angle_x(Deg(angle)),
        );
        assert_matrix_eq(
            &math::piece_transform(offset, still, Vector3::new(0.0, angle, 0.0)),
            &Matrix4::from_angle_z(Deg(angle)),
        );
        assert_matrix_eq(
            &math::piece_transform(offset, still, Vector3::new(0.0, 0.0, angle)),
            &Matrix4::from_angle_y(Deg(angle)),
        );
    }
}

#[test]
fn hidden_piece_discards_its_whole_subtree() {
    let model = chain_model(3);
    let mut instance = UnitInstance::new(&model);
    instance.set_hidden(1, true);

    let transforms = world_transforms(&model, &instance);

    assert_matrix_eq(&transforms[0], &math::translation(1.0, 0.0, 0.0));
    assert_matrix_eq(&transforms[1], &discard_transform());
    assert_matrix_eq(&transforms[2], &discard_transform());
}

#[test]
fn hiding_a_branch_leaves_its_sibling_in_place() {
    let model = branching_model();
    let mut instance = UnitInstance::new(&model);
    instance.set_hidden(1, true);

    let transforms = world_transforms(&model, &instance);

    assert_matrix_eq(&transforms[0], &math::translation(0.0, 0.0, 0.0));
    assert_matrix_eq(&transforms[1], &discard_transform());
    assert_matrix_eq(&transforms[3], &discard_transform());
    assert_matrix_eq(&transforms[2], &math::translation(0.0, 1.0, 0.0));
}

#[test]
fn hiding_the_later_sibling_keeps_the_earlier_branch() {
    let model = branching_model();
    let mut instance = UnitInstance::new(&model);
    instance.set_hidden(2, true);

    let transforms = world_transforms(&model, &instance);

    assert_matrix_eq(&transforms[1], &math::translation(1.0, 0.0, 0.0));
    assert_matrix_eq(&transforms[3], &math::translation(1.0, 0.0, 1.0));
    assert_matrix_eq(&transforms[2], &discard_transform());
}

#[test]
fn hidden_root_discards_every_piece() {
    let model = chain_model(3);
    let mut instance = UnitInstance::new(&model);
    instance.set_hidden(0, true);
    // pose below a hidden piece must not leak through
    instance.piece_mut(2).movement = Vector3::new(5.0, 5.0, 5.0);

    let transforms = world_transforms(&model, &instance);

    for matrix in transforms.matrices() {
        assert_matrix_eq(matrix, &discard_transform());
        assert_eq!(matrix.w.z, DISCARD_DEPTH);
    }
}

#[test]
fn unhiding_restores_the_subtree() {
    let model = chain_model(2);
    let mut instance = UnitInstance::new(&model);
    let mut transforms = PieceTransforms::for_model(&model);

    instance.set_hidden(0, true);
    transforms.apply(&model, &instance);
    assert_matrix_eq(&transforms[1], &discard_transform());

    instance.set_hidden(0, false);
    transforms.apply(&model, &instance);
    assert_matrix_eq(&transforms[1], &math::translation(2.0, 0.0, 0.0));
}

#[test]
fn apply_rewrites_the_array_in_place() {
    let model = two_piece_model();
    let mut instance = UnitInstance::new(&model);
    let mut transforms = PieceTransforms::for_model(&model);

    transforms.apply(&model, &instance);
    let before = transforms.matrices().as_ptr();

    instance.piece_mut(1).movement = Vector3::new(1.0, 0.0, 0.0);
    transforms.apply(&model, &instance);

    assert_eq!(transforms.matrices().as_ptr(), before);
    assert_matrix_eq(&transforms[1], &math::translation(0.0, 2.0, 3.0));
}

#[test]
fn longer_pose_is_accepted() {
    let model = two_piece_model();
    let instance = UnitInstance::with_piece_count(5);

    let transforms = world_transforms(&model, &instance);

    assert_eq!(transforms.len(), model.piece_count());
}

#[test]
#[should_panic(expected = "pose covers")]
fn short_pose_panics() {
    let model = chain_model(3);
    let instance = UnitInstance::with_piece_count(2);

    world_transforms(&model, &instance);
}

#[test]
#[should_panic(expected = "transform array holds")]
fn mismatched_transform_array_panics() {
    let model = chain_model(3);
    let instance = UnitInstance::new(&model);
    let mut transforms = PieceTransforms::new(2);

    transforms.apply(&model, &instance);
}

#[test]
fn raw_transforms_are_column_major() {
    let model = two_piece_model();
    let instance = UnitInstance::new(&model);

    let raw = world_transforms(&model, &instance).to_raw();

    assert_eq!(raw.len(), 2);
    assert_eq!(raw[1].matrix[3], [1.0, 2.0, 3.0, 1.0]);
    assert_eq!(bytemuck::cast_slice::<_, u8>(&raw).len(), 2 * 64);
}

#[test]
fn reset_returns_to_rest_pose() {
    let model = two_piece_model();
    let mut instance = UnitInstance::new(&model);
    instance.piece_mut(1).turn = Vector3::new(1.0, 2.0, 3.0);
    instance.set_hidden(0, true);

    instance.reset();

    assert!(instance.pieces().iter().all(|p| *p == PieceState::default()));
    assert_eq!(PieceState::from(Vector3::new(0.0, 90.0, 0.0)).turn.y, 90.0);
}

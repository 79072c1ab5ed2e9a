mod support;

use mirrorfit::{
    ErrorMetric, ErrorValue, SampleSet, estimate_error,
    estimate::{estimate_error_with_delta, mean_error},
    mesh::MeshSurface,
    transform,
};
use nalgebra::{Matrix4, Vector3};
use support::{ConstantOffset, approx_eq, translated, yz_mirror};

fn cube() -> MeshSurface {
    MeshSurface::cuboid(2.0, 2.0, 2.0).unwrap()
}

#[test]
fn symmetric_cube_has_no_error() {
    let cube = cube();
    let sample = SampleSet::all(&cube);
    let error = estimate_error(&cube, &yz_mirror(), &Matrix4::identity(), &sample, 0.0, ErrorMetric::SquaredDistance)
        .unwrap();
    assert!(error.as_real() < 1e-20, "error = {}", error);
}

#[test]
fn offset_cube_error_is_known() {
    // Offset by d, the mirrored x = +1 corners sit 2d outside the opposite face
    // and the x = -1 corners land on the cube's edges: mean 4·(2d)² / 8 = 2d².
    let cube = cube();
    let sample = SampleSet::all(&cube);
    let d = 0.1;
    let world = translated(d, 0.0, 0.0);

    let squared = estimate_error(&cube, &yz_mirror(), &world, &sample, 0.0, ErrorMetric::SquaredDistance).unwrap();
    assert!(approx_eq(squared.as_real(), 2.0 * d * d, 1e-12), "squared = {}", squared);

    let plain = estimate_error(&cube, &yz_mirror(), &world, &sample, 0.0, ErrorMetric::Distance).unwrap();
    assert!(approx_eq(plain.as_real(), d, 1e-12), "plain = {}", plain);
}

#[test]
fn matches_beyond_max_distance_are_left_out() {
    // Only the corners landing on the surface match within 0.1.
    let cube = cube();
    let sample = SampleSet::all(&cube);
    let world = translated(0.1, 0.0, 0.0);
    let error = estimate_error(&cube, &yz_mirror(), &world, &sample, 0.1, ErrorMetric::SquaredDistance).unwrap();
    assert!(error.is_defined());
    assert!(error.as_real() < 1e-20, "error = {}", error);
}

#[test]
fn no_matches_is_undefined() {
    let cube = cube();
    let sample = SampleSet::all(&cube);
    let world = translated(10.0, 0.0, 0.0);
    let error = estimate_error(&cube, &yz_mirror(), &world, &sample, 1.0, ErrorMetric::SquaredDistance).unwrap();
    assert_eq!(error, ErrorValue::Undefined);
    assert_eq!(error.value(), None);
    assert!(error.as_real().is_infinite());
}

#[test]
fn delta_composes_in_object_space() {
    let cube = cube();
    let sample = SampleSet::all(&cube);
    let world = translated(0.1, 0.0, 0.0);
    let back = transform::translation(&Vector3::new(-0.1, 0.0, 0.0));
    let error = estimate_error_with_delta(
        &cube,
        &yz_mirror(),
        &world,
        &back,
        &sample,
        0.0,
        ErrorMetric::SquaredDistance,
    )
    .unwrap();
    assert!(error.as_real() < 1e-20, "error = {}", error);
}

#[test]
fn singular_object_transform_is_an_error() {
    let cube = cube();
    let sample = SampleSet::all(&cube);
    let flat = Matrix4::new_nonuniform_scaling(&Vector3::new(0.0, 1.0, 1.0));
    assert!(estimate_error(&cube, &yz_mirror(), &flat, &sample, 0.0, ErrorMetric::SquaredDistance).is_err());
}

#[test]
fn mean_error_with_a_custom_surface() {
    let sample = SampleSet::from_points(vec![nalgebra::Point3::origin(); 3]);
    let error = mean_error(&ConstantOffset(0.5), &Matrix4::identity(), &sample, 0.0, ErrorMetric::SquaredDistance);
    assert!(approx_eq(error.as_real(), 0.25, 1e-15));
    let none = mean_error(&ConstantOffset(0.5), &Matrix4::identity(), &sample, 0.4, ErrorMetric::SquaredDistance);
    assert_eq!(none, ErrorValue::Undefined);
}

#[test]
fn error_value_ordering() {
    let small = ErrorValue::Value(0.1);
    let large = ErrorValue::Value(0.2);
    assert!(small.improves_on(large));
    assert!(!large.improves_on(small));
    assert!(!small.improves_on(small));
    assert!(large.improves_on(ErrorValue::Undefined));
    assert!(!ErrorValue::Undefined.improves_on(large));
    assert!(!ErrorValue::Undefined.improves_on(ErrorValue::Undefined));
}

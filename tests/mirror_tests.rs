mod support;

use mirrorfit::{
    FitError, Mirror, MirrorReference, ProxyStyle,
    float_types::{PI, Real},
    transform,
};
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use support::{approx_eq, transform_distance};

#[test]
fn reflection_through_a_placed_polygon() {
    // A unit square in its local XY plane, lifted to z = 2 in the world.
    let square = [
        Point3::new(-1.0, -1.0, 0.0),
        Point3::new(1.0, -1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(-1.0, 1.0, 0.0),
    ];
    let reference = MirrorReference::from_polygon(&square).unwrap();
    let world = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 2.0));
    let mirror = Mirror::new(&reference, &world).unwrap();

    let mirrored = mirror.reflect_point(&Point3::new(3.0, -4.0, 5.0));
    assert!((mirrored - Point3::new(3.0, -4.0, -1.0)).norm() < 1e-12);
    assert!((mirror.t_axis() - Vector3::z()).norm() < 1e-12);
    assert!(transform_distance(&(mirror.reflection() * mirror.reflection()), &Matrix4::identity()) < 1e-12);
}

#[test]
fn proxy_reflects_through_its_origin() {
    let world = Matrix4::new_translation(&Vector3::new(0.0, 2.0, 0.0));
    let circle = Mirror::from_proxy(ProxyStyle::Circle, &world).unwrap();
    let mirrored = circle.reflect_point(&Point3::new(1.0, 3.0, 0.0));
    assert!((mirrored - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-12);

    let arrow = Mirror::from_proxy(ProxyStyle::SingleArrow, &world).unwrap();
    let mirrored = arrow.reflect_point(&Point3::new(1.0, 3.0, 0.5));
    assert!((mirrored - Point3::new(1.0, 3.0, -0.5)).norm() < 1e-12);
}

#[test]
fn rotated_proxy_turns_its_axis() {
    // A quarter turn about X carries the local +Z axis onto world -Y.
    let world = Rotation3::from_axis_angle(&Vector3::x_axis(), PI / 2.0).to_homogeneous();
    let mirror = Mirror::from_proxy(ProxyStyle::Plain, &world).unwrap();
    assert!((mirror.t_axis() - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-12);
}

#[test]
fn placed_mirror_exposes_a_right_handed_frame() {
    let reference = MirrorReference::Polygon {
        center: Point3::new(0.2, -0.4, 1.0),
        normal: Vector3::new(0.3, -0.8, 0.2),
    };
    let world = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0))
        * Rotation3::from_axis_angle(&Vector3::y_axis(), 0.4).to_homogeneous();
    let mirror = Mirror::new(&reference, &world).unwrap();

    let (t, r1, r2) = (mirror.t_axis(), mirror.r1_axis(), mirror.r2_axis());
    for axis in [t, r1, r2] {
        assert!(approx_eq(axis.norm(), 1.0, 1e-12));
    }
    assert!(t.dot(r1).abs() < 1e-12);
    assert!(t.dot(r2).abs() < 1e-12);
    assert!((t.cross(r1) - r2).norm() < 1e-12);

    // The reflection swaps the two sides of the plane along `t`.
    let center = transform::transform_point(&world, &Point3::new(0.2, -0.4, 1.0));
    let above = center + t * 0.7;
    let mirrored = transform::transform_point(mirror.reflection(), &above);
    assert!((mirrored - (center - t * 0.7)).norm() < 1e-12);
}

#[test]
fn world_normal_stays_perpendicular_under_non_uniform_scale() {
    let inv_sqrt2 = 1.0 / (2.0 as Real).sqrt();
    let reference = MirrorReference::Polygon {
        center: Point3::origin(),
        normal: Vector3::new(inv_sqrt2, inv_sqrt2, 0.0),
    };
    let world = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
    let mirror = Mirror::new(&reference, &world).unwrap();

    // (1, -1, 0) lies in the local plane and lands on (2, -1, 0).
    let in_plane = transform::transform_vector(&world, &Vector3::new(1.0, -1.0, 0.0));
    assert!(mirror.t_axis().dot(&in_plane).abs() < 1e-12);
    assert!(approx_eq(mirror.t_axis().norm(), 1.0, 1e-12));

    let on_plane = Point3::from(in_plane);
    assert!((mirror.reflect_point(&on_plane) - on_plane).norm() < 1e-12);
}

#[test]
fn zero_normal_is_degenerate() {
    let reference = MirrorReference::Polygon {
        center: Point3::new(1.0, 2.0, 3.0),
        normal: Vector3::zeros(),
    };
    let result = Mirror::new(&reference, &Matrix4::identity());
    assert!(matches!(result, Err(FitError::DegenerateMirror(_))));
}

#[test]
fn nan_normal_is_degenerate() {
    let reference = MirrorReference::Polygon {
        center: Point3::origin(),
        normal: Vector3::new(Real::NAN, 0.0, 1.0),
    };
    assert!(matches!(
        Mirror::new(&reference, &Matrix4::identity()),
        Err(FitError::DegenerateMirror(_))
    ));
}

#[test]
fn singular_mirror_placement_is_degenerate() {
    let flat = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, 0.0));
    assert!(matches!(
        Mirror::from_proxy(ProxyStyle::Plain, &flat),
        Err(FitError::DegenerateMirror(_))
    ));
}

#[test]
fn mirror_mesh_needs_exactly_one_polygon() {
    let tri = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    assert!(MirrorReference::from_polygons(&[tri.clone()]).is_ok());
    assert!(matches!(
        MirrorReference::from_polygons(&[tri.clone(), tri]),
        Err(FitError::DegenerateMirror(_))
    ));
    assert!(matches!(
        MirrorReference::from_polygons(&[]),
        Err(FitError::DegenerateMirror(_))
    ));
}

#[test]
fn local_reflection_for_an_offset_object() {
    let mirror = support::yz_mirror();
    let object_world = support::translated(0.25, 0.0, 0.0);
    let local = mirror.local_reflection_for(&object_world).unwrap();
    // x -> -(x + 0.25) - 0.25
    let q = transform::transform_point(&local, &Point3::new(1.0, 0.5, -0.5));
    assert!((q - Point3::new(-1.5, 0.5, -0.5)).norm() < 1e-12);
}

// main.rs
//
// Fits an object to a mirror and prints the run.
// With no argument a UV sphere placed off the mirror is used; with the
// `stl-io` feature the first argument may name an STL file to fit instead.
// Set RUST_LOG=debug to see every accepted and rejected step.

use mirrorfit::mesh::MeshSurface;
use mirrorfit::{FitError, FitParams, Mirror, MirrorReference, fit_to_mirror};
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

fn load_object() -> Result<MeshSurface, FitError> {
    #[cfg(feature = "stl-io")]
    {
        if let Some(path) = std::env::args().nth(1) {
            let mut file = std::fs::File::open(path)?;
            return MeshSurface::from_stl(&mut file);
        }
    }
    MeshSurface::sphere(1.0, 32, 16)
}

fn main() -> Result<(), FitError> {
    env_logger::init();

    let object = load_object()?;

    // A mirror in the YZ plane, and the object nudged off it and tilted.
    let mirror_square = [
        Point3::new(0.0, -1.0, -1.0),
        Point3::new(0.0, 1.0, -1.0),
        Point3::new(0.0, 1.0, 1.0),
        Point3::new(0.0, -1.0, 1.0),
    ];
    let reference = MirrorReference::from_polygon(&mirror_square)?;
    let mirror = Mirror::new(&reference, &Matrix4::identity())?;

    let placed = Matrix4::new_translation(&Vector3::new(0.15, 0.0, 0.0))
        * Rotation3::from_axis_angle(&Vector3::z_axis(), 0.05).to_homogeneous();

    let params = FitParams::new().with_iterations(40).with_sample_count(200);
    let report = fit_to_mirror(&object, &placed, &mirror, &params)?;

    println!("initial error: {}", report.initial_error);
    for entry in &report.trace {
        println!(
            "  {:>3} {} {} error {} speed {:.4}",
            entry.iteration,
            entry.candidate,
            if entry.accepted { "accepted" } else { "rejected" },
            entry.error,
            entry.speed
        );
    }
    println!(
        "final error: {} after {} iterations ({} accepted, {:?})",
        report.error, report.iterations, report.accepted, report.termination
    );
    println!("final transform:{}", report.transform);
    Ok(())
}

//! Mirror reflection geometry.
//!
//! A [`Mirror`] is derived once per run from a reference object: either a single
//! planar polygon (its centroid and normal) or a proxy marker with a fixed axis.
//! It carries the world-space reflection and the frame used to perturb an
//! object relative to the mirror.

use crate::errors::FitError;
use crate::float_types::{EPSILON, Real};
use crate::transform::{self, Transform};
use nalgebra::{Point3, Vector3};

/// How a non-mesh proxy marker is drawn, which decides its reflection axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProxyStyle {
    /// Drawn as a disc perpendicular to local +Y.
    Circle,
    /// Drawn as a single arrow pointing along local +Z.
    SingleArrow,
    /// Any other marker; reflects along local +Z.
    #[default]
    Plain,
}

impl ProxyStyle {
    /// Local reflection axis for this proxy style.
    pub fn normal(self) -> Vector3<Real> {
        match self {
            ProxyStyle::Circle => Vector3::y(),
            ProxyStyle::SingleArrow | ProxyStyle::Plain => Vector3::z(),
        }
    }
}

/// Mirror geometry in the reference object's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MirrorReference {
    /// A single planar polygon, given by its centroid and normal.
    Polygon {
        center: Point3<Real>,
        normal: Vector3<Real>,
    },
    /// A proxy marker reflecting through its local origin.
    Proxy(ProxyStyle),
}

impl MirrorReference {
    /// Reference from the vertices of a single planar polygon.
    ///
    /// The center is the vertex mean and the normal is computed with Newell's
    /// method, so slightly non-planar input still yields a stable normal.
    pub fn from_polygon(points: &[Point3<Real>]) -> Result<Self, FitError> {
        if points.len() < 3 {
            return Err(FitError::DegenerateMirror(format!(
                "a mirror polygon needs at least 3 vertices, got {}",
                points.len()
            )));
        }

        let mut normal = Vector3::zeros();
        for (i, current) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }

        let sum = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        let center = Point3::from(sum / points.len() as Real);

        Ok(MirrorReference::Polygon { center, normal })
    }

    /// Reference from a mirror mesh, which must consist of exactly one polygon.
    pub fn from_polygons(polygons: &[Vec<Point3<Real>>]) -> Result<Self, FitError> {
        match polygons {
            [single] => Self::from_polygon(single),
            _ => Err(FitError::DegenerateMirror(format!(
                "a mirror mesh must have exactly one polygon, got {}",
                polygons.len()
            ))),
        }
    }

    /// Reflection center in the reference's local space.
    pub fn center(&self) -> Point3<Real> {
        match self {
            MirrorReference::Polygon { center, .. } => *center,
            MirrorReference::Proxy(_) => Point3::origin(),
        }
    }

    /// Reflection normal in the reference's local space (not normalized).
    pub fn normal(&self) -> Vector3<Real> {
        match self {
            MirrorReference::Polygon { normal, .. } => *normal,
            MirrorReference::Proxy(style) => style.normal(),
        }
    }

    /// Reflection through this reference's plane, in its local space.
    pub fn local_reflection(&self) -> Transform {
        transform::reflection_about(&self.center(), &self.normal())
    }
}

/// A mirror placed in the world: its reflection and the perturbation frame.
///
/// `t_axis` is the world normal of the mirror; `r1_axis` and `r2_axis` span the
/// mirror plane. `(t_axis, r1_axis, r2_axis)` is a right-handed orthonormal basis.
#[derive(Clone, Debug, PartialEq)]
pub struct Mirror {
    reflection: Transform,
    t_axis: Vector3<Real>,
    r1_axis: Vector3<Real>,
    r2_axis: Vector3<Real>,
}

impl Mirror {
    /// Places `reference` in the world with the reference object's world transform.
    ///
    /// ## Errors
    /// [`FitError::DegenerateMirror`] when the reference normal is zero or not
    /// finite, or the reference's world transform is singular.
    pub fn new(reference: &MirrorReference, reference_world: &Transform) -> Result<Self, FitError> {
        let local_normal = reference.normal();
        if !local_normal.iter().all(|c| c.is_finite()) || local_normal.norm() < EPSILON {
            return Err(FitError::DegenerateMirror(format!(
                "reference normal {:?} has no direction",
                local_normal.as_slice()
            )));
        }

        let world_inverse = transform::invert(reference_world).map_err(|_| {
            FitError::DegenerateMirror("reference world transform is singular".to_string())
        })?;
        let world_normal = transform::transform_normal(reference_world, &local_normal)?;
        let t_len = world_normal.norm();
        if !t_len.is_finite() || t_len < EPSILON {
            return Err(FitError::DegenerateMirror(
                "reference normal vanishes in world space".to_string(),
            ));
        }
        let t_axis = world_normal / t_len;

        let r1_axis = orthogonal_to(&t_axis);
        let r2_axis = t_axis.cross(&r1_axis).normalize();

        let reflection = reference_world * reference.local_reflection() * world_inverse;

        Ok(Mirror {
            reflection,
            t_axis,
            r1_axis,
            r2_axis,
        })
    }

    /// Mirror from a proxy marker with the given world transform.
    pub fn from_proxy(style: ProxyStyle, reference_world: &Transform) -> Result<Self, FitError> {
        Self::new(&MirrorReference::Proxy(style), reference_world)
    }

    /// World-space reflection through the mirror plane.
    pub const fn reflection(&self) -> &Transform {
        &self.reflection
    }

    /// Translation axis, moving an object towards or away from the mirror.
    pub const fn t_axis(&self) -> &Vector3<Real> {
        &self.t_axis
    }

    /// First tilt axis, lying in the mirror plane.
    pub const fn r1_axis(&self) -> &Vector3<Real> {
        &self.r1_axis
    }

    /// Second tilt axis, `t_axis × r1_axis`.
    pub const fn r2_axis(&self) -> &Vector3<Real> {
        &self.r2_axis
    }

    /// Reflects a world-space point through the mirror.
    pub fn reflect_point(&self, point: &Point3<Real>) -> Point3<Real> {
        transform::transform_point(&self.reflection, point)
    }

    /// Object-local mirroring for an object placed at `object_world`:
    /// `object_world⁻¹ · reflection · object_world`.
    ///
    /// Applied to an object-local point, it yields the object-local position of
    /// that point's mirror image.
    pub fn local_reflection_for(&self, object_world: &Transform) -> Result<Transform, FitError> {
        let inverse = transform::invert(object_world)?;
        Ok(inverse * self.reflection * object_world)
    }
}

/// A deterministic unit vector orthogonal to the unit vector `axis`:
/// Gram-Schmidt against the canonical basis vector least aligned with it.
fn orthogonal_to(axis: &Vector3<Real>) -> Vector3<Real> {
    let abs = axis.abs();
    let basis = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    (basis - axis * axis.dot(&basis)).normalize()
}

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, orientation, and non-uniform scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Maps a body-space point into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * local)
    }

    /// Maps a world-space point back into body space. Zero scale components map to zero.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        let unrotated = self.rotation.inverse() * (world - self.position);
        let inv_scale = Vec3::new(
            safe_recip(self.scale.x),
            safe_recip(self.scale.y),
            safe_recip(self.scale.z),
        );
        unrotated * inv_scale
    }

    /// Applies another transform on top of this one, returning the composition.
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale * other.position),
            rotation: (self.rotation * other.rotation).normalize(),
            scale: self.scale * other.scale,
        }
    }
}

fn safe_recip(value: f32) -> f32 {
    if value.abs() < f32::EPSILON {
        0.0
    } else {
        1.0 / value
    }
}

/// Cartesian axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// The two free axes of a drag, described by the one constrained axis.
///
/// All "in-plane" distances and velocities in the crate go through this type
/// so the constrained component is handled in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanarAxes {
    pub constrained: Axis,
}

impl PlanarAxes {
    pub const XY: PlanarAxes = PlanarAxes {
        constrained: Axis::Z,
    };

    pub fn new(constrained: Axis) -> Self {
        Self { constrained }
    }

    /// Returns `v` with the constrained component zeroed.
    pub fn flatten(&self, v: Vec3) -> Vec3 {
        let mut out = v;
        out[self.constrained.index()] = 0.0;
        out
    }

    pub fn planar_distance(&self, a: Vec3, b: Vec3) -> f32 {
        self.flatten(a - b).length()
    }

    /// Returns `v` with its constrained component copied from `source`.
    pub fn with_constrained_from(&self, v: Vec3, source: Vec3) -> Vec3 {
        let mut out = v;
        let i = self.constrained.index();
        out[i] = source[i];
        out
    }
}

/// Half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Plane stored as `normal · p = distance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Ray parameter of the intersection, `None` when parallel or behind the origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.distance - self.normal.dot(ray.origin)) / denom;
        (t >= 0.0).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn inverse_transform_round_trips_points() {
        let transform = Transform {
            position: Vec3::new(1.0, -2.0, 0.5),
            rotation: Quat::from_rotation_z(0.7),
            scale: Vec3::new(2.0, 1.0, 0.5),
        };
        let local = Vec3::new(0.3, 0.9, -1.2);
        let back = transform.inverse_transform_point(transform.transform_point(local));
        assert_abs_diff_eq!(back.x, local.x, epsilon = 1e-5);
        assert_abs_diff_eq!(back.y, local.y, epsilon = 1e-5);
        assert_abs_diff_eq!(back.z, local.z, epsilon = 1e-5);
    }

    #[test]
    fn planar_axes_ignore_constrained_component() {
        let axes = PlanarAxes::XY;
        let a = Vec3::new(0.0, 0.0, 10.0);
        let b = Vec3::new(3.0, 4.0, -7.0);
        assert_abs_diff_eq!(axes.planar_distance(a, b), 5.0, epsilon = 1e-6);
        assert_eq!(axes.flatten(b), Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(axes.with_constrained_from(a, b), Vec3::new(0.0, 0.0, -7.0));
    }

    #[test]
    fn plane_rejects_parallel_and_backward_rays() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        let parallel = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(plane.intersect_ray(&parallel).is_none());

        let away = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(plane.intersect_ray(&away).is_none());

        let toward = Ray::new(Vec3::new(2.0, 0.0, 5.0), -Vec3::Z);
        let t = plane.intersect_ray(&toward).unwrap();
        assert_abs_diff_eq!(toward.at(t).z, 1.0, epsilon = 1e-6);
    }
}

use super::types::{Axis, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis locks enforced by the host integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodyConstraints {
    /// Translation along this axis is frozen.
    pub locked_translation: Option<Axis>,
    /// When set, rotation is only allowed about this axis.
    pub free_rotation: Option<Axis>,
}

impl BodyConstraints {
    pub fn none() -> Self {
        Self::default()
    }

    /// Locks translation along `axis` and every rotation except about `axis`.
    pub fn planar(axis: Axis) -> Self {
        Self {
            locked_translation: Some(axis),
            free_rotation: Some(axis),
        }
    }

    pub fn filter_linear(&self, linear: Vec3) -> Vec3 {
        let mut out = linear;
        if let Some(axis) = self.locked_translation {
            out[axis.index()] = 0.0;
        }
        out
    }

    pub fn filter_angular(&self, angular: Vec3) -> Vec3 {
        match self.free_rotation {
            Some(axis) => axis.unit() * angular[axis.index()],
            None => angular,
        }
    }
}

/// Rigid body carrying the deformable surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub transform: Transform,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Whether drag motion is fed through velocity coupling instead of teleporting.
    pub accepts_coupled_drive: bool,
    pub constraints: BodyConstraints,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            gravity_scale: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.05,
            accepts_coupled_drive: true,
            constraints: BodyConstraints::default(),
        }
    }
}

impl RigidBody {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    /// A body that is moved by direct position deltas only.
    pub fn kinematic(transform: Transform) -> Self {
        Self {
            transform,
            accepts_coupled_drive: false,
            ..Self::default()
        }
    }

    pub fn with_constraints(mut self, constraints: BodyConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.mass.abs() < f32::EPSILON {
            return;
        }
        self.linear_velocity += self.constraints.filter_linear(impulse / self.mass);
    }
}

/// The slice of rigid-body behaviour the drag coupling relies on.
pub trait DrivableBody {
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn accepts_coupled_drive(&self) -> bool;
}

impl DrivableBody for RigidBody {
    fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear_velocity = velocity;
    }

    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    fn accepts_coupled_drive(&self) -> bool {
        self.accepts_coupled_drive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_constraints_filter_locked_axes() {
        let constraints = BodyConstraints::planar(Axis::Z);
        assert_eq!(
            constraints.filter_linear(Vec3::new(1.0, 2.0, 3.0)),
            Vec3::new(1.0, 2.0, 0.0)
        );
        assert_eq!(
            constraints.filter_angular(Vec3::new(1.0, 2.0, 3.0)),
            Vec3::new(0.0, 0.0, 3.0)
        );
    }

    #[test]
    fn impulse_respects_locked_translation() {
        let mut body = RigidBody::default().with_constraints(BodyConstraints::planar(Axis::Z));
        body.mass = 2.0;
        body.apply_impulse(Vec3::new(2.0, 0.0, 4.0));
        assert_eq!(body.linear_velocity, Vec3::new(1.0, 0.0, 0.0));
    }
}

use glam::{Quat, Vec3};

use crate::{config::DEFAULT_GRAVITY, core::rigidbody::RigidBody};

/// Minimal rigid-body integrator standing in for the external physics solver.
///
/// Applies gravity and damping, then integrates the body's transform while
/// honouring its axis constraints.
#[derive(Debug, Clone)]
pub struct BodyIntegrator {
    pub gravity: Vec3,
}

impl Default for BodyIntegrator {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
        }
    }
}

impl BodyIntegrator {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }

    pub fn integrate_velocity(&self, body: &mut RigidBody, dt: f32) {
        body.linear_velocity += self.gravity * body.gravity_scale * dt;
        body.linear_velocity *= (1.0 - body.linear_damping * dt).max(0.0);
        body.angular_velocity *= (1.0 - body.angular_damping * dt).max(0.0);

        body.linear_velocity = body.constraints.filter_linear(body.linear_velocity);
        body.angular_velocity = body.constraints.filter_angular(body.angular_velocity);
    }

    pub fn integrate_position(&self, body: &mut RigidBody, dt: f32) {
        body.transform.position += body.linear_velocity * dt;

        let omega_mag = body.angular_velocity.length();
        if omega_mag > 1e-6 {
            let axis = body.angular_velocity / omega_mag;
            let delta = Quat::from_axis_angle(axis, omega_mag * dt);
            body.transform.rotation = (delta * body.transform.rotation).normalize();
        }
    }

    pub fn step(&self, body: &mut RigidBody, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integrate_velocity(body, dt);
        self.integrate_position(body, dt);
    }
}

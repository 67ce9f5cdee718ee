use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{
    config::{SpringConfig, MIN_LENGTH, SNAP_EPSILON},
    core::types::Transform,
};

/// Simulated state of one mesh vertex, in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    /// Index into the rest mesh.
    pub id: usize,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Spring force from the most recent step.
    pub force: Vec3,
}

impl VertexRecord {
    pub fn at_rest(id: usize, position: Vec3) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
        }
    }
}

/// Spring coefficients with degenerate values already clamped away.
#[derive(Debug, Clone, Copy)]
struct SpringCoefficients {
    stiffness: f32,
    inverse_mass: f32,
    damping: f32,
}

impl From<&SpringConfig> for SpringCoefficients {
    fn from(config: &SpringConfig) -> Self {
        Self {
            stiffness: config.stiffness.max(0.0),
            inverse_mass: 1.0 / config.mass.max(MIN_LENGTH),
            damping: config.damping.clamp(0.0, 1.0),
        }
    }
}

/// One spring-damper oscillator per mesh vertex, arena-indexed by vertex id.
///
/// The integration is per-step rather than per-second: damping
/// is a retention factor applied once per fixed step and the constants are
/// tuned against [`crate::config::DEFAULT_FIXED_TIME_STEP`].
#[derive(Debug, Clone)]
pub struct VertexSpringNetwork {
    vertices: Vec<VertexRecord>,
    last_body_position: Vec3,
    parallel: bool,
}

impl VertexSpringNetwork {
    /// Places every vertex on its rest target under `transform`.
    pub fn new(rest: &[Vec3], transform: &Transform) -> Self {
        let vertices = rest
            .iter()
            .enumerate()
            .map(|(id, &local)| VertexRecord::at_rest(id, transform.transform_point(local)))
            .collect();
        Self {
            vertices,
            last_body_position: transform.position,
            parallel: cfg!(feature = "parallel"),
        }
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel = enabled && cfg!(feature = "parallel");
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[VertexRecord] {
        &self.vertices
    }

    pub fn get(&self, id: usize) -> Option<&VertexRecord> {
        self.vertices.get(id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut VertexRecord> {
        self.vertices.get_mut(id)
    }

    /// Moves every vertex by `delta` without touching velocities.
    pub fn translate(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        for vertex in &mut self.vertices {
            vertex.position += delta;
        }
    }

    /// Advances all vertices one fixed step toward the rest pose under `transform`.
    ///
    /// The body's displacement since the previous step is applied first as a
    /// uniform translation so the surface rides along with the rigid motion.
    pub fn step(&mut self, rest: &[Vec3], transform: &Transform, config: &SpringConfig) {
        let displacement = transform.position - self.last_body_position;
        self.translate(displacement);
        self.last_body_position = transform.position;

        let coefficients = SpringCoefficients::from(config);
        let update = |vertex: &mut VertexRecord| {
            if let Some(&local) = rest.get(vertex.id) {
                Self::integrate(vertex, transform.transform_point(local), coefficients);
            }
        };

        #[cfg(feature = "parallel")]
        {
            use crate::config::PARALLEL_VERTEX_THRESHOLD;
            use rayon::prelude::*;
            if self.parallel && self.vertices.len() >= PARALLEL_VERTEX_THRESHOLD {
                self.vertices.par_iter_mut().for_each(update);
                return;
            }
        }

        self.vertices.iter_mut().for_each(update);
    }

    fn integrate(vertex: &mut VertexRecord, target: Vec3, k: SpringCoefficients) {
        let force = (target - vertex.position) * k.stiffness;
        let acceleration = force * k.inverse_mass;
        vertex.force = force;
        vertex.velocity = (vertex.velocity + acceleration) * k.damping;
        vertex.position += vertex.velocity;

        let look_ahead = vertex.velocity + force + acceleration;
        if look_ahead.length() < SNAP_EPSILON {
            vertex.position = target;
            vertex.velocity = Vec3::ZERO;
        }
    }

    /// Puts every vertex back on its rest target and clears momentum.
    pub fn reset_to_rest(&mut self, rest: &[Vec3], transform: &Transform) {
        for vertex in &mut self.vertices {
            if let Some(&local) = rest.get(vertex.id) {
                vertex.position = transform.transform_point(local);
            }
            vertex.velocity = Vec3::ZERO;
            vertex.force = Vec3::ZERO;
        }
        self.last_body_position = transform.position;
    }

    /// Largest distance between a vertex and its rest target.
    pub fn max_displacement(&self, rest: &[Vec3], transform: &Transform) -> f32 {
        self.vertices
            .iter()
            .filter_map(|vertex| {
                rest.get(vertex.id)
                    .map(|&local| vertex.position.distance(transform.transform_point(local)))
            })
            .fold(0.0, f32::max)
    }

    /// True when every vertex sits exactly on its target with no momentum.
    pub fn is_at_rest(&self, rest: &[Vec3], transform: &Transform) -> bool {
        self.vertices.iter().all(|vertex| {
            vertex.velocity == Vec3::ZERO
                && rest
                    .get(vertex.id)
                    .is_some_and(|&local| vertex.position == transform.transform_point(local))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_follows_body_displacement() {
        let rest = [Vec3::new(1.0, 0.0, 0.0)];
        let mut transform = Transform::default();
        let mut network = VertexSpringNetwork::new(&rest, &transform);

        transform.position = Vec3::new(0.5, 0.25, 0.0);
        network.step(&rest, &transform, &SpringConfig::default());

        // Pure rigid translation leaves the vertex exactly on target.
        assert_eq!(network.vertices()[0].position, Vec3::new(1.5, 0.25, 0.0));
        assert_eq!(network.vertices()[0].velocity, Vec3::ZERO);
    }

    #[test]
    fn snap_zeroes_momentum() {
        let rest = [Vec3::ZERO];
        let transform = Transform::default();
        let mut network = VertexSpringNetwork::new(&rest, &transform);
        network.get_mut(0).unwrap().position = Vec3::new(0.0005, 0.0, 0.0);

        network.step(&rest, &transform, &SpringConfig::default());
        let vertex = network.vertices()[0];
        assert_eq!(vertex.position, Vec3::ZERO);
        assert_eq!(vertex.velocity, Vec3::ZERO);
    }

    #[test]
    fn degenerate_mass_does_not_produce_nan() {
        let rest = [Vec3::ZERO];
        let transform = Transform::default();
        let mut network = VertexSpringNetwork::new(&rest, &transform);
        network.get_mut(0).unwrap().position = Vec3::X;

        let config = SpringConfig {
            mass: 0.0,
            ..SpringConfig::default()
        };
        network.step(&rest, &transform, &config);
        assert!(network.vertices()[0].position.is_finite());
    }
}

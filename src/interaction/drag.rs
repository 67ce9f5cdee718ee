use glam::Vec3;

use crate::{
    config::{DragConfig, DRAG_VELOCITY_SMOOTHING, MIN_DELTA_TIME, MIN_LENGTH},
    core::types::{PlanarAxes, Plane, Ray},
    dynamics::springs::VertexSpringNetwork,
};

/// A vertex picked up at the start of a drag, with its offset from the grab point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedVertex {
    pub id: usize,
    /// Vertex position minus grab point, constrained axis zeroed.
    pub offset: Vec3,
}

/// In-progress drag gesture. Exists only while the pointer is held on the object.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    plane: Plane,
    anchor: Vec3,
    current: Vec3,
    smoothed_velocity: Vec3,
    selected: Vec<SelectedVertex>,
}

impl DragSession {
    /// Starts a session from a confirmed hit on the object.
    ///
    /// The drag plane faces `view_forward` and passes through `hit_point`; it
    /// stays fixed for the whole session.
    pub fn begin(
        ray: &Ray,
        hit_point: Vec3,
        view_forward: Vec3,
        network: &VertexSpringNetwork,
        axes: PlanarAxes,
        config: &DragConfig,
    ) -> Self {
        let normal = if view_forward.length_squared() > 0.0 {
            view_forward
        } else {
            -ray.direction
        };
        let plane = Plane::from_point_normal(hit_point, normal);
        let start = plane
            .intersect_ray(ray)
            .map(|t| ray.at(t))
            .unwrap_or(hit_point);

        let radius = config.radius.max(0.0);
        let selected = network
            .vertices()
            .iter()
            .filter(|vertex| axes.planar_distance(vertex.position, hit_point) <= radius)
            .map(|vertex| SelectedVertex {
                id: vertex.id,
                offset: axes.flatten(vertex.position - hit_point),
            })
            .collect();

        Self {
            plane,
            anchor: start,
            current: start,
            smoothed_velocity: Vec3::ZERO,
            selected,
        }
    }

    /// Point translation is measured from. Advances by each realized step.
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn current_point(&self) -> Vec3 {
        self.current
    }

    pub fn smoothed_velocity(&self) -> Vec3 {
        self.smoothed_velocity
    }

    pub fn selected(&self) -> &[SelectedVertex] {
        &self.selected
    }

    pub fn is_selected(&self, id: usize) -> bool {
        self.selected.iter().any(|s| s.id == id)
    }

    pub fn advance_anchor(&mut self, step: Vec3) {
        self.anchor += step;
    }

    /// Moves the drag point along the session plane and pulls selected vertices.
    ///
    /// Returns `false` and leaves the session untouched when the ray misses the plane.
    pub fn update(
        &mut self,
        ray: &Ray,
        dt: f32,
        network: &mut VertexSpringNetwork,
        axes: PlanarAxes,
        config: &DragConfig,
    ) -> bool {
        let Some(t) = self.plane.intersect_ray(ray) else {
            return false;
        };
        let point = ray.at(t);
        let dt = dt.max(MIN_DELTA_TIME);

        let previous = std::mem::replace(&mut self.current, point);
        let instantaneous = axes.flatten(point - previous) / dt;
        self.smoothed_velocity = self
            .smoothed_velocity
            .lerp(instantaneous, DRAG_VELOCITY_SMOOTHING);

        let radius = config.radius.max(MIN_LENGTH);
        for selected in &self.selected {
            let Some(vertex) = network.get_mut(selected.id) else {
                continue;
            };
            let distance = axes.planar_distance(vertex.position, self.current);
            let weight = (1.0 - distance / radius).clamp(0.0, 1.0) * config.strength;
            let target = axes.with_constrained_from(self.current + selected.offset, vertex.position);
            let pulled = vertex.position + (target - vertex.position) * weight;
            vertex.position = axes.with_constrained_from(pulled, vertex.position);
            vertex.velocity = Vec3::ZERO;
        }
        true
    }
}

/// Drag lifecycle, held explicitly instead of as loose flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Inactive,
    Active(DragSession),
}

impl DragState {
    pub fn is_active(&self) -> bool {
        matches!(self, DragState::Active(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Active(session) => Some(session),
            DragState::Inactive => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            DragState::Active(session) => Some(session),
            DragState::Inactive => None,
        }
    }

    pub fn start(&mut self, session: DragSession) {
        *self = DragState::Active(session);
    }

    /// Ends the session, handing it back if one was active.
    pub fn end(&mut self) -> Option<DragSession> {
        match std::mem::take(self) {
            DragState::Active(session) => Some(session),
            DragState::Inactive => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Transform;

    fn network(points: &[Vec3]) -> VertexSpringNetwork {
        VertexSpringNetwork::new(points, &Transform::default())
    }

    #[test]
    fn offsets_drop_constrained_axis() {
        let net = network(&[Vec3::new(0.2, 0.1, 0.7)]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let session = DragSession::begin(
            &ray,
            Vec3::ZERO,
            -Vec3::Z,
            &net,
            PlanarAxes::XY,
            &DragConfig::default(),
        );
        assert_eq!(session.selected().len(), 1);
        assert_eq!(session.selected()[0].offset, Vec3::new(0.2, 0.1, 0.0));
    }

    #[test]
    fn missed_plane_leaves_session_unchanged() {
        let mut net = network(&[Vec3::ZERO]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let mut session = DragSession::begin(
            &ray,
            Vec3::ZERO,
            -Vec3::Z,
            &net,
            PlanarAxes::XY,
            &DragConfig::default(),
        );
        let before = session.clone();

        let parallel = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::X);
        assert!(!session.update(&parallel, 0.02, &mut net, PlanarAxes::XY, &DragConfig::default()));
        assert_eq!(session, before);
    }

    #[test]
    fn velocity_smoothing_uses_fixed_half_blend() {
        let mut net = network(&[Vec3::ZERO]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let config = DragConfig::default();
        let mut session =
            DragSession::begin(&ray, Vec3::ZERO, -Vec3::Z, &net, PlanarAxes::XY, &config);

        let moved = Ray::new(Vec3::new(0.1, 0.0, 5.0), -Vec3::Z);
        session.update(&moved, 0.1, &mut net, PlanarAxes::XY, &config);
        // Instantaneous 1.0, blended halfway from zero.
        assert!((session.smoothed_velocity().x - 0.5).abs() < 1e-5);

        session.update(&moved, 0.1, &mut net, PlanarAxes::XY, &config);
        assert!((session.smoothed_velocity().x - 0.25).abs() < 1e-5);
    }

    #[test]
    fn drag_state_end_returns_session_once() {
        let net = network(&[Vec3::ZERO]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let mut state = DragState::default();
        state.start(DragSession::begin(
            &ray,
            Vec3::ZERO,
            -Vec3::Z,
            &net,
            PlanarAxes::XY,
            &DragConfig::default(),
        ));
        assert!(state.is_active());
        assert!(state.end().is_some());
        assert!(state.end().is_none());
        assert!(!state.is_active());
    }
}

use glam::Vec3;
use log::debug;

use crate::{
    collision::queries::{Raycast, RaycastHit, RaycastQuery},
    config::DeformConfig,
    core::{
        collider::Collider,
        mesh::DeformableMesh,
        rigidbody::{BodyConstraints, RigidBody},
        types::{PlanarAxes, Ray},
    },
    deform::writer::MeshDeformationWriter,
    dynamics::{
        coupler::VelocityCoupler,
        springs::{VertexRecord, VertexSpringNetwork},
    },
    error::Result,
    interaction::{
        drag::{DragSession, DragState},
        intent::{IntentOutcome, MotionIntent},
        pointer::{InteractionEvent, PointerSample},
    },
    utils::logging::ScopedTimer,
};

/// A grabbable soft surface riding on a rigid body.
///
/// The host calls [`Self::advance_input`] at frame rate and then
/// [`Self::advance_simulation`] once per fixed step.
#[derive(Debug, Clone)]
pub struct DeformableObject {
    body: RigidBody,
    collider: Collider,
    mesh: DeformableMesh,
    network: VertexSpringNetwork,
    drag: DragState,
    intent: MotionIntent,
    coupler: VelocityCoupler,
    axes: PlanarAxes,
    config: DeformConfig,
}

impl DeformableObject {
    pub fn new(
        mut body: RigidBody,
        collider: Collider,
        mesh: DeformableMesh,
        config: DeformConfig,
    ) -> Result<Self> {
        config.validate()?;
        let axes = PlanarAxes::new(config.constrained_axis);
        if config.planar_only {
            body.constraints = BodyConstraints::planar(axes.constrained);
            body.linear_velocity = body.constraints.filter_linear(body.linear_velocity);
            body.angular_velocity = body.constraints.filter_angular(body.angular_velocity);
        }
        let network = VertexSpringNetwork::new(mesh.rest_vertices(), &body.transform);

        Ok(Self {
            body,
            collider,
            mesh,
            network,
            drag: DragState::Inactive,
            intent: MotionIntent::new(),
            coupler: VelocityCoupler::new(axes),
            axes,
            config,
        })
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    /// Access for the external physics step (joints, gravity, integration).
    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }

    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    pub fn mesh(&self) -> &DeformableMesh {
        &self.mesh
    }

    pub fn vertices(&self) -> &[VertexRecord] {
        self.network.vertices()
    }

    pub fn network_mut(&mut self) -> &mut VertexSpringNetwork {
        &mut self.network
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    pub fn desired_velocity(&self) -> Vec3 {
        self.intent.desired_velocity()
    }

    pub fn axes(&self) -> PlanarAxes {
        self.axes
    }

    pub fn config(&self) -> &DeformConfig {
        &self.config
    }

    /// Replaces the tuning. The constrained axis and body locks stay as constructed.
    pub fn set_config(&mut self, config: DeformConfig) -> Result<()> {
        config.validate()?;
        self.config = DeformConfig {
            constrained_axis: self.config.constrained_axis,
            planar_only: self.config.planar_only,
            ..config
        };
        Ok(())
    }

    /// World-space rest target of a vertex under the body's current transform.
    pub fn rest_target(&self, id: usize) -> Option<Vec3> {
        self.mesh
            .rest_vertices()
            .get(id)
            .map(|&local| self.body.transform.transform_point(local))
    }

    pub fn hit_test(&self, ray: &Ray) -> Option<RaycastHit> {
        Raycast::cast(
            &RaycastQuery::unbounded(*ray),
            &self.collider,
            &self.body.transform,
            Some(&self.mesh),
        )
    }

    /// Dispatches one pointer sample. Variable-rate phase.
    pub fn advance_input(&mut self, sample: PointerSample, dt: f32) -> Option<InteractionEvent> {
        match sample {
            PointerSample::Down { ray, view_forward } => {
                let released = self.end_drag();
                if released.is_some() {
                    debug!("pointer pressed during an active drag; previous session closed");
                }
                Some(self.begin_drag(&ray, view_forward))
            }
            PointerSample::Held { ray } => {
                self.update_drag(&ray, dt);
                None
            }
            PointerSample::Up => self.end_drag(),
            PointerSample::Idle => None,
        }
    }

    /// Starts a drag if `ray` hits the object's own collider.
    pub fn begin_drag(&mut self, ray: &Ray, view_forward: Vec3) -> InteractionEvent {
        let Some(hit) = self.hit_test(ray) else {
            return InteractionEvent::Missed;
        };

        let session = DragSession::begin(
            ray,
            hit.point,
            view_forward,
            &self.network,
            self.axes,
            &self.config.drag,
        );
        let selected = session.selected().len();
        debug!(
            "drag started at {:?}, {} of {} vertices selected",
            hit.point,
            selected,
            self.network.len()
        );
        self.drag.start(session);

        InteractionEvent::Grabbed {
            point: hit.point,
            selected,
        }
    }

    /// Moves the active drag. Returns `false` when there is no session or the
    /// ray missed the drag plane.
    pub fn update_drag(&mut self, ray: &Ray, dt: f32) -> bool {
        let Some(session) = self.drag.session_mut() else {
            return false;
        };
        if !session.update(ray, dt, &mut self.network, self.axes, &self.config.drag) {
            debug!("drag ray parallel to or behind the drag plane; update skipped");
            return false;
        }

        let outcome = self.intent.update(
            &mut self.body,
            self.axes,
            session.anchor(),
            session.current_point(),
            session.smoothed_velocity(),
            &self.config.drag,
            &self.config.motion,
            dt,
            self.config.fixed_dt(),
        );
        if let IntentOutcome::Direct { step } = outcome {
            debug!("body does not accept coupled drive; translated by {step:?}");
        }
        session.advance_anchor(outcome.step());
        true
    }

    /// Clears the session and lets the desired velocity relax to zero.
    pub fn end_drag(&mut self) -> Option<InteractionEvent> {
        let session = self.drag.end()?;
        self.intent.relax();
        debug!(
            "drag released with {} vertices selected",
            session.selected().len()
        );
        Some(InteractionEvent::Released)
    }

    /// Runs one fixed step: velocity coupling, spring network, mesh write-back.
    pub fn advance_simulation(&mut self, fixed_dt: f32) {
        let _timer = ScopedTimer::new("deform::fixed_step");

        self.coupler.apply(
            &mut self.body,
            self.intent.desired_velocity(),
            &self.config.motion,
            fixed_dt,
        );

        self.network.step(
            self.mesh.rest_vertices(),
            &self.body.transform,
            &self.config.spring,
        );

        MeshDeformationWriter::write(
            &mut self.mesh,
            &self.network,
            &self.body.transform,
            self.config.spring.intensity,
        );
    }

    /// Snaps every vertex back to its rest target and resets the mesh.
    pub fn reset_to_rest(&mut self) {
        self.network
            .reset_to_rest(self.mesh.rest_vertices(), &self.body.transform);
        self.mesh.reset_to_rest();
        self.mesh.recalculate_normals();
    }

    pub fn is_at_rest(&self) -> bool {
        self.network
            .is_at_rest(self.mesh.rest_vertices(), &self.body.transform)
    }

    pub fn max_displacement(&self) -> f32 {
        self.network
            .max_displacement(self.mesh.rest_vertices(), &self.body.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Transform;

    fn quad_object(config: DeformConfig) -> DeformableObject {
        let mesh = DeformableMesh::grid(1, 1, 2.0).unwrap();
        DeformableObject::new(
            RigidBody::new(Transform::default()),
            Collider::cuboid(Vec3::new(1.0, 1.0, 0.05)),
            mesh,
            config,
        )
        .unwrap()
    }

    fn down(x: f32, y: f32) -> PointerSample {
        PointerSample::Down {
            ray: Ray::new(Vec3::new(x, y, 5.0), -Vec3::Z),
            view_forward: -Vec3::Z,
        }
    }

    #[test]
    fn missed_press_creates_no_session() {
        let mut object = quad_object(DeformConfig::default());
        let event = object.advance_input(down(4.0, 4.0), 0.02);
        assert_eq!(event, Some(InteractionEvent::Missed));
        assert!(!object.is_dragging());
    }

    #[test]
    fn release_without_session_is_silent() {
        let mut object = quad_object(DeformConfig::default());
        assert_eq!(object.advance_input(PointerSample::Up, 0.02), None);
    }

    #[test]
    fn second_press_replaces_session() {
        let mut object = quad_object(DeformConfig::default());
        object.advance_input(down(0.9, 0.9), 0.02);
        object.advance_input(down(-0.9, -0.9), 0.02);
        let session = object.drag_state().session().unwrap();
        assert!(session.current_point().x < 0.0);
    }

    #[test]
    fn planar_only_locks_body() {
        let object = quad_object(DeformConfig::default());
        assert_eq!(
            object.body().constraints,
            BodyConstraints::planar(crate::core::types::Axis::Z)
        );
    }

    #[test]
    fn reset_restores_rest_pose() {
        let mut object = quad_object(DeformConfig::default());
        object.network_mut().get_mut(0).unwrap().position += Vec3::X;
        assert!(!object.is_at_rest());
        object.reset_to_rest();
        assert!(object.is_at_rest());
        assert_eq!(object.max_displacement(), 0.0);
    }
}

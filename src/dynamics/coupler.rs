use glam::Vec3;
use log::{debug, warn};

use crate::{
    config::{MotionConfig, MIN_DELTA_TIME},
    core::{rigidbody::DrivableBody, types::PlanarAxes},
};

/// Eases a body's in-plane velocity toward a desired velocity, once per fixed step.
///
/// The approach is a linear rate limit in velocity space: it never overshoots
/// the desired velocity. A hard speed cap is applied after the limited step.
#[derive(Debug, Clone, Copy)]
pub struct VelocityCoupler {
    pub axes: PlanarAxes,
    capped: bool,
}

impl Default for VelocityCoupler {
    fn default() -> Self {
        Self::new(PlanarAxes::XY)
    }
}

impl VelocityCoupler {
    pub fn new(axes: PlanarAxes) -> Self {
        Self {
            axes,
            capped: false,
        }
    }

    /// Whether the hard speed cap clipped the most recent step.
    pub fn is_capped(&self) -> bool {
        self.capped
    }

    /// Returns the in-plane velocity written to the body, or `None` when the
    /// body does not accept coupled drive.
    pub fn apply<B: DrivableBody + ?Sized>(
        &mut self,
        body: &mut B,
        desired_velocity: Vec3,
        config: &MotionConfig,
        fixed_dt: f32,
    ) -> Option<Vec3> {
        if !body.accepts_coupled_drive() {
            return None;
        }

        let fixed_dt = fixed_dt.max(MIN_DELTA_TIME);
        let current = body.linear_velocity();
        let planar = self.axes.flatten(current);
        let desired = self.axes.flatten(desired_velocity);

        let max_change = config.drag_acceleration.max(0.0) * fixed_dt;
        let stepped = planar + (desired - planar).clamp_length_max(max_change);

        let hard_max = config.hard_max_speed.max(0.0);
        let capped = stepped.clamp_length_max(hard_max);
        let engaged = capped != stepped;
        if engaged && !self.capped {
            warn!(
                "hard speed cap engaged: {:.3} > {:.3}",
                stepped.length(),
                hard_max
            );
        } else if !engaged && self.capped {
            debug!("hard speed cap released");
        }
        self.capped = engaged;

        body.set_linear_velocity(self.axes.with_constrained_from(capped, current));
        Some(capped)
    }
}

use glam::Vec3;

use crate::{
    config::{DragConfig, MotionConfig, MIN_DELTA_TIME, MIN_LENGTH},
    core::{rigidbody::DrivableBody, types::PlanarAxes},
};

/// How a proposed translation step reached the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntentOutcome {
    /// Inside the dead zone; nothing proposed.
    Idle,
    /// Step converted into a desired velocity for the coupler.
    Coupled { step: Vec3, desired_velocity: Vec3 },
    /// Body does not accept coupled drive; step applied as a position delta.
    Direct { step: Vec3 },
}

impl IntentOutcome {
    /// Step that was realized this update, zero when idle.
    pub fn step(&self) -> Vec3 {
        match *self {
            IntentOutcome::Idle => Vec3::ZERO,
            IntentOutcome::Coupled { step, .. } | IntentOutcome::Direct { step } => step,
        }
    }
}

/// Whole-object translation intent derived from the drag gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionIntent {
    desired_velocity: Vec3,
}

impl MotionIntent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn desired_velocity(&self) -> Vec3 {
        self.desired_velocity
    }

    /// Drops the target to zero; the coupler eases the body down from there.
    pub fn relax(&mut self) {
        self.desired_velocity = Vec3::ZERO;
    }

    /// Translation step for one input update, clamped to `max_move_speed * dt`.
    ///
    /// Zero while the in-plane excursion from `anchor` stays inside the dead
    /// zone of `drag.radius * motion.move_threshold`.
    pub fn propose_step(
        axes: PlanarAxes,
        anchor: Vec3,
        current: Vec3,
        smoothed_velocity: Vec3,
        drag: &DragConfig,
        motion: &MotionConfig,
        dt: f32,
    ) -> Vec3 {
        let dt = dt.max(MIN_DELTA_TIME);
        let offset = axes.flatten(current - anchor);
        let distance = offset.length();
        let threshold = drag.radius.max(MIN_LENGTH) * motion.move_threshold;
        if distance <= threshold || distance < MIN_LENGTH {
            return Vec3::ZERO;
        }

        let direction = offset / distance;
        let excess = distance - threshold;
        let step = direction * excess * motion.move_gain
            + axes.flatten(smoothed_velocity) * motion.velocity_move_gain * dt;
        step.clamp_length_max(motion.max_move_speed.max(0.0) * dt)
    }

    /// Recomputes the intent for one input update and routes the step to the body.
    #[allow(clippy::too_many_arguments)]
    pub fn update<B: DrivableBody + ?Sized>(
        &mut self,
        body: &mut B,
        axes: PlanarAxes,
        anchor: Vec3,
        current: Vec3,
        smoothed_velocity: Vec3,
        drag: &DragConfig,
        motion: &MotionConfig,
        dt: f32,
        fixed_dt: f32,
    ) -> IntentOutcome {
        let step = Self::propose_step(axes, anchor, current, smoothed_velocity, drag, motion, dt);
        if step == Vec3::ZERO {
            self.desired_velocity = Vec3::ZERO;
            return IntentOutcome::Idle;
        }

        if body.accepts_coupled_drive() {
            let desired = (step / fixed_dt.max(MIN_DELTA_TIME))
                .clamp_length_max(motion.max_move_speed.max(0.0));
            self.desired_velocity = axes.flatten(desired);
            IntentOutcome::Coupled {
                step,
                desired_velocity: self.desired_velocity,
            }
        } else {
            self.desired_velocity = Vec3::ZERO;
            body.set_position(body.position() + step);
            IntentOutcome::Direct { step }
        }
    }
}

//! Global configuration constants and tunables for the deformation core.

use serde::{Deserialize, Serialize};

use crate::{
    core::types::Axis,
    error::{DeformError, Result},
};

/// Default gravity vector applied by the host integrator (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Fixed physics step the spring constants are tuned against (in seconds).
pub const DEFAULT_FIXED_TIME_STEP: f32 = 0.02;

/// Look-ahead magnitude below which a vertex snaps onto its target.
pub const SNAP_EPSILON: f32 = 0.001;

/// Smallest time delta used in any division.
pub const MIN_DELTA_TIME: f32 = 1e-5;

/// Smallest length used as a divisor for radii and bound heights.
pub const MIN_LENGTH: f32 = 1e-5;

/// Blend applied to the drag velocity every input sample. Not dt-scaled.
pub const DRAG_VELOCITY_SMOOTHING: f32 = 0.5;

/// Maximum fixed steps the host runs for a single frame.
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;

/// Vertex count above which the spring network fans out across threads.
pub const PARALLEL_VERTEX_THRESHOLD: usize = 2048;

/// Per-vertex spring-damper tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub mass: f32,
    /// Per-step velocity retention in (0, 1].
    pub damping: f32,
    /// Global scale on the height falloff applied by the mesh writer.
    pub intensity: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 0.2,
            mass: 1.0,
            damping: 0.5,
            intensity: 1.0,
        }
    }
}

/// Vertex selection around the grab point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub radius: f32,
    pub strength: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            strength: 1.0,
        }
    }
}

/// Whole-object translation derived from the drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Dead zone as a fraction of the drag radius.
    pub move_threshold: f32,
    pub move_gain: f32,
    pub velocity_move_gain: f32,
    pub max_move_speed: f32,
    /// Velocity change per second the coupler may apply to the body.
    pub drag_acceleration: f32,
    pub hard_max_speed: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_threshold: 0.6,
            move_gain: 0.5,
            velocity_move_gain: 0.1,
            max_move_speed: 3.0,
            drag_acceleration: 20.0,
            hard_max_speed: 6.0,
        }
    }
}

/// Complete tuning for a deformable object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeformConfig {
    pub spring: SpringConfig,
    pub drag: DragConfig,
    pub motion: MotionConfig,
    pub fixed_time_step: f32,
    /// Lock the body to the drag plane (one translation, all but one rotation).
    pub planar_only: bool,
    /// Axis the drag plane is perpendicular to.
    pub constrained_axis: Axis,
}

impl Default for DeformConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::default(),
            drag: DragConfig::default(),
            motion: MotionConfig::default(),
            fixed_time_step: DEFAULT_FIXED_TIME_STEP,
            planar_only: true,
            constrained_axis: Axis::Z,
        }
    }
}

impl DeformConfig {
    /// Loose, wobbly surface with a wide grab.
    pub fn jelly() -> Self {
        Self {
            spring: SpringConfig {
                stiffness: 0.12,
                mass: 1.0,
                damping: 0.6,
                intensity: 1.0,
            },
            drag: DragConfig {
                radius: 0.8,
                strength: 1.0,
            },
            ..Self::default()
        }
    }

    /// Stiff surface that barely yields and recovers quickly.
    pub fn firm() -> Self {
        Self {
            spring: SpringConfig {
                stiffness: 0.3,
                mass: 1.0,
                damping: 0.4,
                intensity: 0.5,
            },
            drag: DragConfig {
                radius: 0.35,
                strength: 0.6,
            },
            ..Self::default()
        }
    }

    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    pub fn with_drag(mut self, drag: DragConfig) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_fixed_time_step(mut self, fixed_time_step: f32) -> Self {
        self.fixed_time_step = fixed_time_step;
        self
    }

    pub fn with_planar_only(mut self, planar_only: bool) -> Self {
        self.planar_only = planar_only;
        self
    }

    pub fn with_constrained_axis(mut self, axis: Axis) -> Self {
        self.constrained_axis = axis;
        self
    }

    /// Fixed step floored to [`MIN_DELTA_TIME`].
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_time_step.max(MIN_DELTA_TIME)
    }

    /// Rejects values no amount of runtime clamping can make meaningful.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("spring.stiffness", self.spring.stiffness),
            ("spring.mass", self.spring.mass),
            ("spring.damping", self.spring.damping),
            ("spring.intensity", self.spring.intensity),
            ("drag.radius", self.drag.radius),
            ("drag.strength", self.drag.strength),
            ("motion.move_threshold", self.motion.move_threshold),
            ("motion.move_gain", self.motion.move_gain),
            ("motion.velocity_move_gain", self.motion.velocity_move_gain),
            ("motion.max_move_speed", self.motion.max_move_speed),
            ("motion.drag_acceleration", self.motion.drag_acceleration),
            ("motion.hard_max_speed", self.motion.hard_max_speed),
            ("fixed_time_step", self.fixed_time_step),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(DeformError::invalid_config(field, "must be finite"));
            }
        }

        if self.spring.mass <= 0.0 {
            return Err(DeformError::invalid_config("spring.mass", "must be positive"));
        }
        if self.spring.stiffness < 0.0 {
            return Err(DeformError::invalid_config(
                "spring.stiffness",
                "must not be negative",
            ));
        }
        if self.spring.damping <= 0.0 || self.spring.damping > 1.0 {
            return Err(DeformError::invalid_config(
                "spring.damping",
                "must lie in (0, 1]",
            ));
        }

        let non_negative = [
            ("drag.radius", self.drag.radius),
            ("motion.max_move_speed", self.motion.max_move_speed),
            ("motion.drag_acceleration", self.motion.drag_acceleration),
            ("motion.hard_max_speed", self.motion.hard_max_speed),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(DeformError::invalid_config(field, "must not be negative"));
            }
        }

        if self.fixed_time_step <= 0.0 {
            return Err(DeformError::invalid_config(
                "fixed_time_step",
                "must be positive",
            ));
        }
        Ok(())
    }
}

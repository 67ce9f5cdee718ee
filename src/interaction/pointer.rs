use glam::Vec3;

use crate::core::types::Ray;

/// One variable-rate pointer sample, already converted into a world ray by the host camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSample {
    /// Button pressed this frame. `view_forward` is the camera's forward axis.
    Down { ray: Ray, view_forward: Vec3 },
    /// Button still held.
    Held { ray: Ray },
    /// Button released this frame.
    Up,
    Idle,
}

/// Notifications for glue code (audio, particles, joint monitors).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    Grabbed { point: Vec3, selected: usize },
    /// Pointer pressed but the ray missed the object.
    Missed,
    Released,
}

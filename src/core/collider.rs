use super::types::Transform;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Hit surfaces a deformable object can be grabbed by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ColliderShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    /// Uses the rest pose of the object's own deformable mesh.
    Mesh,
}

/// The object's own collider, positioned relative to its rigid body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    pub shape: ColliderShape,
    pub offset: Transform,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            shape: ColliderShape::Mesh,
            offset: Transform::default(),
        }
    }
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere { radius },
            offset: Transform::default(),
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            shape: ColliderShape::Box { half_extents },
            offset: Transform::default(),
        }
    }

    pub fn mesh() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: Transform) -> Self {
        self.offset = offset;
        self
    }

    pub fn world_transform(&self, rigidbody_transform: &Transform) -> Transform {
        rigidbody_transform.combine(&self.offset)
    }
}

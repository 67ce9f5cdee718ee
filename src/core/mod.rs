//! Core types describing the deformable object and its collaborators.

pub mod collider;
pub mod mesh;
pub mod rigidbody;
pub mod types;

pub use collider::{Collider, ColliderShape};
pub use mesh::{Aabb, DeformableMesh, MeshData};
pub use rigidbody::{BodyConstraints, DrivableBody, RigidBody};
pub use types::{Axis, PlanarAxes, Plane, Ray, Transform};

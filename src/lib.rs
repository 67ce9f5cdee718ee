//! Soft Grab – pointer-driven soft-body deformation for Rust.
//!
//! A mesh's vertices are pulled toward a drag target and sprung back toward
//! their rest pose, while the rigid body carrying the mesh is nudged by an
//! eased, clamped velocity derived from the same drag gesture.
//!
//! The host owns the loop: call [`DeformableObject::advance_input`] at frame
//! rate and [`DeformableObject::advance_simulation`] once per fixed step, or
//! let [`DeformWorld`] do both.

pub mod collision;
pub mod config;
pub mod core;
pub mod deform;
pub mod dynamics;
pub mod error;
pub mod interaction;
pub mod object;
pub mod utils;
pub mod world;

pub use glam::{Quat, Vec3};

pub use collision::queries::{Raycast, RaycastHit, RaycastQuery};
pub use config::{DeformConfig, DragConfig, MotionConfig, SpringConfig};
pub use crate::core::{
    collider::{Collider, ColliderShape},
    mesh::{Aabb, DeformableMesh, MeshData},
    rigidbody::{BodyConstraints, DrivableBody, RigidBody},
    types::{Axis, PlanarAxes, Plane, Ray, Transform},
};
pub use deform::writer::MeshDeformationWriter;
pub use dynamics::{
    coupler::VelocityCoupler,
    integrator::BodyIntegrator,
    springs::{VertexRecord, VertexSpringNetwork},
};
pub use error::{DeformError, Result};
pub use interaction::{
    drag::{DragSession, DragState, SelectedVertex},
    intent::{IntentOutcome, MotionIntent},
    pointer::{InteractionEvent, PointerSample},
};
pub use object::DeformableObject;
pub use world::DeformWorld;

//! Fixed-rate dynamics: vertex springs, velocity coupling, and body integration.

pub mod coupler;
pub mod integrator;
pub mod springs;

pub use coupler::VelocityCoupler;
pub use integrator::BodyIntegrator;
pub use springs::{VertexRecord, VertexSpringNetwork};

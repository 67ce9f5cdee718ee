use crate::{
    config::MIN_LENGTH,
    core::{
        mesh::{Aabb, DeformableMesh},
        types::Transform,
    },
    dynamics::springs::VertexSpringNetwork,
};

/// Commits simulated vertex positions back into the mesh's working buffer.
pub struct MeshDeformationWriter;

impl MeshDeformationWriter {
    /// Height falloff: 1 at the top of `bounds`, 0 at the bottom, scaled by `intensity`.
    pub fn intensity_at(world_y: f32, bounds: &Aabb, intensity: f32) -> f32 {
        let height = bounds.height().max(MIN_LENGTH);
        (1.0 - (bounds.max.y - world_y) / height) * intensity
    }

    /// Blends each rest vertex toward its simulated position and rebuilds normals.
    pub fn write(
        mesh: &mut DeformableMesh,
        network: &VertexSpringNetwork,
        transform: &Transform,
        intensity: f32,
    ) {
        let bounds = mesh.world_bounds(transform);
        let vertices = network.vertices();

        mesh.rewrite_from_rest(|id, rest| {
            let Some(vertex) = vertices.get(id) else {
                return rest;
            };
            let target_world = transform.transform_point(rest);
            let factor = Self::intensity_at(target_world.y, &bounds, intensity);
            let simulated_local = transform.inverse_transform_point(vertex.position);
            rest.lerp(simulated_local, factor)
        });
        mesh.recalculate_normals();
    }
}

//! Per-voxel meshing with ambient occlusion.
//!
//! Every exposed face of every solid voxel becomes its own quad with four
//! independently shaded vertices. Faces are never merged, which costs triangles
//! but lets each vertex carry its own AO.

use log::{debug, warn};
use web_time::Instant;

use crate::engine_state::rendering::meshing::{
    ambient_occlusion::calculate_vertex_ao,
    diagonal::choose_optimal_diagonal,
    vertex_color::VertexColorManager,
};
use crate::engine_state::voxels::{
    block::{base_color, block_side::BlockSide, is_solid, AIR},
    world::ChunkView,
};
use crate::error::MeshResult;

use super::{face::Face, mesh::MeshBuffer};

/// Builds the per-voxel AO mesh of the viewed chunk.
///
/// Neighbor and AO lookups outside the chunk go through the view's store when
/// it has one, and see air otherwise. A neighbor past the edge of the
/// addressable world is air, so the face is drawn. An AO lookup that fails is
/// replaced by full light for that vertex and the build continues.
pub fn per_voxel(view: &ChunkView<'_>, colors: &mut VertexColorManager) -> MeshResult<MeshBuffer> {
    let start = Instant::now();
    let chunk = view.chunk();
    let mut mesh = MeshBuffer::new();
    let mut ao_failures = 0usize;

    for (position, block) in chunk.blocks() {
        let (x, y, z) = (position.x as i32, position.y as i32, position.z as i32);
        let base = base_color(block);

        for side in BlockSide::all() {
            let [nx, ny, nz] = side.normal();
            let neighbor = view.sample(x + nx, y + ny, z + nz).unwrap_or_else(|err| {
                debug!("Neighbor lookup failed at ({x}, {y}, {z}) {side}, treating it as air: {err}");
                AIR
            });
            if is_solid(neighbor) {
                continue;
            }

            let mut ao = [1.0f32; 4];
            for (vertex, corner) in side.vertex_to_corner().into_iter().enumerate() {
                ao[vertex] = calculate_vertex_ao(view, x, y, z, side, corner).unwrap_or_else(|err| {
                    warn!("AO failed at ({x}, {y}, {z}) {side} corner {corner}: {err}");
                    ao_failures += 1;
                    1.0
                });
            }

            let mut vertex_colors = [[0.0f32; 3]; 4];
            for (color, value) in vertex_colors.iter_mut().zip(ao) {
                *color = colors.shade(base, value)?.to_array();
            }
            let use_ac = choose_optimal_diagonal(&ao)?;

            mesh.push_face(&Face::new(x, y, z, block, side), vertex_colors, use_ac)?;
        }
    }

    debug!(
        "Per-voxel meshed chunk {:?}: {} quads in {:?} ({} AO failures)",
        chunk.position,
        mesh.quad_count(),
        start.elapsed(),
        ao_failures
    );
    Ok(mesh)
}

//! Terrain synthesis: an FBM heightfield with the river bed carved along
//! the configured footprint, meshed once at load time. The same height
//! samples feed both the rendered mesh and the collision mesh the
//! simulation raycasts against.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, Mesh, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use noise::{Fbm, NoiseFn, Perlin};
use sim::terrain::TerrainMesh;
use sim::water::RiverConfig;

use crate::constants::{
    RIVER_BANK_BLEND, RIVER_BED_DEPTH, TERRAIN_AMPLITUDE, TERRAIN_NOISE_FREQUENCY,
    TERRAIN_RESOLUTION, TERRAIN_SPACING,
};

#[derive(Component)]
pub struct TerrainMarker;

/// Heightfield plus the grid metadata both mesh builders need.
pub struct Heightfield {
    pub heights: Vec<f32>,
    pub nx: usize,
    pub nz: usize,
    pub spacing: f32,
    pub origin: Vec3,
}

impl Heightfield {
    pub fn world_xz(&self, ix: usize, iz: usize) -> (f32, f32) {
        (
            self.origin.x + ix as f32 * self.spacing,
            self.origin.z + iz as f32 * self.spacing,
        )
    }

    pub fn collision_mesh(&self) -> TerrainMesh {
        TerrainMesh::from_heightfield(&self.heights, self.nx, self.nz, self.spacing, self.origin)
    }
}

/// Synthesize the demo terrain. FBM noise gives the rolling banks; the
/// river footprint is carved down to a flat bed below the water line, with
/// a blended shoulder so the banks slope into it.
pub fn build_heightfield(seed: u32, river: &RiverConfig) -> Heightfield {
    let n = TERRAIN_RESOLUTION;
    let half = (n - 1) as f32 * TERRAIN_SPACING * 0.5;
    let origin = Vec3::new(-half, 0.0, -half);
    let fbm = Fbm::<Perlin>::new(seed);
    let bed = river.water_height - RIVER_BED_DEPTH;
    let (width, length) = river.safe_extents();

    let mut heights = vec![0.0f32; n * n];
    for iz in 0..n {
        for ix in 0..n {
            let x = origin.x + ix as f32 * TERRAIN_SPACING;
            let z = origin.z + iz as f32 * TERRAIN_SPACING;
            let rolling = fbm.get([
                x as f64 * TERRAIN_NOISE_FREQUENCY,
                z as f64 * TERRAIN_NOISE_FREQUENCY,
            ]) as f32
                * TERRAIN_AMPLITUDE;

            // Signed distance to the river footprint in its local frame:
            // negative inside, positive outside.
            let local = river.world_to_local(x, z);
            let over_along = local.x.abs() - length * 0.5;
            let over_across = local.y.abs() - width * 0.5;
            let outside = over_along.max(over_across);
            let carve = 1.0 - (outside / RIVER_BANK_BLEND).clamp(0.0, 1.0);

            heights[iz * n + ix] = rolling * (1.0 - carve) + bed * carve;
        }
    }

    Heightfield {
        heights,
        nx: n,
        nz: n,
        spacing: TERRAIN_SPACING,
        origin,
    }
}

/// Turn the heightfield into a renderable mesh with smooth normals.
pub fn heightfield_render_mesh(field: &Heightfield) -> Mesh {
    let (nx, nz) = (field.nx, field.nz);
    let mut positions = Vec::with_capacity(nx * nz);
    let mut uvs = Vec::with_capacity(nx * nz);
    for iz in 0..nz {
        for ix in 0..nx {
            let (x, z) = field.world_xz(ix, iz);
            positions.push([x, field.heights[iz * nx + ix], z]);
            uvs.push([ix as f32 / (nx - 1) as f32, iz as f32 / (nz - 1) as f32]);
        }
    }

    let mut indices = Vec::with_capacity((nx - 1) * (nz - 1) * 6);
    for iz in 0..nz - 1 {
        for ix in 0..nx - 1 {
            let a = (iz * nx + ix) as u32;
            let b = a + 1;
            let c = a + nx as u32;
            let d = c + 1;
            // Counter-clockwise seen from above.
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh.compute_smooth_normals();
    mesh
}

/// Spawn the terrain and the anchor rocks. Rocks are purely visual; their
/// influence on the water comes from the anchor entries the simulation
/// already carries.
pub fn spawn_terrain(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    field: &Heightfield,
    river: &RiverConfig,
    anchors: &[sim::water::Anchor],
) {
    let terrain_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.42, 0.25),
        perceptual_roughness: 1.0,
        ..default()
    });
    commands.spawn((
        TerrainMarker,
        Mesh3d(meshes.add(heightfield_render_mesh(field))),
        MeshMaterial3d(terrain_material),
        Transform::IDENTITY,
    ));

    let rock_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.44, 0.42),
        perceptual_roughness: 0.95,
        ..default()
    });
    for anchor in anchors {
        let world = river.local_to_world(anchor.relative_x, anchor.relative_z);
        let radius = (anchor.influence_radius * 0.4).max(0.3);
        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(radius))),
            MeshMaterial3d(rock_material.clone()),
            Transform::from_xyz(world.x, river.water_height - radius * 0.3, world.y),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn river_footprint_is_carved_below_the_water_line() {
        let river = RiverConfig::default();
        let field = build_heightfield(7, &river);
        // Center of the river.
        let n = field.nx;
        let center = field.heights[(n / 2) * n + n / 2];
        assert!((center - (river.water_height - RIVER_BED_DEPTH)).abs() < 1e-4);
    }

    #[test]
    fn bed_standing_player_counts_as_wading() {
        let river = RiverConfig::default();
        let field = build_heightfield(7, &river);
        let terrain = field.collision_mesh();
        let bed = sim::terrain::ground_height(&terrain, Vec3::new(0.5, 10.0, 0.5))
            .expect("bed under the river center");
        let position = Vec3::new(0.5, bed + sim::GROUND_EPSILON, 0.5);
        assert!(river.wading(position), "bed too deep for the coupling window");

        let flow = river.flow_direction();
        let downstream = Vec3::new(flow.x, 0.0, flow.y);
        assert!(river.flow_speed_multiplier(position, downstream) > 1.0);
    }

    #[test]
    fn collision_mesh_matches_the_render_heights() {
        let river = RiverConfig::default();
        let field = build_heightfield(7, &river);
        let terrain = field.collision_mesh();
        let hit = sim::terrain::ground_height(&terrain, Vec3::new(0.0, 10.0, 0.0));
        let expected = field.heights[(field.nz / 2) * field.nx + field.nx / 2];
        assert!(hit.is_some_and(|h| (h - expected).abs() < 0.05));
    }
}

//! The animated river surface.
//!
//! A tessellated grid over the configured footprint, built once; every
//! frame the vertex heights are rewritten from the wave field and the
//! normals recomputed. Vertex positions are kept in world space so the
//! same (x, z) pairs can be fed straight back into the field.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, Mesh, PrimitiveTopology, VertexAttributeValues};
use bevy::render::render_asset::RenderAssetUsages;
use sim::water::RiverConfig;
use sim::Session;

use crate::constants::WATER_TESSELLATION;
use crate::GameState;

#[derive(Component)]
pub struct WaterSurface {
    /// World XZ of every vertex, fixed at build time.
    columns: Vec<[f32; 2]>,
    mesh: Handle<Mesh>,
}

pub struct WaterPlugin;

impl Plugin for WaterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            animate_water_system.run_if(in_state(GameState::Running)),
        );
    }
}

/// Build the surface grid and spawn it. Heights start at the flat water
/// line; the first animation frame replaces them.
pub fn spawn_water(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    river: &RiverConfig,
) {
    let (width, length) = river.safe_extents();
    let cols = ((length * WATER_TESSELLATION).ceil() as usize).max(1) + 1;
    let rows = ((width * WATER_TESSELLATION).ceil() as usize).max(1) + 1;

    let mut columns = Vec::with_capacity(cols * rows);
    let mut positions = Vec::with_capacity(cols * rows);
    let mut uvs = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let along = length * (col as f32 / (cols - 1) as f32 - 0.5);
            let across = width * (row as f32 / (rows - 1) as f32 - 0.5);
            let world = river.local_to_world(along, across);
            columns.push([world.x, world.y]);
            positions.push([world.x, river.water_height, world.y]);
            uvs.push([
                col as f32 / (cols - 1) as f32,
                row as f32 / (rows - 1) as f32,
            ]);
        }
    }

    let mut indices = Vec::with_capacity((cols - 1) * (rows - 1) * 6);
    for row in 0..rows - 1 {
        for col in 0..cols - 1 {
            let a = (row * cols + col) as u32;
            let b = a + 1;
            let c = a + cols as u32;
            let d = c + 1;
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
    let handle = meshes.add(mesh);

    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.15, 0.4, 0.55, 0.72),
        perceptual_roughness: 0.15,
        metallic: 0.0,
        reflectance: 0.4,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    commands.spawn((
        WaterSurface {
            columns,
            mesh: handle.clone(),
        },
        Mesh3d(handle),
        MeshMaterial3d(material),
        Transform::IDENTITY,
    ));
}

fn animate_water_system(
    session: Res<Session>,
    mut meshes: ResMut<Assets<Mesh>>,
    surfaces: Query<&WaterSurface>,
) {
    for surface in surfaces.iter() {
        let Some(mesh) = meshes.get_mut(&surface.mesh) else {
            debug!("Water mesh not loaded yet");
            continue;
        };
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
        else {
            continue;
        };
        for (vertex, [x, z]) in positions.iter_mut().zip(surface.columns.iter()) {
            vertex[1] = session.surface_height_at(*x, *z);
        }
        mesh.compute_smooth_normals();
    }
}

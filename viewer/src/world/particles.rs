//! Entity pools mirroring the simulation's particle arenas.
//!
//! One entity per simulated particle, allocated once and reused; the sync
//! systems only write transforms. When a new river config changes the
//! particle counts the pools are torn down and rebuilt to match.

use bevy::prelude::*;
use sim::Session;

use crate::GameState;

#[derive(Component)]
pub struct FoamSprite(pub usize);

#[derive(Component)]
pub struct MistSprite(pub usize);

/// Shared mesh/material handles for the pools.
#[derive(Resource)]
pub struct ParticleAssets {
    foam_mesh: Handle<Mesh>,
    foam_material: Handle<StandardMaterial>,
    mist_mesh: Handle<Mesh>,
    mist_material: Handle<StandardMaterial>,
}

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Running), setup_particle_pools)
            .add_systems(
                Update,
                (resize_pools_system, sync_foam_system, sync_mist_system)
                    .chain()
                    .run_if(in_state(GameState::Running)),
            );
    }
}

fn setup_particle_pools(
    mut commands: Commands,
    session: Res<Session>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let assets = ParticleAssets {
        foam_mesh: meshes.add(Sphere::new(1.0)),
        foam_material: materials.add(StandardMaterial {
            base_color: Color::srgba(0.92, 0.95, 0.97, 0.85),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        }),
        mist_mesh: meshes.add(Sphere::new(1.0)),
        mist_material: materials.add(StandardMaterial {
            base_color: Color::srgba(0.85, 0.88, 0.92, 0.25),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        }),
    };
    spawn_pools(&mut commands, &assets, session.foam().len(), session.mist().len());
    commands.insert_resource(assets);
}

fn spawn_pools(commands: &mut Commands, assets: &ParticleAssets, foam: usize, mist: usize) {
    for index in 0..foam {
        commands.spawn((
            FoamSprite(index),
            Mesh3d(assets.foam_mesh.clone()),
            MeshMaterial3d(assets.foam_material.clone()),
            Transform::from_scale(Vec3::ZERO),
        ));
    }
    for index in 0..mist {
        commands.spawn((
            MistSprite(index),
            Mesh3d(assets.mist_mesh.clone()),
            MeshMaterial3d(assets.mist_material.clone()),
            Transform::from_scale(Vec3::ZERO),
        ));
    }
}

/// Rebuild both pools when a config swap changed the arena sizes.
fn resize_pools_system(
    mut commands: Commands,
    session: Res<Session>,
    assets: Res<ParticleAssets>,
    foam_sprites: Query<Entity, With<FoamSprite>>,
    mist_sprites: Query<Entity, With<MistSprite>>,
) {
    let foam_target = session.foam().len();
    let mist_target = session.mist().len();
    if foam_sprites.iter().count() == foam_target && mist_sprites.iter().count() == mist_target {
        return;
    }
    info!(
        "Rebuilding particle pools: {} foam, {} mist",
        foam_target, mist_target
    );
    for entity in foam_sprites.iter().chain(mist_sprites.iter()) {
        commands.entity(entity).despawn();
    }
    spawn_pools(&mut commands, &assets, foam_target, mist_target);
}

fn sync_foam_system(
    session: Res<Session>,
    mut sprites: Query<(&FoamSprite, &mut Transform)>,
) {
    let positions = session.foam().positions();
    let life = session.foam().life();
    let size = session.river().foam_size;
    for (sprite, mut transform) in sprites.iter_mut() {
        let Some(position) = positions.get(sprite.0) else {
            continue;
        };
        transform.translation = *position;
        // Shrink as the particle dies out.
        transform.scale = Vec3::splat(size * (0.5 + 0.5 * life[sprite.0]));
    }
}

fn sync_mist_system(
    session: Res<Session>,
    mut sprites: Query<(&MistSprite, &mut Transform), Without<FoamSprite>>,
) {
    let positions = session.mist().positions();
    let life = session.mist().life();
    let phase = session.mist().phase();
    for (sprite, mut transform) in sprites.iter_mut() {
        let Some(position) = positions.get(sprite.0) else {
            continue;
        };
        transform.translation = *position;
        // Grow while fading, like a dissipating puff; phase varies the
        // base size so the cloud is not uniform.
        let base = 0.25 + 0.1 * phase[sprite.0].sin();
        transform.scale = Vec3::splat(base * (1.5 - life[sprite.0] * 0.8));
    }
}

pub mod particles;
pub mod terrain;
pub mod water;

use bevy::prelude::*;
use ron::from_str;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use sim::terrain::TerrainMesh;
use sim::water::{Anchor, RiverConfig, RiverPreset};
use sim::Session;
use std::fs;
use std::path::Path;

use crate::constants::SCENE_PATH;
use crate::GameState;

/// Everything the scene file pins down: the river parameters and the
/// rocks. Written back with defaults when missing, like the keybindings.
#[derive(Serialize, Deserialize, Clone)]
pub struct SceneConfig {
    pub river: RiverConfig,
    pub anchors: Vec<Anchor>,
}

impl SceneConfig {
    pub fn from_preset(preset: RiverPreset) -> Self {
        Self {
            river: preset.to_config(),
            anchors: vec![
                Anchor::new(-6.0, 2.0, 2.5),
                Anchor::new(3.0, -1.5, 2.0),
                Anchor::new(11.0, 0.5, 3.0),
            ],
        }
    }
}

/// Load the scene file, or fall back to the preset and write the file so
/// the user has something to edit.
pub fn load_scene(config_folder: &Path, preset: RiverPreset) -> SceneConfig {
    let scene_path = config_folder.join(SCENE_PATH);

    if let Ok(content) = fs::read_to_string(scene_path.as_path()) {
        match from_str::<SceneConfig>(&content) {
            Ok(scene) => return scene,
            Err(e) => log::warn!("Ignoring malformed scene file at {:?}: {}", scene_path, e),
        }
    }

    let scene = SceneConfig::from_preset(preset);
    let write = ron::ser::to_string_pretty(&scene, PrettyConfig::new())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        .and_then(|text| {
            if let Some(parent) = scene_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&scene_path, text)
        });
    if let Err(e) = write {
        log::error!("Failed to create scene file at {:?}: {}", scene_path, e);
    }
    scene
}

/// World seed for the terrain synth. The synth takes 32 bits; the full
/// command-line seed is XOR-folded so every bit of the printed value
/// affects the terrain.
#[derive(Resource)]
pub struct WorldSeed(pub u32);

impl WorldSeed {
    pub fn fold(seed: u64) -> Self {
        Self((seed ^ (seed >> 32)) as u32)
    }
}

/// Collision mesh built during loading, waiting to be handed to the
/// session.
#[derive(Resource)]
struct PendingCollision(Option<TerrainMesh>);

#[derive(Component)]
struct LoadingOverlay;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((water::WaterPlugin, particles::ParticlesPlugin))
            .add_systems(OnEnter(GameState::Loading), (setup_loading_overlay, setup_world))
            .add_systems(
                Update,
                finish_loading_system.run_if(in_state(GameState::Loading)),
            );
    }
}

fn setup_loading_overlay(mut commands: Commands) {
    commands
        .spawn((
            StateScoped(GameState::Loading),
            LoadingOverlay,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Building the river..."),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Synthesize the scene meshes. The collision mesh is parked in a resource
/// so the gate below can hand it to the session and flip the state.
fn setup_world(
    mut commands: Commands,
    seed: Res<WorldSeed>,
    session: Res<Session>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let river = session.river().clone();
    let anchors = session.anchors().to_vec();

    let field = terrain::build_heightfield(seed.0, &river);
    terrain::spawn_terrain(
        &mut commands,
        &mut meshes,
        &mut materials,
        &field,
        &river,
        &anchors,
    );
    water::spawn_water(&mut commands, &mut meshes, &mut materials, &river);

    commands.insert_resource(PendingCollision(Some(field.collision_mesh())));
}

/// The loading gate: once the collision mesh exists the session gets it
/// and the game starts. Until then no simulation frame moves the player.
fn finish_loading_system(
    mut commands: Commands,
    pending: Option<ResMut<PendingCollision>>,
    mut session: ResMut<Session>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut pending) = pending else {
        return;
    };
    let Some(terrain) = pending.0.take() else {
        return;
    };
    session.install_terrain(terrain);
    commands.remove_resource::<PendingCollision>();
    next_state.set(GameState::Running);
    info!("Scene ready, starting simulation");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_fold_keeps_the_high_bits() {
        let low = WorldSeed::fold(7);
        let high = WorldSeed::fold(7 | (1 << 40));
        assert_ne!(low.0, high.0);
        // Seeds that fit in 32 bits pass through unchanged.
        assert_eq!(low.0, 7);
    }
}

mod camera;
mod constants;
mod hud;
mod input;
mod lighting;
mod player;
mod world;

use bevy::math::Vec3;
use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy_atmosphere::plugin::AtmospherePlugin;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use sim::water::RiverPreset;
use sim::Session;
use std::collections::BTreeMap;
use std::path::PathBuf;

use input::data::GameAction;
use input::keyboard::get_bindings;
use world::WorldSeed;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for terrain synthesis and particle motion; random when absent
    #[arg(long)]
    seed: Option<u64>,

    /// River preset used when no scene file exists yet
    #[arg(long, value_enum, default_value = "brisk")]
    preset: PresetArg,

    #[arg(
        short,
        long,
        help = "Folder holding the keybindings and scene files, defaults to ./config"
    )]
    config_folder_path: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PresetArg {
    Gentle,
    Brisk,
    Torrent,
}

impl From<PresetArg> for RiverPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Gentle => RiverPreset::Gentle,
            PresetArg::Brisk => RiverPreset::Brisk,
            PresetArg::Torrent => RiverPreset::Torrent,
        }
    }
}

// Global state: everything is synthesized during Loading, then the
// simulation runs.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Hash, States)]
pub enum GameState {
    #[default]
    Loading,
    Running,
}

#[derive(Resource, Serialize, Deserialize)]
pub struct KeyMap {
    #[serde(default = "input::keyboard::default_key_map")]
    pub map: BTreeMap<GameAction, Vec<KeyCode>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            map: input::keyboard::default_key_map(),
        }
    }
}

fn main() {
    let args = Args::parse();

    let config_folder =
        PathBuf::from(args.config_folder_path.unwrap_or_else(|| "config".to_string()));
    println!("Using config folder: {}", config_folder.display());

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("World seed: {seed}");

    let scene = world::load_scene(&config_folder, args.preset.into());

    // Spawn on the near bank, a little above the terrain; the first frames
    // settle the player onto it.
    let (width, _) = scene.river.safe_extents();
    let bank = scene.river.local_to_world(0.0, width * 0.5 + 4.0);
    let spawn = Vec3::new(bank.x, 10.0, bank.y);

    let session = Session::with_seed(spawn, scene.river, scene.anchors, seed);

    App::new()
        .add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Riverside".to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            }),
        )
        .add_plugins(AtmospherePlugin)
        .insert_resource(get_bindings(&config_folder))
        .insert_resource(session)
        .insert_resource(WorldSeed::fold(seed))
        .init_state::<GameState>()
        .enable_state_scoped_entities::<GameState>()
        .add_plugins((
            world::WorldPlugin,
            player::PlayerPlugin,
            camera::CameraPlugin,
            lighting::LightingPlugin,
            hud::HudPlugin,
        ))
        .run();
}

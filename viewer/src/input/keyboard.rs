use crate::{constants::BINDS_PATH, input::data::GameAction, KeyMap};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use ron::{from_str, ser::PrettyConfig};
use sim::InputSnapshot;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

fn write_keybindings_to_path(key_map: &KeyMap, binds_path: &Path) -> Result<(), std::io::Error> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(3)
        .with_separate_tuple_members(true)
        .with_enumerate_arrays(true);

    let serialized = ron::ser::to_string_pretty(key_map, pretty_config)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "serialization failed"))?;
    if let Some(parent) = binds_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(binds_path)?;
    file.write_all(serialized.as_bytes())
}

pub fn is_action_pressed(
    action: GameAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    if let Some(key_codes) = key_map.map.get(&action) {
        for key_code in key_codes {
            if keyboard_input.pressed(*key_code) {
                return true;
            }
        }
    }
    false
}

pub fn is_action_just_pressed(
    action: GameAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    if let Some(key_codes) = key_map.map.get(&action) {
        for key_code in key_codes {
            if keyboard_input.just_pressed(*key_code) {
                return true;
            }
        }
    }
    false
}

/// Collapse this frame's keyboard state into the simulation's input form.
pub fn snapshot(keyboard_input: &ButtonInput<KeyCode>, key_map: &KeyMap) -> InputSnapshot {
    InputSnapshot {
        forward: is_action_pressed(GameAction::MoveForward, keyboard_input, key_map),
        back: is_action_pressed(GameAction::MoveBackward, keyboard_input, key_map),
        left: is_action_pressed(GameAction::MoveLeft, keyboard_input, key_map),
        right: is_action_pressed(GameAction::MoveRight, keyboard_input, key_map),
        sprint: is_action_pressed(GameAction::Sprint, keyboard_input, key_map),
        jump: is_action_pressed(GameAction::Jump, keyboard_input, key_map),
        analog: None,
    }
}

pub(crate) fn default_key_map() -> BTreeMap<GameAction, Vec<KeyCode>> {
    let mut map = BTreeMap::new();
    map.insert(GameAction::MoveForward, vec![KeyCode::KeyW, KeyCode::ArrowUp]);
    map.insert(
        GameAction::MoveBackward,
        vec![KeyCode::KeyS, KeyCode::ArrowDown],
    );
    map.insert(GameAction::MoveLeft, vec![KeyCode::KeyA, KeyCode::ArrowLeft]);
    map.insert(
        GameAction::MoveRight,
        vec![KeyCode::KeyD, KeyCode::ArrowRight],
    );
    map.insert(GameAction::Sprint, vec![KeyCode::ShiftLeft]);
    map.insert(GameAction::Jump, vec![KeyCode::Space]);
    map.insert(GameAction::ToggleViewMode, vec![KeyCode::F5]);
    map.insert(GameAction::CycleLighting, vec![KeyCode::KeyL]);
    map.insert(GameAction::ToggleDebugHud, vec![KeyCode::F3]);
    map.insert(GameAction::Escape, vec![KeyCode::Escape]);
    map
}

/// Load the keybindings file, or write the defaults back when it is
/// missing or unreadable.
pub fn get_bindings(config_folder: &Path) -> KeyMap {
    let binds_path: PathBuf = config_folder.join(BINDS_PATH);

    if let Ok(content) = fs::read_to_string(binds_path.as_path()) {
        match from_str::<KeyMap>(&content) {
            Ok(key_map) => return key_map,
            Err(e) => warn!("Ignoring malformed keybindings at {:?}: {}", binds_path, e),
        }
    }

    let key_map = KeyMap::default();
    if let Err(e) = write_keybindings_to_path(&key_map, binds_path.as_path()) {
        error!(
            "Failed to create default keybindings file at {:?}: {}",
            binds_path, e
        );
    }
    key_map
}

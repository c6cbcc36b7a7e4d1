use bevy::prelude::*;
use sim::player::{AnimationName, Crossfade};
use sim::{Session, ANIMATION_FADE_SECONDS};

use crate::camera::{CameraRig, ViewMode};
use crate::input::keyboard::snapshot;
use crate::{GameState, KeyMap};

/// Root entity mirroring the simulated player transform.
#[derive(Component)]
pub struct CurrentPlayerMarker;

/// The bobbing body child, offset so the root sits at the feet.
#[derive(Component)]
pub struct AvatarBody;

#[derive(Component)]
pub struct PlayerMaterialHandle {
    pub handle: Handle<StandardMaterial>,
}

/// Procedural playback of the simulation's animation track: each clip maps
/// to a small bob/lean motion, and crossfades blend the outgoing clip's
/// motion into the incoming one over the fade window.
#[derive(Component)]
pub struct AnimationDriver {
    active: AnimationName,
    previous: AnimationName,
    fade_remaining: f32,
    fade_total: f32,
    phase: f32,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self {
            active: AnimationName::Idle,
            previous: AnimationName::Idle,
            fade_remaining: 0.0,
            fade_total: ANIMATION_FADE_SECONDS,
            phase: 0.0,
        }
    }
}

/// Vertical bob amplitude, bob frequency (Hz) and sideways lean for one
/// clip. The jump clip is handled separately with a stretch.
fn clip_motion(name: AnimationName) -> (f32, f32, f32) {
    match name {
        AnimationName::Idle => (0.015, 0.8, 0.0),
        AnimationName::Walk => (0.05, 1.8, 0.0),
        AnimationName::Run => (0.09, 2.8, 0.0),
        AnimationName::StrafeLeft => (0.05, 1.8, 0.12),
        AnimationName::StrafeRight => (0.05, 1.8, -0.12),
        AnimationName::Jump => (0.0, 0.0, 0.0),
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Running), spawn_player)
            .add_systems(
                Update,
                (
                    drive_session_system,
                    sync_player_transform_system,
                    animation_playback_system,
                    view_mode_material_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Running)),
            );
    }
}

fn spawn_player(
    mut commands: Commands,
    session: Res<Session>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let body_mesh = meshes.add(Capsule3d::new(0.35, 1.1));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.3, 0.2),
        perceptual_roughness: 0.9,
        ..default()
    });

    commands
        .spawn((
            CurrentPlayerMarker,
            PlayerMaterialHandle {
                handle: material.clone(),
            },
            Transform::from_translation(session.player.position),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                AvatarBody,
                AnimationDriver::default(),
                Mesh3d(body_mesh),
                MeshMaterial3d(material),
                // Capsule origin is its center; lift it so the root is at
                // the feet.
                Transform::from_xyz(0.0, 0.9, 0.0),
            ));
        });
}

fn drive_session_system(
    mut session: ResMut<Session>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    rig: Res<CameraRig>,
    time: Res<Time>,
) {
    let input = snapshot(&keyboard_input, &key_map);
    session.update(&input, rig.yaw, time.delta_secs());
}

fn sync_player_transform_system(
    session: Res<Session>,
    mut players: Query<&mut Transform, With<CurrentPlayerMarker>>,
) {
    let Ok(mut transform) = players.single_mut() else {
        debug!("Player not found");
        return;
    };
    transform.translation = session.player.position;
    transform.rotation = Quat::from_rotation_y(session.player.yaw);
}

fn animation_playback_system(
    mut session: ResMut<Session>,
    time: Res<Time>,
    mut bodies: Query<(&mut Transform, &mut AnimationDriver), With<AvatarBody>>,
) {
    let Ok((mut transform, mut driver)) = bodies.single_mut() else {
        return;
    };

    if let Some(Crossfade { from, to, seconds }) = session.player.animation.take_crossfade() {
        driver.previous = from;
        driver.active = to;
        driver.fade_total = seconds.max(f32::EPSILON);
        driver.fade_remaining = seconds;
    }

    let dt = time.delta_secs();
    driver.phase += dt;
    driver.fade_remaining = (driver.fade_remaining - dt).max(0.0);
    // 0 at the start of a fade, 1 once it has finished.
    let blend = 1.0 - driver.fade_remaining / driver.fade_total;

    let (from_amp, from_freq, from_lean) = clip_motion(driver.previous);
    let (to_amp, to_freq, to_lean) = clip_motion(driver.active);
    let amp = from_amp + (to_amp - from_amp) * blend;
    let freq = from_freq + (to_freq - from_freq) * blend;
    let lean = from_lean + (to_lean - from_lean) * blend;

    let bob = (driver.phase * freq * std::f32::consts::TAU).sin() * amp;
    let stretch = if driver.active == AnimationName::Jump {
        1.0 + 0.1 * blend
    } else {
        1.0
    };

    transform.translation.y = 0.9 + bob;
    transform.scale = Vec3::new(1.0, stretch, 1.0);
    transform.rotation = Quat::from_rotation_z(lean);
}

/// Mirrors the view mode onto the avatar material: invisible body in first
/// person, opaque in third person.
fn view_mode_material_system(
    view_mode: Res<ViewMode>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    players: Query<&PlayerMaterialHandle, With<CurrentPlayerMarker>>,
) {
    if !view_mode.is_changed() {
        return;
    }
    let Ok(material_handle) = players.single() else {
        debug!("Player not found");
        return;
    };
    if let Some(material) = materials.get_mut(&material_handle.handle) {
        match *view_mode {
            ViewMode::FirstPerson => {
                material.base_color = Color::srgba(0.0, 0.0, 0.0, 0.0);
                material.alpha_mode = AlphaMode::Blend;
            }
            ViewMode::ThirdPerson => {
                material.base_color = Color::srgb(0.75, 0.3, 0.2);
                material.alpha_mode = AlphaMode::Opaque;
            }
        }
    }
}

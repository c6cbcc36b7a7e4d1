use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_atmosphere::plugin::AtmosphereCamera;
use sim::camera::{first_person_pose, follow_pose};
use sim::Session;

use crate::constants::MOUSE_SENSITIVITY;
use crate::input::data::GameAction;
use crate::input::keyboard::is_action_just_pressed;
use crate::{GameState, KeyMap};

/// First or third person. Third person is the default scene-viewing mode;
/// first person hides the avatar body.
#[derive(Resource, Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum ViewMode {
    FirstPerson,
    #[default]
    ThirdPerson,
}

impl ViewMode {
    pub fn toggle(&mut self) {
        *self = match self {
            ViewMode::FirstPerson => ViewMode::ThirdPerson,
            ViewMode::ThirdPerson => ViewMode::FirstPerson,
        };
    }
}

/// Horizontal camera heading, driven by the mouse. The simulation reads
/// it every frame to resolve camera-relative movement.
#[derive(Resource, Default)]
pub struct CameraRig {
    pub yaw: f32,
}

#[derive(Component)]
pub struct SceneCamera;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewMode>()
            .init_resource::<CameraRig>()
            .add_systems(Startup, setup_camera)
            .add_systems(OnEnter(GameState::Running), grab_cursor)
            .add_systems(
                Update,
                (mouse_look_system, toggle_view_mode_system, cursor_release_system)
                    .run_if(in_state(GameState::Running)),
            )
            .add_systems(
                PostUpdate,
                camera_follow_system.run_if(in_state(GameState::Running)),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        SceneCamera,
        Camera3d::default(),
        AtmosphereCamera::default(),
        Transform::from_xyz(0.0, 10.0, -15.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn grab_cursor(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    let Ok(mut window) = windows.single_mut() else {
        debug!("Primary window not found");
        return;
    };
    window.cursor_options.grab_mode = CursorGrabMode::Locked;
    window.cursor_options.visible = false;
}

/// Escape releases the cursor; clicking back into the window re-grabs it.
fn cursor_release_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    key_map: Res<KeyMap>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    if is_action_just_pressed(GameAction::Escape, &keyboard_input, &key_map) {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    } else if mouse_buttons.just_pressed(MouseButton::Left)
        && window.cursor_options.grab_mode == CursorGrabMode::None
    {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

fn mouse_look_system(
    mouse_motion: Res<AccumulatedMouseMotion>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut rig: ResMut<CameraRig>,
) {
    let grabbed = windows
        .single()
        .is_ok_and(|w| w.cursor_options.grab_mode != CursorGrabMode::None);
    if !grabbed {
        return;
    }
    rig.yaw -= mouse_motion.delta.x * MOUSE_SENSITIVITY;
}

fn toggle_view_mode_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    mut view_mode: ResMut<ViewMode>,
) {
    if is_action_just_pressed(GameAction::ToggleViewMode, &keyboard_input, &key_map) {
        view_mode.toggle();
        info!("View mode: {:?}", *view_mode);
    }
}

/// Rigid follow, after the simulation has moved the player this frame.
fn camera_follow_system(
    session: Res<Session>,
    rig: Res<CameraRig>,
    view_mode: Res<ViewMode>,
    mut cameras: Query<&mut Transform, With<SceneCamera>>,
) {
    let Ok(mut transform) = cameras.single_mut() else {
        debug!("Scene camera not found");
        return;
    };
    let pose = match *view_mode {
        ViewMode::FirstPerson => first_person_pose(&session.player, rig.yaw),
        ViewMode::ThirdPerson => follow_pose(&session.player, rig.yaw),
    };
    transform.translation = pose.eye;
    transform.look_at(pose.target, Vec3::Y);
}

//! F3 debug overlay: frame rate, player position, locomotion state, the
//! active animation clip and the particle counts.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use sim::Session;

use crate::constants::HUD_FONT_SIZE;
use crate::input::data::GameAction;
use crate::input::keyboard::is_action_just_pressed;
use crate::{GameState, KeyMap};

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct CoordsText;

#[derive(Component)]
pub struct StateText;

#[derive(Component)]
pub struct ParticlesText;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default())
            .add_systems(OnEnter(GameState::Running), setup_hud)
            .add_systems(
                Update,
                (
                    toggle_hud_system,
                    fps_text_update_system,
                    coords_text_update_system,
                    state_text_update_system,
                    particles_text_update_system,
                )
                    .run_if(in_state(GameState::Running)),
            );
    }
}

fn hud_row(text: &str) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
    )
}

fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            // Hidden until F3.
            Visibility::Hidden,
            BackgroundColor(Color::BLACK.with_alpha(0.5)),
            GlobalZIndex(i32::MAX),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(1.),
                top: Val::Percent(1.),
                bottom: Val::Auto,
                right: Val::Auto,
                padding: UiRect::all(Val::Px(4.0)),
                flex_direction: FlexDirection::Column,
                ..Default::default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((FpsText, hud_row("FPS: N/A")));
            parent.spawn((CoordsText, hud_row("Position: N/A")));
            parent.spawn((StateText, hud_row("State: N/A")));
            parent.spawn((ParticlesText, hud_row("Particles: N/A")));
        });
}

fn toggle_hud_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    mut huds: Query<&mut Visibility, With<HudRoot>>,
) {
    if !is_action_just_pressed(GameAction::ToggleDebugHud, &keyboard_input, &key_map) {
        return;
    }
    for mut visibility in huds.iter_mut() {
        *visibility = match *visibility {
            Visibility::Hidden => Visibility::Visible,
            _ => Visibility::Hidden,
        };
    }
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in query.iter_mut() {
        let fps = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|d| d.smoothed());
        *text = match fps {
            Some(fps) => Text::new(format!("FPS: {fps:.0}")),
            None => Text::new("FPS: N/A"),
        };
    }
}

fn coords_text_update_system(
    session: Res<Session>,
    mut query: Query<&mut Text, With<CoordsText>>,
) {
    let p = session.player.position;
    for mut text in query.iter_mut() {
        *text = Text::new(format!(
            "Position: {:.2} / {:.2} / {:.2}  grounded: {}",
            p.x, p.y, p.z, session.player.grounded
        ));
    }
}

fn state_text_update_system(
    session: Res<Session>,
    mut query: Query<&mut Text, With<StateText>>,
) {
    for mut text in query.iter_mut() {
        *text = Text::new(format!(
            "State: {:?}  clip: {:?}",
            session.player.state,
            session.player.animation.active()
        ));
    }
}

fn particles_text_update_system(
    session: Res<Session>,
    mut query: Query<&mut Text, With<ParticlesText>>,
) {
    for mut text in query.iter_mut() {
        *text = Text::new(format!(
            "Particles: {} foam, {} mist",
            session.foam().len(),
            session.mist().len()
        ));
    }
}

//! Cinematic lighting presets.
//!
//! Each preset is a row of plain numbers; cycling through them re-aims the
//! sun, retunes the ambient term, adjusts the fog and moves the
//! atmosphere's sun so the sky matches.

use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy_atmosphere::prelude::{AtmosphereModel, Nishita};

use crate::camera::SceneCamera;
use crate::input::data::GameAction;
use crate::input::keyboard::is_action_just_pressed;
use crate::{GameState, KeyMap};

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightingPreset {
    Dawn,
    #[default]
    Noon,
    Dusk,
    Night,
}

/// Concrete parameters one preset resolves to.
pub struct LightingSettings {
    /// Direction the sunlight travels, pointing down toward the scene.
    pub sun_direction: Vec3,
    pub illuminance: f32,
    pub sun_color: Color,
    pub ambient_color: Color,
    pub ambient_brightness: f32,
    pub fog_color: Color,
    /// Start/end of the linear fog falloff.
    pub fog_range: (f32, f32),
}

impl LightingPreset {
    pub fn next(self) -> Self {
        match self {
            LightingPreset::Dawn => LightingPreset::Noon,
            LightingPreset::Noon => LightingPreset::Dusk,
            LightingPreset::Dusk => LightingPreset::Night,
            LightingPreset::Night => LightingPreset::Dawn,
        }
    }

    pub fn to_settings(self) -> LightingSettings {
        match self {
            LightingPreset::Dawn => LightingSettings {
                sun_direction: Vec3::new(-0.8, -0.25, 0.2).normalize(),
                illuminance: 4_000.0,
                sun_color: Color::srgb(1.0, 0.78, 0.6),
                ambient_color: Color::srgb(0.7, 0.65, 0.75),
                ambient_brightness: 120.0,
                fog_color: Color::srgb(0.75, 0.68, 0.7),
                fog_range: (30.0, 140.0),
            },
            LightingPreset::Noon => LightingSettings {
                sun_direction: Vec3::new(-0.15, -0.9, 0.3).normalize(),
                illuminance: 10_000.0,
                sun_color: Color::srgb(1.0, 0.98, 0.92),
                ambient_color: Color::srgb(0.8, 0.85, 0.95),
                ambient_brightness: 300.0,
                fog_color: Color::srgb(0.8, 0.87, 0.95),
                fog_range: (60.0, 260.0),
            },
            LightingPreset::Dusk => LightingSettings {
                sun_direction: Vec3::new(0.75, -0.2, -0.3).normalize(),
                illuminance: 2_500.0,
                sun_color: Color::srgb(1.0, 0.55, 0.35),
                ambient_color: Color::srgb(0.55, 0.45, 0.6),
                ambient_brightness: 90.0,
                fog_color: Color::srgb(0.6, 0.45, 0.5),
                fog_range: (25.0, 120.0),
            },
            LightingPreset::Night => LightingSettings {
                sun_direction: Vec3::new(0.2, -0.7, -0.5).normalize(),
                illuminance: 120.0,
                sun_color: Color::srgb(0.6, 0.7, 0.95),
                ambient_color: Color::srgb(0.2, 0.25, 0.4),
                ambient_brightness: 40.0,
                fog_color: Color::srgb(0.08, 0.1, 0.18),
                fog_range: (15.0, 90.0),
            },
        }
    }
}

#[derive(Component)]
pub struct SunLight;

pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LightingPreset>()
            .add_systems(Startup, setup_lighting)
            .add_systems(
                Update,
                cycle_lighting_system.run_if(in_state(GameState::Running)),
            )
            .add_systems(Update, apply_lighting_system);
    }
}

fn setup_lighting(mut commands: Commands) {
    commands.spawn((
        SunLight,
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::IDENTITY,
    ));
}

fn cycle_lighting_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    mut preset: ResMut<LightingPreset>,
) {
    if is_action_just_pressed(GameAction::CycleLighting, &keyboard_input, &key_map) {
        *preset = preset.next();
        info!("Lighting preset: {:?}", *preset);
    }
}

fn apply_lighting_system(
    preset: Res<LightingPreset>,
    mut commands: Commands,
    mut suns: Query<(&mut DirectionalLight, &mut Transform), With<SunLight>>,
    cameras: Query<Entity, With<SceneCamera>>,
) {
    if !preset.is_changed() {
        return;
    }
    let settings = preset.to_settings();

    let Ok((mut light, mut transform)) = suns.single_mut() else {
        debug!("Sun light not found");
        return;
    };
    light.illuminance = settings.illuminance;
    light.color = settings.sun_color;
    *transform = Transform::IDENTITY.looking_to(settings.sun_direction, Vec3::Y);

    commands.insert_resource(AmbientLight {
        color: settings.ambient_color,
        brightness: settings.ambient_brightness,
        ..default()
    });

    // The atmosphere's sun position points toward the light source.
    commands.insert_resource(AtmosphereModel::new(Nishita {
        sun_position: -settings.sun_direction,
        ..default()
    }));

    if let Ok(camera) = cameras.single() {
        commands.entity(camera).insert(DistanceFog {
            color: settings.fog_color,
            falloff: FogFalloff::Linear {
                start: settings.fog_range.0,
                end: settings.fog_range.1,
            },
            ..default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_preset_and_wraps() {
        let mut preset = LightingPreset::Dawn;
        let mut seen = vec![preset];
        for _ in 0..3 {
            preset = preset.next();
            seen.push(preset);
        }
        seen.sort_by_key(|p| *p as u8);
        seen.dedup();
        assert_eq!(seen.len(), 4);
        assert_eq!(LightingPreset::Night.next(), LightingPreset::Dawn);
    }

    #[test]
    fn darker_presets_carry_less_light() {
        let noon = LightingPreset::Noon.to_settings();
        let night = LightingPreset::Night.to_settings();
        assert!(night.illuminance < noon.illuminance);
        assert!(night.ambient_brightness < noon.ambient_brightness);
        // Every preset's sun shines downward.
        for preset in [
            LightingPreset::Dawn,
            LightingPreset::Noon,
            LightingPreset::Dusk,
            LightingPreset::Night,
        ] {
            assert!(preset.to_settings().sun_direction.y < 0.0);
        }
    }
}

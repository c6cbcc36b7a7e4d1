/// Keybindings file, relative to the config folder.
pub const BINDS_PATH: &str = "keybindings.ron";

/// River/scene preset file, relative to the config folder.
pub const SCENE_PATH: &str = "scene.ron";

/// Terrain heightfield resolution (vertices per side).
pub const TERRAIN_RESOLUTION: usize = 96;

/// Spacing between heightfield vertices in world units.
pub const TERRAIN_SPACING: f32 = 1.0;

/// Base noise frequency for the terrain synth.
pub const TERRAIN_NOISE_FREQUENCY: f64 = 0.035;

/// Height amplitude of the synthesized terrain.
pub const TERRAIN_AMPLITUDE: f32 = 4.0;

/// How deep the river bed is carved below the water line. Must stay
/// inside the simulation's water coupling window so a player standing on
/// the bed counts as in the water.
pub const RIVER_BED_DEPTH: f32 = 0.4;

/// Blended shoulder outside the river footprint where the carve fades out.
pub const RIVER_BANK_BLEND: f32 = 3.0;

/// Water mesh quads per world unit along each axis.
pub const WATER_TESSELLATION: f32 = 1.5;

/// Horizontal mouse sensitivity, radians per pixel of motion.
pub const MOUSE_SENSITIVITY: f32 = 0.0032;

/// Font size used across the debug HUD.
pub const HUD_FONT_SIZE: f32 = 16.0;

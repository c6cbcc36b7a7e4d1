//! Tunable constants for locomotion, probing, camera follow and water.
//!
//! All thresholds live here so there is exactly one place to re-tune the
//! feel of the controller. Probe offsets in particular trade off against
//! each other (a taller waist offset walks under fewer bridges but stops
//! mis-detecting nearby walls as floor), so keep them side by side.

/// Downward acceleration applied every frame (world units / s²).
pub const GRAVITY_ACCEL: f32 = 25.0;

/// Upward velocity set when a grounded jump is triggered.
pub const JUMP_VELOCITY: f32 = 8.0;

/// Terminal fall speed clamp.
pub const MAX_FALL_SPEED: f32 = 50.0;

/// Horizontal speed while walking.
pub const WALK_SPEED: f32 = 4.0;

/// Horizontal speed while sprinting.
pub const RUN_SPEED: f32 = 8.0;

/// Rate at which the facing swings toward the travel direction, as a
/// per-second fraction of the remaining arc.
pub const TURN_RATE: f32 = 10.0;

/// Largest delta time fed into one simulation step. Longer stalls (tab in
/// the background, debugger pause) integrate as if this much had elapsed,
/// which keeps fast-moving bodies from tunneling through geometry.
pub const MAX_DELTA: f32 = 0.1;

/// Height above the query point where the downward ground probe starts.
/// Waist height, not head height, so low ceilings stay out of the ray.
pub const PROBE_WAIST_HEIGHT: f32 = 0.9;

/// How far below the probe origin ground is still searched for.
pub const PROBE_DEPTH: f32 = 250.0;

/// Wall whisker origin heights above the feet: knee, chest, head.
pub const WHISKER_HEIGHTS: [f32; 3] = [0.35, 0.9, 1.55];

/// Lateral whisker offset approximating the body radius.
pub const BODY_HALF_WIDTH: f32 = 0.35;

/// A whisker hit closer than this blocks horizontal movement this frame.
pub const WALL_BLOCK_DISTANCE: f32 = 0.9;

/// Steps up to this tall are walked over; anything taller is a wall and
/// triggers the horizontal revert.
pub const STEP_HEIGHT: f32 = 0.45;

/// Snap tolerance above the ground surface.
pub const GROUND_EPSILON: f32 = 0.02;

/// Clearance kept between the feet and a ceiling detected overhead.
pub const HEAD_CLEARANCE: f32 = 1.8;

/// Origin height for the wide fallback ground probe used after a revert.
pub const FALLBACK_PROBE_HEIGHT: f32 = 500.0;

/// Below this Y the player has fallen out of the world and is teleported
/// back to the last known ground.
pub const OUT_OF_BOUNDS_Y: f32 = -100.0;

/// Third-person follow distance behind the player.
pub const CAMERA_DISTANCE: f32 = 6.0;

/// Third-person follow height above the player's feet.
pub const CAMERA_HEIGHT: f32 = 2.5;

/// Height above the feet the follow camera looks at (chest).
pub const CAMERA_LOOK_HEIGHT: f32 = 1.2;

/// First-person eye height above the feet.
pub const EYE_HEIGHT: f32 = 1.6;

/// The camera may dip at most this far below the last known ground height.
pub const CAMERA_GROUND_MARGIN: f32 = 0.4;

/// Crossfade duration between animation clips.
pub const ANIMATION_FADE_SECONDS: f32 = 0.2;

/// Length of the jump clip; movement clips may not pre-empt it earlier.
pub const JUMP_CLIP_SECONDS: f32 = 0.8;

/// Foam rides this far above the sampled wave surface.
pub const FOAM_SURFACE_OFFSET: f32 = 0.06;

/// Minimum water extent used whenever width/length feed a division or a
/// respawn region, guarding degenerate configs against NaN positions.
pub const MIN_WATER_EXTENT: f32 = 0.1;

/// Vertical window around the water height inside which the player couples
/// to the current and can trigger splash respawns.
pub const WATER_COUPLING_DEPTH: f32 = 0.5;

/// Gain of the dot-product flow-speed multiplier: moving straight
/// downstream is `1 + gain` times base speed, straight upstream `1 - gain`.
pub const FLOW_SPEED_GAIN: f32 = 0.35;

/// Radius of the splash ring of foam spawned around a wading player.
pub const SPLASH_RING_RADIUS: f32 = 0.6;

/// Chance per respawn that foam appears in the splash ring instead of the
/// usual sites, when the player is in the water.
pub const SPLASH_CHANCE: f32 = 0.12;

/// Chance per respawn that foam appears near an anchor rather than on a
/// river edge.
pub const ANCHOR_SPAWN_CHANCE: f32 = 0.6;

/// Foam life decay per second at flow speed 1.0; scales with flow speed.
pub const FOAM_DECAY_RATE: f32 = 0.22;

/// Foam drift speed along the flow at flow speed 1.0.
pub const FOAM_DRIFT_SPEED: f32 = 1.2;

/// Frequency of the per-particle lateral foam wobble (rad/s).
pub const FOAM_WOBBLE_FREQUENCY: f32 = 2.6;

/// Lateral foam wobble speed amplitude.
pub const FOAM_WOBBLE_AMPLITUDE: f32 = 0.35;

/// Mist life decay per second (fixed, unlike foam's).
pub const MIST_DECAY_RATE: f32 = 0.45;

/// Constant mist fall speed.
pub const MIST_FALL_SPEED: f32 = 1.8;

/// Horizontal jitter applied to falling mist each second.
pub const MIST_JITTER: f32 = 0.25;

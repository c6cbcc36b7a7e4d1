//! Player state and the per-frame locomotion controller.

mod animation;
mod movement;
mod state;

pub use animation::*;
pub use movement::*;
pub use state::*;

use bevy::math::Vec3;

/// Everything the locomotion controller owns about the avatar. Mutated
/// once per frame by [`simulate_player`]; created at spawn and never
/// destroyed during a session.
#[derive(Debug)]
pub struct Player {
    pub position: Vec3,
    /// Yaw-only facing, radians around +Y.
    pub yaw: f32,
    pub vertical_velocity: f32,
    pub grounded: bool,
    /// Height of the last ground surface the probes confirmed; the
    /// out-of-bounds recovery and the camera clamp both read it.
    pub last_ground_height: f32,
    pub state: LocomotionState,
    pub animation: AnimationTrack,
    /// Jump input level last frame, for edge detection.
    jump_held: bool,
}

impl Player {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            yaw: 0.0,
            vertical_velocity: 0.0,
            grounded: false,
            last_ground_height: spawn.y,
            state: LocomotionState::Idle,
            animation: AnimationTrack::new(),
            jump_held: false,
        }
    }

    /// Horizontal forward vector for this player's facing.
    pub fn forward(&self) -> Vec3 {
        yaw_forward(self.yaw)
    }
}

/// Unit forward vector in the XZ plane for a yaw angle. Yaw 0 faces +Z;
/// positive yaw swings toward +X. The camera rig uses the same convention.
pub fn yaw_forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Wrap an angle into [-π, π].
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = angle % TAU;
    if wrapped > PI {
        wrapped - TAU
    } else if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

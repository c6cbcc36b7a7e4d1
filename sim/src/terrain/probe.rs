//! The four probe shapes the locomotion controller issues every frame.

use bevy::math::Vec3;

use crate::constants::{
    BODY_HALF_WIDTH, FALLBACK_PROBE_HEIGHT, HEAD_CLEARANCE, PROBE_DEPTH, PROBE_WAIST_HEIGHT,
    WALL_BLOCK_DISTANCE, WHISKER_HEIGHTS,
};

use super::{RayHit, TerrainCollider};

/// Height of the ground directly below `point`, probing downward from a
/// waist-height offset so low ceilings above the head are not mistaken
/// for floor. `None` means there is no ground below (free fall continues).
pub fn ground_height(terrain: &impl TerrainCollider, point: Vec3) -> Option<f32> {
    let origin = point + Vec3::Y * PROBE_WAIST_HEIGHT;
    terrain
        .raycast(origin, Vec3::NEG_Y, PROBE_WAIST_HEIGHT + PROBE_DEPTH)
        .map(|hit| hit.point.y)
}

/// Wall whiskers: short rays along the intended travel direction from
/// knee/chest/head height, each nudged sideways by the body half-width.
/// Any hit inside the block distance vetoes horizontal movement.
pub fn wall_blocked(terrain: &impl TerrainCollider, position: Vec3, move_dir: Vec3) -> bool {
    let move_dir = Vec3::new(move_dir.x, 0.0, move_dir.z).normalize_or_zero();
    if move_dir == Vec3::ZERO {
        return false;
    }
    let lateral = Vec3::Y.cross(move_dir);
    for height in WHISKER_HEIGHTS {
        for side in [-1.0, 1.0] {
            let origin = position + Vec3::Y * height + lateral * (side * BODY_HALF_WIDTH);
            if terrain.raycast(origin, move_dir, WALL_BLOCK_DISTANCE).is_some() {
                return true;
            }
        }
    }
    false
}

/// Highest foot Y the player may occupy without the head poking through a
/// ceiling detected overhead, or `None` when the headroom is clear.
pub fn ceiling_limit(terrain: &impl TerrainCollider, position: Vec3) -> Option<f32> {
    let origin = position + Vec3::Y * 0.05;
    terrain
        .raycast(origin, Vec3::Y, HEAD_CLEARANCE)
        .map(|hit| hit.point.y - HEAD_CLEARANCE)
}

/// Wide fallback ground probe: casts down from far above the world, used
/// only to find valid ground at a position a move was reverted to.
pub fn fallback_ground_height(terrain: &impl TerrainCollider, x: f32, z: f32) -> Option<f32> {
    let origin = Vec3::new(x, FALLBACK_PROBE_HEIGHT, z);
    terrain
        .raycast(origin, Vec3::NEG_Y, FALLBACK_PROBE_HEIGHT + PROBE_DEPTH)
        .map(|hit| hit.point.y)
}

/// Analytic infinite plane at a fixed height. Test collider; also handy
/// as a stand-in world before real terrain finishes loading.
pub struct FlatPlane {
    pub height: f32,
}

impl TerrainCollider for FlatPlane {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (self.height - origin.y) / direction.y;
        if t <= 1e-6 || t > max_distance {
            return None;
        }
        Some(RayHit {
            distance: t,
            point: origin + direction * t,
            normal: if direction.y < 0.0 { Vec3::Y } else { Vec3::NEG_Y },
        })
    }
}

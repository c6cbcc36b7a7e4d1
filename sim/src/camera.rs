//! Pure camera pose math, shared by whatever renders the scene.
//!
//! The follow camera orbits behind the player at a fixed offset and never
//! dips meaningfully below the last ground height the player stood on, so
//! walking off a ledge does not drag the view underground while the body
//! is still falling.

use bevy::math::Vec3;

use crate::constants::{
    CAMERA_DISTANCE, CAMERA_GROUND_MARGIN, CAMERA_HEIGHT, CAMERA_LOOK_HEIGHT, EYE_HEIGHT,
};
use crate::player::{yaw_forward, Player};

/// An eye position and the point it looks at. Callers turn this into their
/// renderer's transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

/// Third-person pose: behind the player along the camera yaw, raised, and
/// looking at the chest.
pub fn follow_pose(player: &Player, camera_yaw: f32) -> CameraPose {
    let mut eye = player.position - yaw_forward(camera_yaw) * CAMERA_DISTANCE
        + Vec3::Y * CAMERA_HEIGHT;
    let floor = player.last_ground_height - CAMERA_GROUND_MARGIN;
    if eye.y < floor {
        eye.y = floor;
    }
    CameraPose {
        eye,
        target: player.position + Vec3::Y * CAMERA_LOOK_HEIGHT,
    }
}

/// First-person pose: at eye height, looking along the camera yaw.
pub fn first_person_pose(player: &Player, camera_yaw: f32) -> CameraPose {
    let eye = player.position + Vec3::Y * EYE_HEIGHT;
    CameraPose {
        eye,
        target: eye + yaw_forward(camera_yaw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(position: Vec3) -> Player {
        let mut player = Player::new(position);
        player.last_ground_height = position.y;
        player
    }

    #[test]
    fn follow_sits_behind_the_camera_yaw() {
        let player = player_at(Vec3::new(10.0, 0.0, 5.0));
        // Yaw 0 faces +Z, so the camera sits on the -Z side.
        let pose = follow_pose(&player, 0.0);
        assert!((pose.eye.z - (5.0 - CAMERA_DISTANCE)).abs() < 1e-5);
        assert!((pose.eye.x - 10.0).abs() < 1e-5);
        assert!((pose.eye.y - CAMERA_HEIGHT).abs() < 1e-5);
        assert_eq!(pose.target, player.position + Vec3::Y * CAMERA_LOOK_HEIGHT);
    }

    #[test]
    fn follow_clamps_against_the_last_ground() {
        let mut player = player_at(Vec3::new(0.0, 20.0, 0.0));
        // Mid-fall: the body is far below where it last stood.
        player.position.y = 20.0 - CAMERA_HEIGHT - 10.0;
        let pose = follow_pose(&player, 0.0);
        assert!((pose.eye.y - (20.0 - CAMERA_GROUND_MARGIN)).abs() < 1e-5);
    }

    #[test]
    fn first_person_looks_along_the_yaw() {
        let player = player_at(Vec3::ZERO);
        let yaw = std::f32::consts::FRAC_PI_2;
        let pose = first_person_pose(&player, yaw);
        assert!((pose.eye.y - EYE_HEIGHT).abs() < 1e-5);
        let dir = (pose.target - pose.eye).normalize();
        assert!((dir.x - 1.0).abs() < 1e-4);
        assert!(dir.z.abs() < 1e-4);
    }
}

//! Per-frame input snapshot consumed by the locomotion controller.
//!
//! The viewer (or a test) fills one of these every frame; the core never
//! reads devices itself.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// Analog stick deflections below this are treated as centered.
const ANALOG_DEADZONE: f32 = 0.15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub jump: bool,
    /// Optional joystick vector, x = right, y = forward.
    pub analog: Option<Vec2>,
}

impl InputSnapshot {
    /// True when any movement input is active.
    pub fn is_moving(&self) -> bool {
        self.direction_angle().is_some()
    }

    /// Travel direction relative to the camera heading, in radians.
    ///
    /// 0 is straight ahead, positive angles swing to the right. Composed
    /// from the held-key signs via `atan2`, so diagonals land on ±45° and
    /// back-left / back-right on ±135°. `None` when nothing is held and
    /// the stick is centered.
    pub fn direction_angle(&self) -> Option<f32> {
        if let Some(stick) = self.analog {
            if stick.length() > ANALOG_DEADZONE {
                return Some(stick.x.atan2(stick.y));
            }
        }

        let lateral = (self.right as i8 - self.left as i8) as f32;
        let axial = (self.forward as i8 - self.back as i8) as f32;
        if lateral == 0.0 && axial == 0.0 {
            return None;
        }
        Some(lateral.atan2(axial))
    }

    /// True when the snapshot asks for pure lateral movement (strafe keys
    /// only, no forward/back component).
    pub fn is_pure_lateral(&self) -> bool {
        match self.direction_angle() {
            Some(angle) => (angle.abs() - std::f32::consts::FRAC_PI_2).abs() < 1e-3,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn idle_snapshot_has_no_angle() {
        assert_eq!(InputSnapshot::default().direction_angle(), None);
        assert!(!InputSnapshot::default().is_moving());
    }

    #[test]
    fn key_compositions_map_to_expected_angles() {
        let forward = InputSnapshot {
            forward: true,
            ..Default::default()
        };
        assert!(forward.direction_angle().unwrap().abs() < 1e-6);

        let right = InputSnapshot {
            right: true,
            ..Default::default()
        };
        assert!((right.direction_angle().unwrap() - FRAC_PI_2).abs() < 1e-6);

        let back = InputSnapshot {
            back: true,
            ..Default::default()
        };
        assert!((back.direction_angle().unwrap().abs() - PI).abs() < 1e-6);

        let forward_left = InputSnapshot {
            forward: true,
            left: true,
            ..Default::default()
        };
        assert!((forward_left.direction_angle().unwrap() + FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn opposed_keys_cancel() {
        let snapshot = InputSnapshot {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(snapshot.direction_angle(), None);
    }

    #[test]
    fn analog_overrides_keys_outside_deadzone() {
        let snapshot = InputSnapshot {
            back: true,
            analog: Some(Vec2::new(0.0, 1.0)),
            ..Default::default()
        };
        assert!(snapshot.direction_angle().unwrap().abs() < 1e-6);

        let centered = InputSnapshot {
            back: true,
            analog: Some(Vec2::new(0.01, 0.01)),
            ..Default::default()
        };
        assert!((centered.direction_angle().unwrap().abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn pure_lateral_detection() {
        let strafe = InputSnapshot {
            left: true,
            ..Default::default()
        };
        assert!(strafe.is_pure_lateral());

        let diagonal = InputSnapshot {
            left: true,
            forward: true,
            ..Default::default()
        };
        assert!(!diagonal.is_pure_lateral());
    }
}

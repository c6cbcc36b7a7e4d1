//! The scalar wave field.
//!
//! Pure function of (x, z, time): re-evaluated every frame for every water
//! mesh vertex and every foam particle, so it must stay cheap and
//! side-effect free.

use crate::water::{Anchor, RiverConfig};

/// Relative weights of the three sine layers; they sum to 1 so
/// `wave_height` remains the peak-amplitude knob.
const LAYER_WEIGHTS: [f32; 3] = [0.5, 0.3, 0.2];

/// Peak anchor bump as a fraction of the wave height.
const ANCHOR_BUMP: f32 = 1.4;

/// Water surface height at a world XZ position.
///
/// Three sine layers evaluated on flow-aligned coordinates (projection of
/// the point onto the flow direction and its perpendicular), each with its
/// own spatial and temporal frequency, scaled by the configured wave
/// height; plus a radial `1 - d/r` bump for every anchor whose influence
/// radius reaches the point. Deterministic: identical arguments always
/// produce the identical value.
pub fn surface_height(x: f32, z: f32, time: f32, config: &RiverConfig, anchors: &[Anchor]) -> f32 {
    let local = config.world_to_local(x, z);
    let along = local.x;
    let across = local.y;
    let t = time * config.speed;

    let mut height = config.water_height;
    height += config.wave_height
        * (LAYER_WEIGHTS[0] * (along * 0.8 - t * 1.6).sin()
            + LAYER_WEIGHTS[1] * (along * 2.1 + across * 0.6 - t * 2.4).sin()
            + LAYER_WEIGHTS[2] * (across * 1.7 - t * 1.1).sin());

    // Pile-up around rocks: linear falloff inside the influence radius.
    for anchor in anchors {
        let radius = anchor.influence_radius;
        if radius <= 0.0 {
            continue;
        }
        let dx = along - anchor.relative_x;
        let dz = across - anchor.relative_z;
        let distance = (dx * dx + dz * dz).sqrt();
        if distance < radius {
            height += config.wave_height * ANCHOR_BUMP * (1.0 - distance / radius);
        }
    }

    height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_identical_arguments() {
        let config = RiverConfig::default();
        let anchors = [Anchor::new(2.0, 1.0, 3.0)];
        let first = surface_height(1.3, -0.7, 12.5, &config, &anchors);
        let second = surface_height(1.3, -0.7, 12.5, &config, &anchors);
        assert_eq!(first, second);
    }

    #[test]
    fn varies_with_time_and_position() {
        let config = RiverConfig::default();
        let h0 = surface_height(0.0, 0.0, 0.0, &config, &[]);
        let h1 = surface_height(0.0, 0.0, 1.0, &config, &[]);
        let h2 = surface_height(3.0, 0.0, 0.0, &config, &[]);
        assert!((h0 - h1).abs() > 1e-4);
        assert!((h0 - h2).abs() > 1e-4);
    }

    #[test]
    fn anchors_raise_the_surface_nearby() {
        let config = RiverConfig::default();
        let anchor = Anchor::new(0.0, 0.0, 2.0);
        let with = surface_height(0.0, 0.0, 0.0, &config, std::slice::from_ref(&anchor));
        let without = surface_height(0.0, 0.0, 0.0, &config, &[]);
        assert!((with - without - config.wave_height * ANCHOR_BUMP).abs() < 1e-5);

        // Outside the influence radius the bump vanishes.
        let far = surface_height(10.0, 0.0, 0.0, &config, std::slice::from_ref(&anchor));
        let far_plain = surface_height(10.0, 0.0, 0.0, &config, &[]);
        assert_eq!(far, far_plain);
    }

    #[test]
    fn still_water_sits_at_the_configured_height() {
        let config = RiverConfig {
            wave_height: 0.0,
            water_height: 2.5,
            ..Default::default()
        };
        assert_eq!(surface_height(4.0, -3.0, 9.0, &config, &[]), 2.5);
    }
}

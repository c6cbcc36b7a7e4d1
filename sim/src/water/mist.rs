//! Mist particles falling from the waterfall lips.
//!
//! Same arena layout as foam, different motion model: mist is smoke, not
//! surface foam. It decays at a fixed rate, falls at a constant speed with
//! a little horizontal jitter, ignores the flow entirely and is never
//! locked to the water surface.

use bevy::math::Vec3;
use rand::Rng;

use crate::constants::{MIST_DECAY_RATE, MIST_FALL_SPEED, MIST_JITTER};
use crate::water::RiverConfig;

pub struct MistParticles {
    positions: Vec<Vec3>,
    life: Vec<f32>,
    phase: Vec<f32>,
}

impl MistParticles {
    pub fn new(count: usize, config: &RiverConfig, rng: &mut impl Rng) -> Self {
        let mut mist = Self {
            positions: vec![Vec3::ZERO; count],
            life: vec![0.0; count],
            phase: vec![0.0; count],
        };
        for index in 0..count {
            mist.respawn(index, config, rng);
            mist.life[index] = rng.gen_range(0.05..=1.0);
        }
        mist
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn life(&self) -> &[f32] {
        &self.life
    }

    /// Per-particle random phase, stable across the particle's lifetime.
    /// Renderers use it to vary billboard size so the cloud does not look
    /// stamped.
    pub fn phase(&self) -> &[f32] {
        &self.phase
    }

    pub fn update(&mut self, config: &RiverConfig, dt: f32, rng: &mut impl Rng) {
        for index in 0..self.positions.len() {
            self.life[index] -= MIST_DECAY_RATE * dt;

            let below_the_falls =
                self.positions[index].y < config.water_height - config.waterfall_drop.max(0.0);
            if self.life[index] <= 0.0 || below_the_falls {
                self.respawn(index, config, rng);
                continue;
            }

            let p = &mut self.positions[index];
            p.y -= MIST_FALL_SPEED * dt;
            p.x += rng.gen_range(-1.0..=1.0) * MIST_JITTER * dt;
            p.z += rng.gen_range(-1.0..=1.0) * MIST_JITTER * dt;
        }
    }

    /// Rebuild one particle at the top lip of a randomly chosen waterfall
    /// end.
    fn respawn(&mut self, index: usize, config: &RiverConfig, rng: &mut impl Rng) {
        let (width, length) = config.safe_extents();
        let end = if rng.gen::<bool>() { 1.0 } else { -1.0 };
        let along = end * length * 0.5;
        let across = rng.gen_range(-0.5..=0.5) * width;
        let world = config.local_to_world(along, across);
        self.positions[index] = Vec3::new(world.x, config.water_height, world.y);
        self.life[index] = 1.0;
        self.phase[index] = rng.gen_range(0.0..std::f32::consts::TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(7)
    }

    #[test]
    fn mist_spawns_on_the_waterfall_lips() {
        let config = RiverConfig::default();
        let mut rng = rng();
        let mist = MistParticles::new(128, &config, &mut rng);
        let (width, length) = config.safe_extents();
        let mut saw_both_ends = (false, false);
        for p in mist.positions() {
            let local = config.world_to_local(p.x, p.z);
            assert!((local.x.abs() - length * 0.5).abs() < 1e-3, "not on a lip: {local:?}");
            assert!(local.y.abs() <= width * 0.5 + 1e-3);
            assert_eq!(p.y, config.water_height);
            if local.x > 0.0 {
                saw_both_ends.0 = true;
            } else {
                saw_both_ends.1 = true;
            }
        }
        assert!(saw_both_ends.0 && saw_both_ends.1);
    }

    #[test]
    fn mist_falls_and_recycles() {
        let config = RiverConfig::default();
        let mut rng = rng();
        let mut mist = MistParticles::new(32, &config, &mut rng);

        let heights_before: Vec<f32> = mist.positions().iter().map(|p| p.y).collect();
        mist.update(&config, 1.0 / 60.0, &mut rng);
        for (index, p) in mist.positions().iter().enumerate() {
            if mist.life()[index] < 1.0 {
                assert!(p.y < heights_before[index]);
            }
        }

        // Long run: everything keeps recycling, count never changes.
        for _ in 0..2000 {
            mist.update(&config, 1.0 / 30.0, &mut rng);
        }
        assert_eq!(mist.len(), 32);
        let floor = config.water_height - config.waterfall_drop - 1.0;
        for p in mist.positions() {
            assert!(p.is_finite());
            assert!(p.y > floor);
        }
    }
}

//! Foam particles riding the water surface.
//!
//! Fixed-capacity parallel arrays with index reuse on respawn: a particle
//! whose life runs out is rebuilt in place, never removed. Changing the
//! configured count means discarding the population and building a new one
//! (the session does this), so the three arrays stay equal-length for the
//! population's whole lifetime.

use bevy::math::{Vec2, Vec3};
use rand::Rng;

use crate::constants::{
    ANCHOR_SPAWN_CHANCE, FOAM_DECAY_RATE, FOAM_DRIFT_SPEED, FOAM_SURFACE_OFFSET,
    FOAM_WOBBLE_AMPLITUDE, FOAM_WOBBLE_FREQUENCY, SPLASH_CHANCE, SPLASH_RING_RADIUS,
};
use crate::water::{surface_height, Anchor, RiverConfig};

pub struct FoamParticles {
    positions: Vec<Vec3>,
    life: Vec<f32>,
    phase: Vec<f32>,
}

impl FoamParticles {
    /// Build a population of exactly `count` particles scattered over the
    /// usual respawn sites, with staggered life so they don't all expire
    /// on the same frame.
    pub fn new(
        count: usize,
        config: &RiverConfig,
        anchors: &[Anchor],
        rng: &mut impl Rng,
    ) -> Self {
        let mut foam = Self {
            positions: vec![Vec3::ZERO; count],
            life: vec![0.0; count],
            phase: vec![0.0; count],
        };
        for index in 0..count {
            foam.respawn(index, config, anchors, None, rng);
            foam.life[index] = rng.gen_range(0.05..=1.0);
        }
        foam
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

    /// Advance every particle by one frame. `player_position` enables the
    /// splash respawn bias while the player wades in the river.
    pub fn update(
        &mut self,
        config: &RiverConfig,
        anchors: &[Anchor],
        player_position: Vec3,
        time: f32,
        dt: f32,
        rng: &mut impl Rng,
    ) {
        let flow = config.flow_direction();
        let perpendicular = Vec2::new(-flow.y, flow.x);
        let (_, length) = config.safe_extents();
        let splash_site = config.wading(player_position).then_some(player_position);

        for index in 0..self.positions.len() {
            self.life[index] -= FOAM_DECAY_RATE * config.speed.max(0.0) * dt;

            let drifted_off = {
                let p = self.positions[index];
                config.world_to_local(p.x, p.z).x > length * 0.5
            };
            if self.life[index] <= 0.0 || drifted_off {
                self.respawn(index, config, anchors, splash_site, rng);
                continue;
            }

            // Advect downstream with a decorrelated lateral wobble.
            let wobble = (time * FOAM_WOBBLE_FREQUENCY + self.phase[index]).sin();
            let velocity = flow * FOAM_DRIFT_SPEED * config.speed
                + perpendicular * wobble * FOAM_WOBBLE_AMPLITUDE;
            let p = &mut self.positions[index];
            p.x += velocity.x * dt;
            p.z += velocity.y * dt;
            // Ride the wave surface.
            p.y = surface_height(p.x, p.z, time, config, anchors) + FOAM_SURFACE_OFFSET;
        }
    }

    fn respawn(
        &mut self,
        index: usize,
        config: &RiverConfig,
        anchors: &[Anchor],
        splash_site: Option<Vec3>,
        rng: &mut impl Rng,
    ) {
        let (width, length) = config.safe_extents();

        let local = if let Some(player) = splash_site.filter(|_| rng.gen::<f32>() < SPLASH_CHANCE) {
            // Tight ring around the wading player.
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let radius = SPLASH_RING_RADIUS * rng.gen_range(0.7..=1.0);
            let player_local = config.world_to_local(player.x, player.z);
            player_local + Vec2::new(angle.cos(), angle.sin()) * radius
        } else if !anchors.is_empty() && rng.gen::<f32>() < ANCHOR_SPAWN_CHANCE {
            let anchor = &anchors[rng.gen_range(0..anchors.len())];
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let radius = anchor.influence_radius * rng.gen_range(0.0..=0.8);
            Vec2::new(anchor.relative_x, anchor.relative_z)
                + Vec2::new(angle.cos(), angle.sin()) * radius
        } else {
            // Random point on the left or right edge.
            let side = if rng.gen::<bool>() { 1.0 } else { -1.0 };
            let along = rng.gen_range(-0.5..=0.5) * length;
            Vec2::new(along, side * width * 0.5)
        };

        let world = config.local_to_world(local.x, local.y);
        self.positions[index] = Vec3::new(world.x, config.water_height + FOAM_SURFACE_OFFSET, world.y);
        self.life[index] = 1.0;
        self.phase[index] = rng.gen_range(0.0..std::f32::consts::TAU);
    }
}

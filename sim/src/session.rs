//! One running scene: the player, the river, its particle populations and
//! the collision mesh, advanced together once per frame.

use bevy::math::Vec3;
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::MAX_DELTA;
use crate::input::InputSnapshot;
use crate::player::{simulate_player, Player};
use crate::terrain::TerrainMesh;
use crate::water::{surface_height, Anchor, FoamParticles, MistParticles, RiverConfig};

/// The whole simulation state. The viewer owns exactly one and drives it
/// from its frame loop; tests drive it directly with synthetic inputs.
///
/// Terrain arrives late (the viewer installs it once the scene meshes are
/// built), so locomotion is skipped until then while the water keeps
/// animating behind the loading screen.
#[derive(Resource)]
pub struct Session {
    pub player: Player,
    river: RiverConfig,
    anchors: Vec<Anchor>,
    foam: FoamParticles,
    mist: MistParticles,
    terrain: Option<TerrainMesh>,
    time: f32,
    rng: StdRng,
}

impl Session {
    pub fn new(spawn: Vec3, river: RiverConfig, anchors: Vec<Anchor>) -> Self {
        Self::with_seed(spawn, river, anchors, rand::random())
    }

    /// Seeded constructor so tests get reproducible particle motion.
    pub fn with_seed(spawn: Vec3, river: RiverConfig, anchors: Vec<Anchor>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let foam = FoamParticles::new(river.foam_count, &river, &anchors, &mut rng);
        let mist = MistParticles::new(river.mist_count, &river, &mut rng);
        Self {
            player: Player::new(spawn),
            river,
            anchors,
            foam,
            mist,
            terrain: None,
            time: 0.0,
            rng,
        }
    }

    /// Install the collision mesh. Until this is called [`Self::update`]
    /// leaves the player where it spawned.
    pub fn install_terrain(&mut self, terrain: TerrainMesh) {
        self.terrain = Some(terrain);
    }

    pub fn terrain_ready(&self) -> bool {
        self.terrain.is_some()
    }

    pub fn river(&self) -> &RiverConfig {
        &self.river
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn foam(&self) -> &FoamParticles {
        &self.foam
    }

    pub fn mist(&self) -> &MistParticles {
        &self.mist
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Wave surface height at a world position, at the session's current
    /// time.
    pub fn surface_height_at(&self, x: f32, z: f32) -> f32 {
        surface_height(x, z, self.time, &self.river, &self.anchors)
    }

    /// Swap in a new river configuration. Particle pools are rebuilt only
    /// when their capacity changed; otherwise the live particles keep
    /// their positions and adapt to the new flow on the next update.
    pub fn set_river(&mut self, river: RiverConfig) {
        let rebuild_foam = river.foam_count != self.river.foam_count;
        let rebuild_mist = river.mist_count != self.river.mist_count;
        self.river = river;
        if rebuild_foam {
            self.foam =
                FoamParticles::new(self.river.foam_count, &self.river, &self.anchors, &mut self.rng);
        }
        if rebuild_mist {
            self.mist = MistParticles::new(self.river.mist_count, &self.river, &mut self.rng);
        }
    }

    /// Advance everything by one frame. `dt` is clamped to [`MAX_DELTA`]
    /// so a long stall cannot fling the player through the terrain.
    pub fn update(&mut self, input: &InputSnapshot, camera_yaw: f32, dt: f32) {
        let dt = dt.clamp(0.0, MAX_DELTA);
        self.time += dt;

        if let Some(terrain) = self.terrain.as_ref() {
            simulate_player(
                &mut self.player,
                terrain,
                input,
                camera_yaw,
                Some(&self.river),
                dt,
            );
        }

        self.foam.update(
            &self.river,
            &self.anchors,
            self.player.position,
            self.time,
            dt,
            &mut self.rng,
        );
        self.mist.update(&self.river, dt, &mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GROUND_EPSILON;
    use crate::player::LocomotionState;

    fn flat_mesh(height: f32) -> TerrainMesh {
        let heights = vec![height; 16 * 16];
        TerrainMesh::from_heightfield(&heights, 16, 16, 4.0, Vec3::new(-32.0, 0.0, -32.0))
    }

    fn session() -> Session {
        Session::with_seed(
            Vec3::new(0.0, 5.0, 0.0),
            RiverConfig::default(),
            vec![Anchor { relative_x: 3.0, relative_z: 0.0, influence_radius: 2.0 }],
            42,
        )
    }

    #[test]
    fn no_terrain_means_no_locomotion_but_live_water() {
        let mut session = session();
        let spawn = session.player.position;
        let foam_before: Vec<_> = session.foam().positions().to_vec();
        for _ in 0..30 {
            session.update(&InputSnapshot::default(), 0.0, 1.0 / 60.0);
        }
        assert_eq!(session.player.position, spawn);
        assert!(session.time() > 0.0);
        let moved = session
            .foam()
            .positions()
            .iter()
            .zip(&foam_before)
            .any(|(now, before)| now != before);
        assert!(moved, "foam should advect without terrain");
    }

    #[test]
    fn player_settles_onto_installed_terrain() {
        let mut session = session();
        session.install_terrain(flat_mesh(0.0));
        for _ in 0..240 {
            session.update(&InputSnapshot::default(), 0.0, 1.0 / 60.0);
        }
        assert!(session.player.grounded);
        assert!(session.player.position.y.abs() <= GROUND_EPSILON + 1e-4);
        assert_eq!(session.player.state, LocomotionState::Idle);
    }

    #[test]
    fn delta_time_is_clamped() {
        let mut session = session();
        session.install_terrain(flat_mesh(0.0));
        let before = session.time();
        session.update(&InputSnapshot::default(), 0.0, 5.0);
        assert!((session.time() - before - MAX_DELTA).abs() < 1e-6);
    }

    #[test]
    fn changing_particle_counts_rebuilds_the_pools() {
        let mut session = session();
        let mut river = session.river().clone();
        river.foam_count = 17;
        river.mist_count = 9;
        session.set_river(river);
        assert_eq!(session.foam().len(), 17);
        assert_eq!(session.mist().len(), 9);

        // Same counts again: pools survive untouched.
        let river = session.river().clone();
        let first = session.foam().positions()[0];
        session.set_river(river);
        assert_eq!(session.foam().positions()[0], first);
    }
}

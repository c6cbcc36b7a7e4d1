//! River configuration and anchors.
//!
//! The config is read live every frame and may be rewritten at any time by
//! outside UI with no transactional semantics; anything that divides by an
//! extent goes through [`RiverConfig::safe_extents`] first.

use bevy::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{FLOW_SPEED_GAIN, MIN_WATER_EXTENT, WATER_COUPLING_DEPTH};

/// A fixed obstacle (rock) in the river. Position is relative to the
/// water's local origin, so moving the water rigid-translates every
/// anchor. The influence radius bounds both the wave-height bump and the
/// foam respawn bias.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub relative_x: f32,
    pub relative_z: f32,
    pub influence_radius: f32,
}

impl Anchor {
    pub fn new(relative_x: f32, relative_z: f32, influence_radius: f32) -> Self {
        Self {
            relative_x,
            relative_z,
            influence_radius: influence_radius.max(0.0),
        }
    }
}

/// Named scalar parameters of the river. Width runs across the flow,
/// length along it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiverConfig {
    /// Flow speed multiplier, scales wave animation, foam advection and
    /// foam life decay.
    pub speed: f32,
    pub wave_height: f32,
    /// Direction of the current in degrees; 0° flows along +X, 90° along +Z.
    pub flow_angle_degrees: f32,
    /// Extent across the flow. Must stay positive; consumers clamp.
    pub width: f32,
    /// Extent along the flow. Must stay positive; consumers clamp.
    pub length: f32,
    /// Base water surface height (world Y).
    pub water_height: f32,
    /// World-space position of the water's local origin.
    pub water_offset_x: f32,
    pub water_offset_z: f32,
    /// Drop below the lip at both ends of the river.
    pub waterfall_drop: f32,
    pub foam_count: usize,
    pub foam_size: f32,
    pub mist_count: usize,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            wave_height: 0.25,
            flow_angle_degrees: 0.0,
            width: 12.0,
            length: 40.0,
            water_height: 0.0,
            water_offset_x: 0.0,
            water_offset_z: 0.0,
            waterfall_drop: 6.0,
            foam_count: 400,
            foam_size: 0.12,
            mist_count: 150,
        }
    }
}

/// Preset river moods, data-driven like a lighting table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiverPreset {
    /// Slow, glassy water.
    Gentle,
    #[default]
    Brisk,
    /// Fast current, tall waves, dense foam.
    Torrent,
}

impl RiverPreset {
    pub fn to_config(self) -> RiverConfig {
        let base = RiverConfig::default();
        match self {
            RiverPreset::Gentle => RiverConfig {
                speed: 0.4,
                wave_height: 0.1,
                foam_count: 180,
                mist_count: 60,
                ..base
            },
            RiverPreset::Brisk => base,
            RiverPreset::Torrent => RiverConfig {
                speed: 2.2,
                wave_height: 0.45,
                foam_count: 700,
                foam_size: 0.16,
                mist_count: 300,
                ..base
            },
        }
    }
}

impl RiverConfig {
    /// Unit flow direction in the XZ plane derived from the configured
    /// angle: 0° is +X, 90° is +Z.
    pub fn flow_direction(&self) -> Vec2 {
        let radians = self.flow_angle_degrees.to_radians();
        Vec2::new(radians.cos(), radians.sin())
    }

    /// Width/length with the degenerate-config guard applied.
    pub fn safe_extents(&self) -> (f32, f32) {
        (
            self.width.max(MIN_WATER_EXTENT),
            self.length.max(MIN_WATER_EXTENT),
        )
    }

    /// World position of a point given in flow-aligned local coordinates
    /// (`along` the flow, `across` it).
    pub fn local_to_world(&self, along: f32, across: f32) -> Vec2 {
        let flow = self.flow_direction();
        let perpendicular = Vec2::new(-flow.y, flow.x);
        Vec2::new(self.water_offset_x, self.water_offset_z) + flow * along + perpendicular * across
    }

    /// Flow-aligned local coordinates of a world XZ point.
    pub fn world_to_local(&self, x: f32, z: f32) -> Vec2 {
        let flow = self.flow_direction();
        let perpendicular = Vec2::new(-flow.y, flow.x);
        let relative = Vec2::new(x - self.water_offset_x, z - self.water_offset_z);
        Vec2::new(relative.dot(flow), relative.dot(perpendicular))
    }

    /// True when the world XZ point is inside the water footprint.
    pub fn footprint_contains(&self, x: f32, z: f32) -> bool {
        let (width, length) = self.safe_extents();
        let local = self.world_to_local(x, z);
        local.x.abs() <= length * 0.5 && local.y.abs() <= width * 0.5
    }

    /// True when `position` is in the water footprint and within the
    /// coupling window of the surface.
    pub fn wading(&self, position: Vec3) -> bool {
        self.footprint_contains(position.x, position.z)
            && (position.y - self.water_height).abs() <= WATER_COUPLING_DEPTH
    }

    /// Move-speed multiplier for a wading player: moving with the current
    /// is faster, against it slower, via the dot of the move direction
    /// and the flow direction. 1.0 outside the water.
    pub fn flow_speed_multiplier(&self, position: Vec3, move_dir: Vec3) -> f32 {
        if !self.wading(position) {
            return 1.0;
        }
        let flow = self.flow_direction();
        let horizontal = Vec2::new(move_dir.x, move_dir.z).normalize_or_zero();
        1.0 + FLOW_SPEED_GAIN * horizontal.dot(flow)
    }
}

//! Triangle-mesh terrain handle with deterministic nearest-hit raycasts.
//!
//! The mesh is immutable once built, so a uniform XZ grid over triangle
//! footprints is enough of a broadphase: every probe the controller issues
//! is either short (whiskers, ground snaps) or vertical (fallback probe),
//! and both kinds touch only a handful of cells.

use bevy::math::{Vec2, Vec3};

/// Rays shorter than this are not worth casting.
const RAY_EPSILON: f32 = 1e-6;

/// Target edge length of one broadphase grid cell.
const GRID_CELL_SIZE: f32 = 4.0;

#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }
}

/// Nearest intersection of a probe ray with the terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Seam between the locomotion controller and whatever supplies collision
/// geometry. Production code uses [`TerrainMesh`]; tests are free to
/// implement analytic colliders.
pub trait TerrainCollider {
    /// Nearest hit along `direction` (unit length) within `max_distance`,
    /// or `None`. "No hit" is a common, valid outcome (falling off the
    /// world edge), never an error.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Immutable triangle soup plus its broadphase index.
pub struct TerrainMesh {
    triangles: Vec<Triangle>,
    grid_min: Vec2,
    cell_size: f32,
    cols: usize,
    rows: usize,
    /// Triangle indices per XZ cell.
    cells: Vec<Vec<u32>>,
}

impl TerrainMesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let (mut min, mut max) = (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN));
        for tri in &triangles {
            for v in [tri.a, tri.b, tri.c] {
                min = min.min(Vec2::new(v.x, v.z));
                max = max.max(Vec2::new(v.x, v.z));
            }
        }
        if triangles.is_empty() {
            min = Vec2::ZERO;
            max = Vec2::ZERO;
        }

        let extent = (max - min).max(Vec2::splat(GRID_CELL_SIZE));
        let cols = (extent.x / GRID_CELL_SIZE).ceil() as usize;
        let rows = (extent.y / GRID_CELL_SIZE).ceil() as usize;
        let mut cells = vec![Vec::new(); cols * rows];

        for (index, tri) in triangles.iter().enumerate() {
            let (mut lo, mut hi) = (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN));
            for v in [tri.a, tri.b, tri.c] {
                lo = lo.min(Vec2::new(v.x, v.z));
                hi = hi.max(Vec2::new(v.x, v.z));
            }
            let c0 = (((lo.x - min.x) / GRID_CELL_SIZE) as usize).min(cols - 1);
            let c1 = (((hi.x - min.x) / GRID_CELL_SIZE) as usize).min(cols - 1);
            let r0 = (((lo.y - min.y) / GRID_CELL_SIZE) as usize).min(rows - 1);
            let r1 = (((hi.y - min.y) / GRID_CELL_SIZE) as usize).min(rows - 1);
            for row in r0..=r1 {
                for col in c0..=c1 {
                    cells[row * cols + col].push(index as u32);
                }
            }
        }

        Self {
            triangles,
            grid_min: min,
            cell_size: GRID_CELL_SIZE,
            cols,
            rows,
            cells,
        }
    }

    /// Build a terrain mesh from a row-major heightfield. `heights` holds
    /// `nx * nz` samples spaced `spacing` apart, starting at `origin`.
    /// Two triangles per cell; used by the viewer and by tests.
    pub fn from_heightfield(heights: &[f32], nx: usize, nz: usize, spacing: f32, origin: Vec3) -> Self {
        assert_eq!(heights.len(), nx * nz, "heightfield sample count mismatch");
        let at = |x: usize, z: usize| {
            origin
                + Vec3::new(
                    x as f32 * spacing,
                    heights[z * nx + x],
                    z as f32 * spacing,
                )
        };

        let mut triangles = Vec::with_capacity(2 * nx.saturating_sub(1) * nz.saturating_sub(1));
        for z in 0..nz.saturating_sub(1) {
            for x in 0..nx.saturating_sub(1) {
                let p00 = at(x, z);
                let p10 = at(x + 1, z);
                let p01 = at(x, z + 1);
                let p11 = at(x + 1, z + 1);
                // Wound counter-clockwise seen from above, normals up.
                triangles.push(Triangle::new(p00, p01, p10));
                triangles.push(Triangle::new(p10, p01, p11));
            }
        }
        Self::new(triangles)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Reference raycast that scans every triangle. The grid path must
    /// agree with this exactly; kept public for the property tests.
    pub fn raycast_brute(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= RAY_EPSILON {
            return None;
        }
        let mut best: Option<RayHit> = None;
        for tri in &self.triangles {
            try_hit(origin, direction, max_distance, tri, &mut best);
        }
        best
    }

    fn cell_of(&self, x: f32, z: f32) -> (i64, i64) {
        (
            ((x - self.grid_min.x) / self.cell_size).floor() as i64,
            ((z - self.grid_min.y) / self.cell_size).floor() as i64,
        )
    }
}

impl TerrainCollider for TerrainMesh {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= RAY_EPSILON || self.triangles.is_empty() {
            return None;
        }

        // Walk the XZ footprint of the ray segment, padded one cell.
        let end = origin + direction * max_distance;
        let (c0, r0) = self.cell_of(origin.x.min(end.x), origin.z.min(end.z));
        let (c1, r1) = self.cell_of(origin.x.max(end.x), origin.z.max(end.z));
        let c_lo = (c0 - 1).clamp(0, self.cols as i64 - 1) as usize;
        let c_hi = (c1 + 1).clamp(0, self.cols as i64 - 1) as usize;
        let r_lo = (r0 - 1).clamp(0, self.rows as i64 - 1) as usize;
        let r_hi = (r1 + 1).clamp(0, self.rows as i64 - 1) as usize;

        let mut best: Option<RayHit> = None;
        for row in r_lo..=r_hi {
            for col in c_lo..=c_hi {
                for &index in &self.cells[row * self.cols + col] {
                    let tri = &self.triangles[index as usize];
                    try_hit(origin, direction, max_distance, tri, &mut best);
                }
            }
        }
        best
    }
}

fn try_hit(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    tri: &Triangle,
    best: &mut Option<RayHit>,
) {
    if let Some(distance) = ray_triangle(origin, direction, tri) {
        if distance <= max_distance && best.map_or(true, |b| distance < b.distance) {
            let mut normal = tri.normal();
            if normal.dot(direction) > 0.0 {
                normal = -normal;
            }
            *best = Some(RayHit {
                distance,
                point: origin + direction * distance,
                normal,
            });
        }
    }
}

/// Möller–Trumbore ray/triangle intersection. Double-sided; returns the
/// parametric distance along the (unit) direction.
fn ray_triangle(origin: Vec3, direction: Vec3, tri: &Triangle) -> Option<f32> {
    let edge1 = tri.b - tri.a;
    let edge2 = tri.c - tri.a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - tri.a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > RAY_EPSILON).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    /// 20x20 flat square at y = 0 centered on the origin.
    pub(crate) fn flat_ground() -> TerrainMesh {
        let heights = vec![0.0; 21 * 21];
        TerrainMesh::from_heightfield(&heights, 21, 21, 1.0, Vec3::new(-10.0, 0.0, -10.0))
    }

    #[test]
    fn downward_ray_hits_flat_ground() {
        let mesh = flat_ground();
        let hit = mesh
            .raycast(Vec3::new(0.3, 5.0, -2.7), Vec3::NEG_Y, 100.0)
            .expect("ground under the ray");
        assert!((hit.distance - 5.0).abs() < 1e-4);
        assert!(hit.point.y.abs() < 1e-4);
        assert!(hit.normal.y > 0.99);
    }

    #[test]
    fn ray_off_the_edge_misses() {
        let mesh = flat_ground();
        assert!(mesh.raycast(Vec3::new(50.0, 5.0, 50.0), Vec3::NEG_Y, 100.0).is_none());
    }

    #[test]
    fn raycast_is_idempotent() {
        let mesh = flat_ground();
        let origin = Vec3::new(1.2, 8.0, -3.4);
        let first = mesh.raycast(origin, Vec3::NEG_Y, 100.0);
        let second = mesh.raycast(origin, Vec3::NEG_Y, 100.0);
        assert_eq!(first, second);
    }

    #[test]
    fn ground_hit_is_never_above_origin() {
        let mesh = flat_ground();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let origin = Vec3::new(
                rng.gen_range(-9.0..9.0),
                rng.gen_range(0.5..20.0),
                rng.gen_range(-9.0..9.0),
            );
            let hit = mesh.raycast(origin, Vec3::NEG_Y, 100.0).expect("above the mesh");
            assert!(hit.point.y <= origin.y);
        }
    }

    #[test]
    fn grid_agrees_with_brute_force() {
        // Bumpy heightfield so rays hit sloped triangles too.
        let nx = 17;
        let nz = 17;
        let mut heights = Vec::with_capacity(nx * nz);
        for z in 0..nz {
            for x in 0..nx {
                heights.push(((x as f32) * 0.7).sin() + ((z as f32) * 0.5).cos());
            }
        }
        let mesh = TerrainMesh::from_heightfield(&heights, nx, nz, 1.0, Vec3::new(-8.0, 0.0, -8.0));

        let mut rng = rand::rngs::StdRng::seed_from_u64(99);
        for _ in 0..300 {
            let origin = Vec3::new(
                rng.gen_range(-7.0..7.0),
                rng.gen_range(-2.0..6.0),
                rng.gen_range(-7.0..7.0),
            );
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if direction.length() < 0.1 {
                continue;
            }
            let brute = mesh.raycast_brute(origin, direction, 6.0);
            let indexed = mesh.raycast(origin, direction, 6.0);
            assert_eq!(brute, indexed, "origin {origin:?} dir {direction:?}");
        }
    }

    #[test]
    fn empty_mesh_never_hits() {
        let mesh = TerrainMesh::new(Vec::new());
        assert!(mesh.raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 1000.0).is_none());
    }
}

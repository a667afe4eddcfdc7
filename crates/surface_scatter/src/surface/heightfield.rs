//! Regular-grid height field (terrain) surface.
//!
//! Heights are stored row-major over the XZ plane and interpolated bilinearly. Rays
//! are clipped to the field's bounding box, marched at a fraction of the cell size
//! until they cross from above to below the surface, then refined by bisection.
use glam::{Vec2, Vec3};

use crate::error::{Error, Result};
use crate::surface::{Ray, SurfaceHit, SurfaceQuery};

/// March step as a fraction of the cell size.
const MARCH_STEP_FRACTION: f32 = 0.25;
/// Bisection iterations after a crossing was bracketed.
const REFINE_ITERATIONS: usize = 20;
/// Vertical padding of the bounding box so flat fields have a non-empty slab.
const HEIGHT_PAD: f32 = 1e-3;

/// A terrain-like surface `y = h(x, z)` sampled on a regular grid.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightField {
    /// World-space XZ position of sample `(0, 0)`.
    pub origin: Vec2,
    /// Spacing between samples in world units.
    pub cell_size: f32,
    /// Samples along X.
    pub width: usize,
    /// Samples along Z.
    pub depth: usize,
    heights: Vec<f32>,
    min_height: f32,
    max_height: f32,
}

impl HeightField {
    /// Creates a height field from row-major heights (`heights[z * width + x]`).
    pub fn new(
        origin: Vec2,
        cell_size: f32,
        width: usize,
        depth: usize,
        heights: Vec<f32>,
    ) -> Result<Self> {
        if width < 2 || depth < 2 {
            return Err(Error::InvalidConfig(
                "height field needs at least 2x2 samples".into(),
            ));
        }
        if cell_size <= 0.0 || !cell_size.is_finite() {
            return Err(Error::InvalidConfig("cell_size must be > 0".into()));
        }
        if heights.len() != width * depth {
            return Err(Error::InvalidConfig(format!(
                "expected {} heights, got {}",
                width * depth,
                heights.len()
            )));
        }
        if heights.iter().any(|h| !h.is_finite()) {
            return Err(Error::InvalidConfig("heights must be finite".into()));
        }

        let min_height = heights.iter().copied().fold(f32::INFINITY, f32::min);
        let max_height = heights.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Ok(Self {
            origin,
            cell_size,
            width,
            depth,
            heights,
            min_height,
            max_height,
        })
    }

    /// Samples `f(x, z)` at every grid point, centered on the world origin.
    pub fn from_fn(
        cell_size: f32,
        width: usize,
        depth: usize,
        f: impl Fn(f32, f32) -> f32,
    ) -> Result<Self> {
        let origin = Vec2::new(
            -(width.saturating_sub(1) as f32) * cell_size * 0.5,
            -(depth.saturating_sub(1) as f32) * cell_size * 0.5,
        );
        let mut heights = Vec::with_capacity(width * depth);
        for iz in 0..depth {
            for ix in 0..width {
                heights.push(f(
                    origin.x + ix as f32 * cell_size,
                    origin.y + iz as f32 * cell_size,
                ));
            }
        }
        Self::new(origin, cell_size, width, depth, heights)
    }

    /// World-space XZ extent covered by the field.
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            (self.width - 1) as f32 * self.cell_size,
            (self.depth - 1) as f32 * self.cell_size,
        )
    }

    pub fn height_range(&self) -> (f32, f32) {
        (self.min_height, self.max_height)
    }

    /// Bilinearly interpolated height, or `None` outside the field.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let gx = (x - self.origin.x) / self.cell_size;
        let gz = (z - self.origin.y) / self.cell_size;
        let max_x = (self.width - 1) as f32;
        let max_z = (self.depth - 1) as f32;
        if !(0.0..=max_x).contains(&gx) || !(0.0..=max_z).contains(&gz) {
            return None;
        }

        let ix = (gx.floor() as usize).min(self.width - 2);
        let iz = (gz.floor() as usize).min(self.depth - 2);
        let fx = gx - ix as f32;
        let fz = gz - iz as f32;

        let h00 = self.sample(ix, iz);
        let h10 = self.sample(ix + 1, iz);
        let h01 = self.sample(ix, iz + 1);
        let h11 = self.sample(ix + 1, iz + 1);
        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        Some(top + (bottom - top) * fz)
    }

    /// Unit normal from central differences, clamped at the borders.
    pub fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        let e = self.cell_size * 0.5;
        let (lo, hi) = self.bounds_xz();
        let sample = |px: f32, pz: f32| {
            self.height_at(px.clamp(lo.x, hi.x), pz.clamp(lo.y, hi.y))
                .unwrap_or(0.0)
        };
        let dx = sample(x + e, z) - sample(x - e, z);
        let dz = sample(x, z + e) - sample(x, z - e);
        Vec3::new(-dx, 2.0 * e, -dz).normalize_or(Vec3::Y)
    }

    #[inline]
    fn sample(&self, ix: usize, iz: usize) -> f32 {
        self.heights[iz * self.width + ix]
    }

    fn bounds_xz(&self) -> (Vec2, Vec2) {
        (self.origin, self.origin + self.size())
    }

    /// Entry and exit distances of `ray` through the field's bounding box.
    fn clip(&self, ray: &Ray) -> Option<(f32, f32)> {
        let (lo, hi) = self.bounds_xz();
        let min = Vec3::new(lo.x, self.min_height - HEIGHT_PAD, lo.y);
        let max = Vec3::new(hi.x, self.max_height + HEIGHT_PAD, hi.y);

        let mut t_enter = 0.0f32;
        let mut t_exit = ray.max_distance;
        for axis in 0..3 {
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            if d.abs() < f32::EPSILON {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }
        Some((t_enter, t_exit))
    }

    /// Height of the ray above the surface at distance `t`.
    fn clearance(&self, ray: &Ray, t: f32) -> Option<f32> {
        let p = ray.at(t);
        self.height_at(p.x, p.z).map(|h| p.y - h)
    }
}

impl SurfaceQuery for HeightField {
    fn raycast_first(&self, ray: &Ray) -> Option<SurfaceHit> {
        let (t_enter, t_exit) = self.clip(ray)?;
        let step = self.cell_size * MARCH_STEP_FRACTION;

        let mut t_prev = t_enter;
        let mut prev = self.clearance(ray, t_prev);
        // Entered through the top of the slab already touching the surface.
        if let Some(c) = prev {
            if c <= 0.0 && c > -2.0 * HEIGHT_PAD && ray.direction.y < 0.0 {
                let point = ray.at(t_enter);
                let normal = self.normal_at(point.x, point.z);
                return Some(SurfaceHit::new(point, normal, t_enter));
            }
        }
        let mut t = t_enter;
        while t < t_exit {
            t = (t + step).min(t_exit);
            let current = self.clearance(ray, t);
            if let (Some(above), Some(below)) = (prev, current) {
                if above > 0.0 && below <= 0.0 {
                    let t_hit = self.refine(ray, t_prev, t);
                    let point = ray.at(t_hit);
                    let normal = self.normal_at(point.x, point.z);
                    return Some(SurfaceHit::new(point, normal, t_hit));
                }
            }
            t_prev = t;
            prev = current;
        }
        None
    }
}

impl HeightField {
    fn refine(&self, ray: &Ray, mut above: f32, mut below: f32) -> f32 {
        for _ in 0..REFINE_ITERATIONS {
            let mid = 0.5 * (above + below);
            match self.clearance(ray, mid) {
                Some(c) if c > 0.0 => above = mid,
                _ => below = mid,
            }
        }
        0.5 * (above + below)
    }
}

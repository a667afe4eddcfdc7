use std::path::Path;

use glam::{Affine3A, Vec2, Vec3};
use image::{Rgb, RgbImage};
use surface_scatter::pose::ResolvedPose;
use surface_scatter::preview::{DrawSink, Rgba};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Top-down view settings: world XZ rectangle mapped onto the image.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World XZ point at the image center.
    pub center: Vec2,
    /// World XZ size shown.
    pub extent: Vec2,
    pub background: [u8; 3],
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), extent: Vec2) -> Self {
        Self {
            image_size,
            center: Vec2::ZERO,
            extent,
            background: [20, 20, 20],
        }
    }

    pub fn with_center(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }
}

/// RGB image drawn in world coordinates seen from above (+X right, +Z down).
///
/// Implements [`DrawSink`] so a tool preview can be rendered straight into it. Meshes
/// are drawn as their footprint: a square with a tick along the local +Z axis.
pub struct Canvas {
    config: RenderConfig,
    image: RgbImage,
}

impl Canvas {
    pub fn new(config: RenderConfig) -> Self {
        let (w, h) = config.image_size;
        let image = RgbImage::from_pixel(w, h, Rgb(config.background));
        Self { config, image }
    }

    fn pixels_per_unit(&self) -> Vec2 {
        Vec2::new(
            self.config.image_size.0 as f32 / self.config.extent.x,
            self.config.image_size.1 as f32 / self.config.extent.y,
        )
    }

    /// World position to pixel coordinates (may lie outside the image).
    pub fn to_pixel(&self, world: Vec3) -> (i32, i32) {
        let local = Vec2::new(world.x, world.z) - self.config.center + self.config.extent * 0.5;
        let px = local * self.pixels_per_unit();
        (px.x.floor() as i32, px.y.floor() as i32)
    }

    fn put(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image.put_pixel(x as u32, y as u32, Rgb(rgb));
        }
    }

    /// Fills every pixel from the world position under it.
    pub fn shade(&mut self, mut f: impl FnMut(Vec2) -> [u8; 3]) {
        let ppu = self.pixels_per_unit();
        let origin = self.config.center - self.config.extent * 0.5;
        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            let world = origin + (Vec2::new(x as f32, y as f32) + 0.5) / ppu;
            *pixel = Rgb(f(world));
        }
    }

    /// Bresenham line between two world points, projected to XZ.
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, rgb: [u8; 3]) {
        let (mut x0, mut y0) = self.to_pixel(start);
        let (x1, y1) = self.to_pixel(end);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, rgb);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Filled circle of `radius` world units, at least one pixel wide.
    pub fn draw_disc(&mut self, center: Vec3, radius: f32, rgb: [u8; 3]) {
        let (cx, cy) = self.to_pixel(center);
        let r = (radius * self.pixels_per_unit().x).max(1.0) as i32;
        for y in -r..=r {
            for x in -r..=r {
                if x * x + y * y <= r * r {
                    self.put(cx + x, cy + y, rgb);
                }
            }
        }
    }

    /// Placed object: square footprint plus heading tick.
    pub fn draw_pose(&mut self, pose: &ResolvedPose, size: f32, rgb: [u8; 3]) {
        self.draw_footprint(
            Affine3A::from_rotation_translation(pose.rotation, pose.position),
            size,
            rgb,
        );
    }

    fn draw_footprint(&mut self, transform: Affine3A, size: f32, rgb: [u8; 3]) {
        let half = size * 0.5;
        let corners = [
            Vec3::new(-half, 0.0, -half),
            Vec3::new(half, 0.0, -half),
            Vec3::new(half, 0.0, half),
            Vec3::new(-half, 0.0, half),
        ]
        .map(|c| transform.transform_point3(c));
        for i in 0..corners.len() {
            self.draw_line(corners[i], corners[(i + 1) % corners.len()], rgb);
        }
        let center = transform.transform_point3(Vec3::ZERO);
        let heading = transform.transform_point3(Vec3::new(0.0, 0.0, size));
        self.draw_line(center, heading, rgb);
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        tracing::info!("Wrote {}", path.display());
        Ok(())
    }
}

fn to_rgb(color: Rgba) -> [u8; 3] {
    let c = color.to_array();
    [c[0], c[1], c[2]].map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

impl<M, Mat> DrawSink<M, Mat> for Canvas {
    fn line(&mut self, start: Vec3, end: Vec3, color: Rgba) {
        self.draw_line(start, end, to_rgb(color));
    }

    fn polyline(&mut self, points: &[Vec3], color: Rgba) {
        let rgb = to_rgb(color);
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], rgb);
        }
    }

    fn sphere(&mut self, center: Vec3, radius: f32, color: Rgba) {
        self.draw_disc(center, radius, to_rgb(color));
    }

    fn mesh(&mut self, _mesh: &M, _material: &Mat, transform: Affine3A) {
        let (scale, rotation, translation) = transform.to_scale_rotation_translation();
        let size = scale.x.max(scale.z).max(0.1);
        self.draw_footprint(
            Affine3A::from_rotation_translation(rotation, translation),
            size,
            [170, 170, 170],
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn center_maps_to_image_center() {
        let canvas = Canvas::new(RenderConfig::new((100, 50), Vec2::new(10.0, 5.0)));
        assert_eq!(canvas.to_pixel(Vec3::ZERO), (50, 25));
        assert_eq!(canvas.to_pixel(Vec3::new(-5.0, 3.0, -2.5)), (0, 0));
    }

    #[test]
    fn out_of_bounds_drawing_is_clipped() {
        let mut canvas = Canvas::new(RenderConfig::new((10, 10), Vec2::splat(10.0)));
        canvas.draw_line(Vec3::new(-50.0, 0.0, 0.0), Vec3::new(50.0, 0.0, 0.0), [255, 0, 0]);
        canvas.draw_pose(
            &ResolvedPose::new(Vec3::new(100.0, 0.0, 100.0), Quat::IDENTITY),
            1.0,
            [0, 255, 0],
        );
        assert_eq!(canvas.image.get_pixel(0, 5).0, [255, 0, 0]);
    }
}

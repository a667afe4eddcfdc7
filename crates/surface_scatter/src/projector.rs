//! Projection of tangent-space disc offsets onto the surface.
//!
//! Every ray here is built by [`tangent_ray`]: start above the base hit at the disc
//! offset, lifted by the ray offset along the normal, and shoot straight down the
//! normal. Sample rays and ring rays share it.
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::frame::TangentFrame;
use crate::sampling::SampleRecord;
use crate::settings::ScatterSettings;
use crate::surface::{Ray, SurfaceHit, SurfaceQuery};

/// The downward ray for a tangent-space position inside (or on) the unit disc.
#[inline]
pub fn tangent_ray(
    base_hit: &SurfaceHit,
    frame: &TangentFrame,
    tangent_pos: Vec2,
    radius: f32,
    settings: &ScatterSettings,
) -> Ray {
    let origin =
        base_hit.point + frame.to_world(tangent_pos) * radius + frame.normal * settings.ray_offset;
    Ray::from_unit(origin, -frame.normal, settings.max_ray_distance)
}

/// Projects one sample onto the surface. `None` means the sample missed and is skipped.
#[inline]
pub fn project_sample<S: SurfaceQuery + ?Sized>(
    surface: &S,
    sample: &SampleRecord,
    base_hit: &SurfaceHit,
    frame: &TangentFrame,
    radius: f32,
    settings: &ScatterSettings,
) -> Option<SurfaceHit> {
    let ray = tangent_ray(base_hit, frame, sample.disc_point, radius, settings);
    surface.raycast_first(&ray)
}

/// Unit-circle direction of ring point `i` out of `segments`.
///
/// Uses `t = i / (segments - 1)` so the last point coincides with the first and the
/// polyline closes on itself.
#[inline]
pub fn ring_direction(i: usize, segments: usize) -> Vec2 {
    let t = i as f32 / (segments.max(2) - 1) as f32;
    let (sin, cos) = (t * TAU).sin_cos();
    Vec2::new(cos, sin)
}

/// Fills `out` with the disc boundary projected onto the surface.
///
/// A hit contributes `point + normal * ring_lift`; a miss contributes the ray origin,
/// which keeps the outline closed over gaps. `out` is cleared first and ends up with
/// exactly `settings.ring_segments` points.
pub fn ring_outline<S: SurfaceQuery + ?Sized>(
    surface: &S,
    base_hit: &SurfaceHit,
    frame: &TangentFrame,
    radius: f32,
    settings: &ScatterSettings,
    out: &mut Vec<Vec3>,
) {
    let segments = settings.ring_segments;
    out.clear();
    out.reserve(segments);
    for i in 0..segments {
        let ray = tangent_ray(base_hit, frame, ring_direction(i, segments), radius, settings);
        let p = match surface.raycast_first(&ray) {
            Some(hit) => hit.point + hit.normal * settings.ring_lift,
            None => ray.origin,
        };
        out.push(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::build_frame;
    use crate::surface::{FnSurface, Plane};

    fn ground_setup() -> (SurfaceHit, TangentFrame, ScatterSettings) {
        let base = SurfaceHit::new(Vec3::ZERO, Vec3::Y, 10.0);
        let frame = build_frame(Vec3::Y, Vec3::new(0.0, 0.6, -0.8));
        (base, frame, ScatterSettings::default())
    }

    #[test]
    fn tangent_ray_starts_above_offset_point_and_points_down() {
        let (base, frame, settings) = ground_setup();
        let ray = tangent_ray(&base, &frame, Vec2::new(0.5, -0.5), 2.0, &settings);
        let expected = frame.to_world(Vec2::new(1.0, -1.0)) + Vec3::Y * 2.0;
        assert!((ray.origin - expected).length() < 1e-5);
        assert_eq!(ray.direction, Vec3::NEG_Y);
    }

    #[test]
    fn projected_sample_lands_at_disc_offset_on_plane() {
        let (base, frame, settings) = ground_setup();
        let sample = SampleRecord::new(Vec2::new(0.3, 0.4), 10.0);
        let hit = project_sample(&Plane::ground(), &sample, &base, &frame, 2.0, &settings)
            .expect("hit");
        assert!(hit.point.y.abs() < 1e-5);
        assert!((hit.point.length() - 1.0).abs() < 1e-5);
        assert!((hit.distance - settings.ray_offset).abs() < 1e-5);
    }

    #[test]
    fn projection_is_deterministic() {
        let (base, frame, settings) = ground_setup();
        let sample = SampleRecord::new(Vec2::new(-0.7, 0.1), 200.0);
        let a = project_sample(&Plane::ground(), &sample, &base, &frame, 3.0, &settings);
        let b = project_sample(&Plane::ground(), &sample, &base, &frame, 3.0, &settings);
        assert_eq!(a, b);
    }

    #[test]
    fn missing_surface_yields_none() {
        let (base, frame, settings) = ground_setup();
        let sample = SampleRecord::new(Vec2::ZERO, 0.0);
        assert!(project_sample(&(), &sample, &base, &frame, 1.0, &settings).is_none());
    }

    #[test]
    fn ring_direction_closes_the_loop() {
        let first = ring_direction(0, 128);
        let last = ring_direction(127, 128);
        assert!((first - last).length() < 1e-5);
        assert!((ring_direction(32, 128).length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ring_outline_hits_are_lifted_and_misses_fall_back_to_origin() {
        let (base, frame, settings) = ground_setup();
        let settings = settings.with_ring_segments(16);
        // Only the half-space x >= 0 has ground under it.
        let half = FnSurface::new(|ray: &Ray| {
            if ray.origin.x >= 0.0 {
                Plane::ground().raycast_first(ray)
            } else {
                None
            }
        });
        let mut ring = vec![Vec3::splat(99.0); 3];
        ring_outline(&half, &base, &frame, 2.0, &settings, &mut ring);
        assert_eq!(ring.len(), 16);
        for p in &ring {
            if p.x >= 0.0 {
                assert!((p.y - settings.ring_lift).abs() < 1e-5);
            } else {
                assert!((p.y - settings.ray_offset).abs() < 1e-5);
            }
            let planar = Vec2::new(p.x, p.z).length();
            assert!((planar - 2.0).abs() < 1e-4);
        }
    }
}

//! Tangent frames anchored at the cursor hit.
//!
//! The frame maps 2D disc offsets into world space: `tangent` is the disc's x axis,
//! `bitangent` its y axis and `normal` points away from the surface.
use glam::Vec3;

/// Squared cross-product length below which two axes count as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Secondary axes tried, in order, when the normal is parallel to the viewer's up.
pub const FALLBACK_AXES: [Vec3; 2] = [Vec3::Z, Vec3::X];

/// Orthonormal basis anchored at a surface point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TangentFrame {
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

impl TangentFrame {
    /// Maps a disc offset into world space, relative to the frame origin.
    #[inline]
    pub fn to_world(&self, offset: glam::Vec2) -> Vec3 {
        self.tangent * offset.x + self.bitangent * offset.y
    }
}

/// Builds the frame for a hit normal as seen by a viewer whose up axis is `viewer_up`.
///
/// `tangent = normalize(normal x up)`, `bitangent = normal x tangent`. See
/// [`build_frame_checked`] for the degenerate case.
pub fn build_frame(hit_normal: Vec3, viewer_up: Vec3) -> TangentFrame {
    build_frame_checked(hit_normal, viewer_up).0
}

/// Like [`build_frame`], also reporting whether a fallback axis had to replace
/// `viewer_up` because it was parallel to the normal (or unusable).
///
/// The fallback is deterministic: world forward (`+Z`) first, then `+X`. A zero or
/// non-finite normal is replaced by `+Y`.
pub fn build_frame_checked(hit_normal: Vec3, viewer_up: Vec3) -> (TangentFrame, bool) {
    let normal = if hit_normal.is_finite() {
        hit_normal.normalize_or(Vec3::Y)
    } else {
        Vec3::Y
    };

    let mut degenerate = false;
    let mut tangent = normal.cross(viewer_up);
    if !tangent.is_finite() || tangent.length_squared() < PARALLEL_EPSILON {
        degenerate = true;
        tangent = FALLBACK_AXES
            .iter()
            .map(|axis| normal.cross(*axis))
            .find(|t| t.length_squared() >= PARALLEL_EPSILON)
            .unwrap_or_else(|| normal.any_orthogonal_vector());
    }
    // Re-orthogonalize: near-parallel inputs leave rounding error in the cross product.
    let tangent = (tangent - normal * normal.dot(tangent)).normalize();
    let bitangent = normal.cross(tangent);

    (
        TangentFrame {
            normal,
            tangent,
            bitangent,
        },
        degenerate,
    )
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    use super::*;

    fn assert_orthonormal(f: &TangentFrame) {
        for v in [f.normal, f.tangent, f.bitangent] {
            assert!(v.is_finite());
            assert!((v.length() - 1.0).abs() < 1e-5, "not unit: {v}");
        }
        assert!(f.normal.dot(f.tangent).abs() < 1e-5);
        assert!(f.normal.dot(f.bitangent).abs() < 1e-5);
        assert!(f.tangent.dot(f.bitangent).abs() < 1e-5);
    }

    fn random_unit(rng: &mut StdRng) -> Vec3 {
        loop {
            let v = Vec3::new(
                rng.next_u32() as f32 / u32::MAX as f32 * 2.0 - 1.0,
                rng.next_u32() as f32 / u32::MAX as f32 * 2.0 - 1.0,
                rng.next_u32() as f32 / u32::MAX as f32 * 2.0 - 1.0,
            );
            if let Some(n) = v.try_normalize() {
                return n;
            }
        }
    }

    #[test]
    fn flat_ground_seen_from_tilted_camera() {
        let up = Vec3::new(0.0, 0.6, -0.8);
        let (frame, degenerate) = build_frame_checked(Vec3::Y, up);
        assert!(!degenerate);
        assert_eq!(frame.normal, Vec3::Y);
        assert_orthonormal(&frame);
        assert!((frame.tangent - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn random_inputs_are_orthonormal() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let n = random_unit(&mut rng);
            let up = random_unit(&mut rng);
            let frame = build_frame(n, up);
            assert_orthonormal(&frame);
        }
    }

    #[test]
    fn normal_parallel_to_up_uses_world_forward() {
        let (frame, degenerate) = build_frame_checked(Vec3::Y, Vec3::Y);
        assert!(degenerate);
        assert_orthonormal(&frame);
        assert!((frame.tangent - Vec3::Y.cross(Vec3::Z).normalize()).length() < 1e-6);

        let (frame, degenerate) = build_frame_checked(Vec3::NEG_Y, Vec3::Y);
        assert!(degenerate);
        assert_orthonormal(&frame);
    }

    #[test]
    fn normal_parallel_to_up_and_forward_uses_x() {
        let (frame, degenerate) = build_frame_checked(Vec3::Z, Vec3::NEG_Z);
        assert!(degenerate);
        assert_orthonormal(&frame);
        assert!((frame.tangent - Vec3::Z.cross(Vec3::X)).length() < 1e-6);
    }

    #[test]
    fn zero_inputs_stay_finite() {
        let (frame, degenerate) = build_frame_checked(Vec3::ZERO, Vec3::ZERO);
        assert!(degenerate);
        assert_eq!(frame.normal, Vec3::Y);
        assert_orthonormal(&frame);

        let frame = build_frame(Vec3::splat(f32::NAN), Vec3::Y);
        assert_orthonormal(&frame);
    }

    #[test]
    fn to_world_uses_tangent_and_bitangent() {
        let frame = build_frame(Vec3::Y, Vec3::new(0.0, 0.0, -1.0));
        let p = frame.to_world(Vec2::new(1.0, 2.0));
        assert!((p - (frame.tangent + frame.bitangent * 2.0)).length() < 1e-6);
        assert!(p.dot(Vec3::Y).abs() < 1e-6);
    }
}

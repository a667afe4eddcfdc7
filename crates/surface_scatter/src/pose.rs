//! Placement poses aligned to the surface normal.
use glam::{Mat3, Quat, Vec3};

use crate::surface::SurfaceHit;

/// Fixed basis correction turning an object's local `+Y` onto the look axis.
pub const LAY_FLAT: Quat = Quat::from_xyzw(
    std::f32::consts::FRAC_1_SQRT_2,
    0.0,
    0.0,
    std::f32::consts::FRAC_1_SQRT_2,
);

/// Final world placement of one sample in the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl ResolvedPose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// The pose's local `+Y` in world space; equals the surface normal it was resolved from.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rigid transform of the pose (unit scale).
    #[inline]
    pub fn to_affine(&self) -> glam::Affine3A {
        glam::Affine3A::from_rotation_translation(self.rotation, self.position)
    }
}

/// Rotation whose local `+Z` points along `forward`, with local `+Y` as close to world
/// `+Y` as possible.
///
/// When `forward` is parallel to world up the side axis is world `+X`, so looking
/// straight up or down is still a proper rotation about X.
pub fn look_rotation(forward: Vec3) -> Quat {
    let z = forward.normalize_or(Vec3::Z);
    let x = Vec3::Y.cross(z).try_normalize().unwrap_or(Vec3::X);
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Resolves the placement pose for a projected sample.
///
/// `rotation = look_rotation(normal) * (RotZ(spin) * RotX(90deg))`: align to the surface,
/// twist by the random spin and lay the object flat so its local `+Y` follows the
/// normal.
pub fn resolve_pose(hit: &SurfaceHit, spin_angle_deg: f32) -> ResolvedPose {
    let spin = Quat::from_rotation_z(spin_angle_deg.to_radians());
    let rotation = (look_rotation(hit.normal) * (spin * LAY_FLAT)).normalize();
    ResolvedPose::new(hit.point, rotation)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn hit(point: Vec3, normal: Vec3) -> SurfaceHit {
        SurfaceHit::new(point, normal.normalize(), 1.0)
    }

    #[test]
    fn lay_flat_is_quarter_turn_about_x() {
        let expected = Quat::from_rotation_x(FRAC_PI_2);
        assert!(LAY_FLAT.abs_diff_eq(expected, 1e-6));
        assert!((LAY_FLAT * Vec3::Y - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn look_rotation_points_z_forward() {
        for forward in [
            Vec3::X,
            Vec3::NEG_Z,
            Vec3::new(0.3, 0.8, -0.2),
            Vec3::Y,
            Vec3::NEG_Y,
        ] {
            let q = look_rotation(forward);
            assert!((q * Vec3::Z - forward.normalize()).length() < 1e-5, "{forward}");
            assert!((q.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn look_rotation_straight_up_keeps_x_axis() {
        let up = look_rotation(Vec3::Y);
        assert!((up * Vec3::X - Vec3::X).length() < 1e-5);
        assert!((up * Vec3::Y - Vec3::NEG_Z).length() < 1e-5);

        let down = look_rotation(Vec3::NEG_Y);
        assert!((down * Vec3::X - Vec3::X).length() < 1e-5);
        assert!((down * Vec3::Y - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn local_up_follows_surface_normal_for_any_spin() {
        let normals = [Vec3::Y, Vec3::new(1.0, 1.0, 0.0), Vec3::new(-0.2, 0.4, 0.9)];
        for n in normals {
            for spin in [0.0, 45.0, 180.0, 359.9] {
                let pose = resolve_pose(&hit(Vec3::ONE, n), spin);
                assert!((pose.up() - n.normalize()).length() < 1e-5, "n={n} spin={spin}");
                assert_eq!(pose.position, Vec3::ONE);
            }
        }
    }

    #[test]
    fn spin_twists_about_the_normal() {
        let h = hit(Vec3::ZERO, Vec3::Y);
        let a = resolve_pose(&h, 0.0);
        let b = resolve_pose(&h, 90.0);
        let twist = b.rotation * a.rotation.inverse();
        let (axis, angle) = twist.to_axis_angle();
        assert!((angle - FRAC_PI_2).abs() < 1e-4);
        assert!(axis.cross(Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn affine_matches_pose() {
        let pose = resolve_pose(&hit(Vec3::new(2.0, 0.0, -1.0), Vec3::Y), 30.0);
        let m = pose.to_affine();
        assert!((m.transform_point3(Vec3::ZERO) - pose.position).length() < 1e-5);
        assert!((m.transform_vector3(Vec3::Y) - Vec3::Y).length() < 1e-5);
    }
}

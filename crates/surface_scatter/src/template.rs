//! Template objects copied at each committed pose.
//!
//! A [`Template`] describes the host's prototype as a flat list of mesh parts. Part
//! transforms are relative to the template root. When a template is previewed or
//! committed at a pose, the pose replaces the root's translation and rotation and the
//! root's scale is kept, so every part ends up at
//! `pose * Scale(root_scale) * part.local`.
use glam::{Affine3A, Vec3};

use crate::pose::ResolvedPose;

/// One renderable piece of a template.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshPart<M, Mat> {
    pub mesh: M,
    pub material: Mat,
    /// Transform of this part relative to the template root.
    pub local: Affine3A,
}

impl<M, Mat> MeshPart<M, Mat> {
    pub fn new(mesh: M, material: Mat, local: Affine3A) -> Self {
        Self {
            mesh,
            material,
            local,
        }
    }
}

/// Prototype object instantiated by the commit controller.
#[derive(Clone, Debug, PartialEq)]
pub struct Template<M, Mat> {
    pub name: String,
    /// Scale of the template root, kept on every placed copy.
    pub root_scale: Vec3,
    pub parts: Vec<MeshPart<M, Mat>>,
}

impl<M, Mat> Template<M, Mat> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root_scale: Vec3::ONE,
            parts: Vec::new(),
        }
    }

    /// Adds a part placed at `local` relative to the template root.
    pub fn with_part(mut self, mesh: M, material: Mat, local: Affine3A) -> Self {
        self.parts.push(MeshPart::new(mesh, material, local));
        self
    }

    /// Sets the root scale.
    pub fn with_root_scale(mut self, root_scale: Vec3) -> Self {
        self.root_scale = root_scale;
        self
    }

    /// World transform of the template root placed at `pose`.
    pub fn root_to_world(&self, pose: &ResolvedPose) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.root_scale, pose.rotation, pose.position)
    }

    /// World transform of `part` when the template is placed at `pose`.
    #[inline]
    pub fn part_to_world(&self, pose: &ResolvedPose, part: &MeshPart<M, Mat>) -> Affine3A {
        self.root_to_world(pose) * part.local
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    fn pose() -> ResolvedPose {
        ResolvedPose::new(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        )
    }

    #[test]
    fn single_part_at_origin_follows_pose() {
        let t = Template::new("rock").with_part("mesh", "mat", Affine3A::IDENTITY);
        let m = t.part_to_world(&pose(), &t.parts[0]);
        assert!((m.transform_point3(Vec3::ZERO) - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
        assert!((m.transform_vector3(Vec3::X) - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn child_offset_is_rotated_with_the_pose() {
        let t = Template::new("tree")
            .with_part("trunk", "bark", Affine3A::IDENTITY)
            .with_part("crown", "leaves", Affine3A::from_translation(Vec3::new(1.0, 2.0, 0.0)));
        let m = t.part_to_world(&pose(), &t.parts[1]);
        // +X offset turns into -Z under a quarter turn about Y.
        let expected = Vec3::new(10.0, 2.0, -1.0);
        assert!((m.transform_point3(Vec3::ZERO) - expected).length() < 1e-5);
    }

    #[test]
    fn non_uniform_root_scale_applies_in_pose_frame() {
        let t = Template::new("slab")
            .with_root_scale(Vec3::new(2.0, 1.0, 1.0))
            .with_part("m", "mat", Affine3A::from_translation(Vec3::X));
        let m = t.part_to_world(&pose(), &t.parts[0]);
        // Local +X is stretched by 2 before the pose rotates it onto -Z.
        let expected = Vec3::new(10.0, 0.0, -2.0);
        assert!((m.transform_point3(Vec3::ZERO) - expected).length() < 1e-5);
        let root = t.root_to_world(&pose());
        assert!((root.transform_vector3(Vec3::X).length() - 2.0).abs() < 1e-5);
    }
}

//! Per-frame resolution of the sample set into surface poses.
//!
//! [`ScatterFrame`] holds everything derived from one cursor position: the anchor hit
//! and tangent frame, one optional projection per sample (index-aligned with the
//! [`SampleSet`]) and the projected ring outline. Its buffers are reused between
//! frames; their contents are rewritten on every [`ScatterFrame::resolve`].
use glam::Vec3;

use crate::frame::{build_frame_checked, TangentFrame};
use crate::pose::{resolve_pose, ResolvedPose};
use crate::projector::{project_sample, ring_outline};
use crate::sampling::SampleSet;
use crate::settings::ScatterSettings;
use crate::surface::{Ray, SurfaceHit, SurfaceQuery};

/// Cursor hit and the frame built from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameAnchor {
    pub hit: SurfaceHit,
    pub frame: TangentFrame,
    /// Disc radius the frame was resolved with.
    pub radius: f32,
    /// Whether the frame needed a fallback axis.
    pub degenerate: bool,
}

/// A sample that landed on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub hit: SurfaceHit,
    pub pose: ResolvedPose,
}

/// Reusable per-frame scatter state.
#[derive(Debug, Clone, Default)]
pub struct ScatterFrame {
    anchor: Option<FrameAnchor>,
    projections: Vec<Option<Projection>>,
    ring: Vec<Vec3>,
    sample_generation: u64,
}

impl ScatterFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the frame for `cursor_ray`.
    ///
    /// A missing cursor ray or a cursor ray that hits nothing clears the frame and
    /// returns `None`. Otherwise every sample is projected (misses stay `None` at their
    /// index) and the ring outline is rebuilt.
    pub fn resolve<S: SurfaceQuery + ?Sized>(
        &mut self,
        surface: &S,
        cursor_ray: Option<&Ray>,
        viewer_up: Vec3,
        samples: &SampleSet,
        radius: f32,
        settings: &ScatterSettings,
    ) -> Option<&FrameAnchor> {
        self.sample_generation = samples.generation();
        let Some(base) = cursor_ray.and_then(|ray| surface.raycast_first(ray)) else {
            self.clear();
            return None;
        };

        let (frame, degenerate) = build_frame_checked(base.normal, viewer_up);

        self.projections.clear();
        self.projections.reserve_exact(samples.len());
        for sample in samples {
            let projection = project_sample(surface, sample, &base, &frame, radius, settings)
                .map(|hit| Projection {
                    hit,
                    pose: resolve_pose(&hit, sample.spin_angle_deg),
                });
            self.projections.push(projection);
        }

        ring_outline(surface, &base, &frame, radius, settings, &mut self.ring);

        self.anchor = Some(FrameAnchor {
            hit: base,
            frame,
            radius,
            degenerate,
        });
        self.anchor.as_ref()
    }

    /// Drops the anchor and all per-sample results, keeping buffer capacity.
    pub fn clear(&mut self) {
        self.anchor = None;
        self.projections.clear();
        self.ring.clear();
    }

    pub fn anchor(&self) -> Option<&FrameAnchor> {
        self.anchor.as_ref()
    }

    pub fn has_anchor(&self) -> bool {
        self.anchor.is_some()
    }

    /// Per-sample results, index-aligned with the sample set they were resolved from.
    pub fn projections(&self) -> &[Option<Projection>] {
        &self.projections
    }

    /// Poses of the samples that landed, in sample order.
    pub fn poses(&self) -> impl Iterator<Item = &ResolvedPose> + '_ {
        self.projections.iter().flatten().map(|p| &p.pose)
    }

    pub fn hit_count(&self) -> usize {
        self.projections.iter().filter(|p| p.is_some()).count()
    }

    pub fn miss_count(&self) -> usize {
        self.projections.len() - self.hit_count()
    }

    pub fn ring(&self) -> &[Vec3] {
        &self.ring
    }

    /// Generation of the [`SampleSet`] used by the last resolve.
    pub fn sample_generation(&self) -> u64 {
        self.sample_generation
    }

    /// Whether the frame was resolved from the current sample layout.
    pub fn is_current_for(&self, samples: &SampleSet) -> bool {
        self.sample_generation == samples.generation()
    }
}

//! Live preview of the resolved frame through a host draw sink.
//!
//! The preview never touches the scene. Hosts implement [`DrawSink`] over whatever
//! immediate-mode drawing they have (gizmos, debug lines, a software rasterizer) and
//! call [`render_preview`] once per frame after resolving it.
use glam::{Affine3A, Vec3};

use crate::resolve::ScatterFrame;
use crate::sampling::SampleSet;
use crate::settings::ScatterSettings;
use crate::template::Template;

/// Linear RGBA color with components in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Colors used by [`render_preview`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PreviewStyle {
    pub marker: Rgba,
    pub sample_normal: Rgba,
    pub tangent_axis: Rgba,
    pub bitangent_axis: Rgba,
    pub normal_axis: Rgba,
    pub ring: Rgba,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            marker: Rgba::YELLOW,
            sample_normal: Rgba::CYAN,
            tangent_axis: Rgba::RED,
            bitangent_axis: Rgba::GREEN,
            normal_axis: Rgba::BLUE,
            ring: Rgba::WHITE,
        }
    }
}

/// Immediate-mode drawing surface supplied by the host.
pub trait DrawSink<M, Mat> {
    fn line(&mut self, start: Vec3, end: Vec3, color: Rgba);

    /// Connected line strip through `points`.
    fn polyline(&mut self, points: &[Vec3], color: Rgba);

    fn sphere(&mut self, center: Vec3, radius: f32, color: Rgba);

    /// Draws `mesh` with `material` at `transform` for this frame only.
    fn mesh(&mut self, mesh: &M, material: &Mat, transform: Affine3A);
}

/// Counts of what one [`render_preview`] call drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviewStats {
    pub markers: usize,
    pub meshes: usize,
}

/// Draws the preview for `frame`.
///
/// Nothing is drawn when the frame has no anchor or was resolved from an older
/// sample layout than `samples`. Markers and the ring are drawn without a template;
/// mesh parts only when one is set, using `preview_material` in place of each part's
/// own material when given.
pub fn render_preview<M, Mat, D>(
    frame: &ScatterFrame,
    samples: &SampleSet,
    template: Option<&Template<M, Mat>>,
    preview_material: Option<&Mat>,
    settings: &ScatterSettings,
    draw: &mut D,
) -> PreviewStats
where
    D: DrawSink<M, Mat> + ?Sized,
{
    let mut stats = PreviewStats::default();
    let Some(anchor) = frame.anchor() else {
        return stats;
    };
    if !frame.is_current_for(samples) {
        return stats;
    }
    let style = &settings.style;

    for projection in frame.projections().iter().flatten() {
        let p = projection.pose.position;
        draw.sphere(p, settings.marker_radius, style.marker);
        draw.line(
            p,
            p + projection.hit.normal * settings.normal_length,
            style.sample_normal,
        );
        stats.markers += 1;

        if let Some(template) = template {
            for part in &template.parts {
                let material = preview_material.unwrap_or(&part.material);
                draw.mesh(
                    &part.mesh,
                    material,
                    template.part_to_world(&projection.pose, part),
                );
                stats.meshes += 1;
            }
        }
    }

    let origin = anchor.hit.point;
    let axes = [
        (anchor.frame.tangent, style.tangent_axis),
        (anchor.frame.bitangent, style.bitangent_axis),
        (anchor.frame.normal, style.normal_axis),
    ];
    for (axis, color) in axes {
        draw.line(origin, origin + axis * settings.axis_length, color);
    }

    if !frame.ring().is_empty() {
        draw.polyline(frame.ring(), style.ring);
    }

    stats
}

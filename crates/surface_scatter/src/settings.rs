//! Tool settings: projection, preview and interaction constants.
//!
//! [`ScatterSettings`] gathers every tunable the tool uses besides the user-facing
//! [`crate::params::ScatterParameters`]. Use the builder methods and call
//! [`ScatterSettings::validate`] (or construct the tool through
//! [`crate::tool::ScatterTool::try_new`]) before use.
use crate::error::{Error, Result};
use crate::preview::PreviewStyle;
use crate::sampling::DiscMethod;

pub const DEFAULT_RING_SEGMENTS: usize = 128;
pub const DEFAULT_RAY_OFFSET: f32 = 2.0;
pub const DEFAULT_RING_LIFT: f32 = 0.02;
pub const DEFAULT_MARKER_RADIUS: f32 = 0.05;
pub const DEFAULT_SCROLL_STEP: f32 = 0.05;
pub const DEFAULT_UNDO_LABEL: &str = "Spawn Objects";

/// Configuration for a scatter tool session.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScatterSettings {
    /// Points in the surface-conforming ring outline.
    pub ring_segments: usize,
    /// Height above the surface at which sample rays start.
    pub ray_offset: f32,
    /// Length limit for every ray the tool casts.
    pub max_ray_distance: f32,
    /// Lift applied to ring points along the hit normal to avoid z-fighting.
    pub ring_lift: f32,
    /// Radius of the per-sample sphere markers.
    pub marker_radius: f32,
    /// Length of the per-sample normal stubs.
    pub normal_length: f32,
    /// Length of the reference axes drawn at the cursor hit.
    pub axis_length: f32,
    /// Relative radius change per scroll notch.
    pub scroll_step: f32,
    /// Undo group label for committed objects.
    pub undo_label: String,
    /// Disc sampling strategy.
    pub disc_method: DiscMethod,
    /// Preview colors.
    pub style: PreviewStyle,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            ring_segments: DEFAULT_RING_SEGMENTS,
            ray_offset: DEFAULT_RAY_OFFSET,
            max_ray_distance: f32::INFINITY,
            ring_lift: DEFAULT_RING_LIFT,
            marker_radius: DEFAULT_MARKER_RADIUS,
            normal_length: 1.0,
            axis_length: 1.0,
            scroll_step: DEFAULT_SCROLL_STEP,
            undo_label: DEFAULT_UNDO_LABEL.to_owned(),
            disc_method: DiscMethod::default(),
            style: PreviewStyle::default(),
        }
    }
}

impl ScatterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ring outline resolution.
    pub fn with_ring_segments(mut self, ring_segments: usize) -> Self {
        self.ring_segments = ring_segments;
        self
    }

    /// Sets the ray start height above the surface.
    pub fn with_ray_offset(mut self, ray_offset: f32) -> Self {
        self.ray_offset = ray_offset;
        self
    }

    /// Sets the maximum ray length.
    pub fn with_max_ray_distance(mut self, max_ray_distance: f32) -> Self {
        self.max_ray_distance = max_ray_distance;
        self
    }

    /// Sets the ring lift.
    pub fn with_ring_lift(mut self, ring_lift: f32) -> Self {
        self.ring_lift = ring_lift;
        self
    }

    /// Sets marker radius, normal stub length and axis length.
    pub fn with_gizmo_sizes(
        mut self,
        marker_radius: f32,
        normal_length: f32,
        axis_length: f32,
    ) -> Self {
        self.marker_radius = marker_radius;
        self.normal_length = normal_length;
        self.axis_length = axis_length;
        self
    }

    /// Sets the relative radius change per scroll notch.
    pub fn with_scroll_step(mut self, scroll_step: f32) -> Self {
        self.scroll_step = scroll_step;
        self
    }

    /// Sets the undo label.
    pub fn with_undo_label(mut self, undo_label: impl Into<String>) -> Self {
        self.undo_label = undo_label.into();
        self
    }

    /// Sets the disc sampling strategy.
    pub fn with_disc_method(mut self, disc_method: DiscMethod) -> Self {
        self.disc_method = disc_method;
        self
    }

    /// Sets the preview colors.
    pub fn with_style(mut self, style: PreviewStyle) -> Self {
        self.style = style;
        self
    }

    /// Validates the settings, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.ring_segments < 3 {
            return Err(Error::InvalidConfig("ring_segments must be >= 3".into()));
        }
        if !(self.ray_offset > 0.0 && self.ray_offset.is_finite()) {
            return Err(Error::InvalidConfig("ray_offset must be finite and > 0".into()));
        }
        if self.max_ray_distance.is_nan() || self.max_ray_distance <= 0.0 {
            return Err(Error::InvalidConfig("max_ray_distance must be > 0".into()));
        }
        if !(self.ring_lift >= 0.0 && self.ring_lift.is_finite()) {
            return Err(Error::InvalidConfig("ring_lift must be finite and >= 0".into()));
        }
        if !(self.marker_radius > 0.0 && self.normal_length >= 0.0 && self.axis_length >= 0.0) {
            return Err(Error::InvalidConfig(
                "marker_radius must be > 0, normal_length and axis_length >= 0".into(),
            ));
        }
        if !(self.scroll_step > 0.0 && self.scroll_step < 1.0) {
            return Err(Error::InvalidConfig("scroll_step must be in (0, 1)".into()));
        }
        if self.undo_label.trim().is_empty() {
            return Err(Error::InvalidConfig("undo_label must not be empty".into()));
        }

        Ok(())
    }
}

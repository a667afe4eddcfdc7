//! User-facing scatter parameters with validated setters.
//!
//! Every setter clamps to the documented minimum and reports what happened through
//! [`ParamUpdate`], so the caller knows whether to regenerate samples and whether to
//! tell the user their value was adjusted.
use crate::settings::ScatterSettings;
use crate::template::Template;

/// Smallest allowed disc radius.
pub const MIN_RADIUS: f32 = 1.0;
/// Smallest allowed sample count.
pub const MIN_SAMPLE_COUNT: usize = 1;

pub const DEFAULT_RADIUS: f32 = 2.0;
pub const DEFAULT_SAMPLE_COUNT: usize = 8;

/// Outcome of a parameter setter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParamUpdate {
    /// The stored value differs from before.
    pub changed: bool,
    /// The requested value was replaced by the minimum.
    pub clamped: bool,
}

/// Parameters of one scatter session.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterParameters<M, Mat> {
    disc_radius: f32,
    sample_count: usize,
    template: Option<Template<M, Mat>>,
    preview_material: Option<Mat>,
}

impl<M, Mat> Default for ScatterParameters<M, Mat> {
    fn default() -> Self {
        Self {
            disc_radius: DEFAULT_RADIUS,
            sample_count: DEFAULT_SAMPLE_COUNT,
            template: None,
            preview_material: None,
        }
    }
}

impl<M, Mat> ScatterParameters<M, Mat> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters with the given radius and count, both clamped.
    pub fn with_disc(disc_radius: f32, sample_count: i64) -> Self {
        let mut params = Self::default();
        params.set_disc_radius(disc_radius);
        params.set_sample_count(sample_count);
        params
    }

    pub fn disc_radius(&self) -> f32 {
        self.disc_radius
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn template(&self) -> Option<&Template<M, Mat>> {
        self.template.as_ref()
    }

    pub fn preview_material(&self) -> Option<&Mat> {
        self.preview_material.as_ref()
    }

    /// Sets the disc radius, clamped to [`MIN_RADIUS`]. Non-finite values count as
    /// below the minimum.
    pub fn set_disc_radius(&mut self, radius: f32) -> ParamUpdate {
        let clamped = !radius.is_finite() || radius < MIN_RADIUS;
        let radius = if clamped { MIN_RADIUS } else { radius };
        let changed = radius != self.disc_radius;
        self.disc_radius = radius;
        ParamUpdate { changed, clamped }
    }

    /// Sets the sample count, clamped to [`MIN_SAMPLE_COUNT`].
    ///
    /// Takes a signed value so raw UI input like `-5` clamps instead of wrapping.
    pub fn set_sample_count(&mut self, count: i64) -> ParamUpdate {
        let clamped = count < MIN_SAMPLE_COUNT as i64;
        let count = if clamped {
            MIN_SAMPLE_COUNT
        } else {
            usize::try_from(count).unwrap_or(usize::MAX)
        };
        let changed = count != self.sample_count;
        self.sample_count = count;
        ParamUpdate { changed, clamped }
    }

    /// Replaces the template; `None` disables mesh preview and commits.
    pub fn set_template(&mut self, template: Option<Template<M, Mat>>) {
        self.template = template;
    }

    /// Material used for every preview mesh instead of the parts' own materials.
    pub fn set_preview_material(&mut self, material: Option<Mat>) {
        self.preview_material = material;
    }
}

/// Serializable parameter snapshot: disc size plus tool settings.
///
/// Templates and materials are host handles and are not part of a preset.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScatterPreset {
    pub disc_radius: f32,
    pub sample_count: i64,
    pub settings: ScatterSettings,
}

impl Default for ScatterPreset {
    fn default() -> Self {
        Self {
            disc_radius: DEFAULT_RADIUS,
            sample_count: DEFAULT_SAMPLE_COUNT as i64,
            settings: ScatterSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Params = ScatterParameters<(), ()>;

    #[test]
    fn defaults() {
        let params = Params::new();
        assert_eq!(params.disc_radius(), 2.0);
        assert_eq!(params.sample_count(), 8);
        assert!(params.template().is_none());
        assert!(params.preview_material().is_none());
    }

    #[test]
    fn radius_below_minimum_clamps() {
        let mut params = Params::new();
        let update = params.set_disc_radius(0.3);
        assert_eq!(params.disc_radius(), MIN_RADIUS);
        assert!(update.clamped && update.changed);

        let update = params.set_disc_radius(0.5);
        assert!(update.clamped);
        assert!(!update.changed);

        params.set_disc_radius(f32::NAN);
        assert_eq!(params.disc_radius(), MIN_RADIUS);
    }

    #[test]
    fn negative_count_clamps_to_one() {
        let mut params = Params::new();
        let update = params.set_sample_count(-5);
        assert_eq!(params.sample_count(), 1);
        assert!(update.clamped && update.changed);
    }

    #[test]
    fn valid_values_pass_through() {
        let mut params = Params::with_disc(4.5, 20);
        assert_eq!(params.disc_radius(), 4.5);
        assert_eq!(params.sample_count(), 20);
        assert_eq!(params.set_sample_count(20), ParamUpdate::default());
        let update = params.set_disc_radius(1.0);
        assert!(update.changed && !update.clamped);
    }

    #[test]
    fn template_and_material_are_optional() {
        let mut params: ScatterParameters<&str, &str> = ScatterParameters::new();
        params.set_template(Some(Template::new("rock")));
        params.set_preview_material(Some("ghost"));
        assert_eq!(params.template().map(|t| t.name.as_str()), Some("rock"));
        assert_eq!(params.preview_material(), Some(&"ghost"));
        params.set_template(None);
        assert!(params.template().is_none());
    }
}

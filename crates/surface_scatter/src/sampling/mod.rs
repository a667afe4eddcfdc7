//! Random sample generation for the scatter disc.
//!
//! A scatter pass works on a fixed set of [`SampleRecord`]s: a point inside the unit
//! disc (the tangent-space offset of one placement) and a spin angle (its twist about
//! the surface normal). The set lives in a [`SampleSet`] and is regenerated as a whole
//! whenever a parameter changes or a commit happens.
use glam::Vec2;
use mint::Vector2;
use rand::RngCore;

pub mod polar_disc;
pub mod rejection_disc;

pub use polar_disc::PolarDiscSampling;
pub use rejection_disc::RejectionDiscSampling;

/// Upper bound (exclusive) for spin angles in degrees.
pub const FULL_TURN_DEG: f32 = 360.0;

/// Trait for generating points uniformly distributed (by area) inside the unit disc.
pub trait DiscSampling: Send + Sync {
    fn generate(&self, count: usize, rng: &mut dyn RngCore) -> Vec<Vector2<f32>>;
}

/// Selects one of the built-in [`DiscSampling`] strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiscMethod {
    /// Square-root radius and uniform angle.
    #[default]
    Polar,
    /// Uniform square draws rejected outside the disc.
    Rejection,
}

impl DiscMethod {
    /// Builds the sampler for this method.
    pub fn sampler(self) -> Box<dyn DiscSampling> {
        match self {
            DiscMethod::Polar => Box::new(PolarDiscSampling),
            DiscMethod::Rejection => Box::new(RejectionDiscSampling::default()),
        }
    }
}

/// One random sample of a scatter pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleRecord {
    /// Offset inside the unit disc, in tangent space.
    pub disc_point: Vec2,
    /// Twist about the surface normal, in degrees within [0, 360).
    pub spin_angle_deg: f32,
}

impl SampleRecord {
    pub fn new(disc_point: Vec2, spin_angle_deg: f32) -> Self {
        Self {
            disc_point,
            spin_angle_deg,
        }
    }
}

/// Owned buffer of [`SampleRecord`]s, replaced wholesale on every regeneration.
///
/// The `generation` counter increases with each regeneration so that per-frame
/// results can be tied to the exact sample layout they were computed from.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    records: Vec<SampleRecord>,
    generation: u64,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set with `count` fresh samples.
    pub fn generate(count: usize, sampler: &dyn DiscSampling, rng: &mut dyn RngCore) -> Self {
        let mut set = Self::new();
        set.regenerate(count, sampler, rng);
        set
    }

    /// Replaces every record with `count` fresh samples and bumps the generation.
    ///
    /// Disc points come from `sampler`; spin angles are drawn afterwards from the same
    /// stream, one per record.
    pub fn regenerate(&mut self, count: usize, sampler: &dyn DiscSampling, rng: &mut dyn RngCore) {
        let points = sampler.generate(count, rng);
        debug_assert_eq!(points.len(), count, "disc sampler must honour the count");

        self.records.clear();
        self.records.reserve_exact(count);
        for p in points {
            let spin = random_spin_deg(rng);
            self.records.push(SampleRecord::new(Vec2::from(p), spin));
        }
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn as_slice(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SampleRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a SampleRecord;
    type IntoIter = std::slice::Iter<'a, SampleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Draw a spin angle in degrees, strictly inside [0, 360).
#[inline]
pub fn random_spin_deg(rng: &mut dyn RngCore) -> f32 {
    (rand01(rng) * FULL_TURN_DEG).min(next_down(FULL_TURN_DEG))
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// ensuring bounds are strictly inside a range.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}

//! Uniform disc sampling by rejection from the enclosing square.
use mint::Vector2;
use rand::RngCore;

use crate::sampling::{rand01, DiscSampling, PolarDiscSampling};

/// Default number of square draws before falling back to [`PolarDiscSampling`].
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Uniform-by-area sampling of the unit disc: draw in `[-1, 1)^2`, keep points with
/// `|p| <= 1`.
///
/// Acceptance is pi/4 per draw. After `max_attempts` rejected draws the point is taken
/// from [`PolarDiscSampling`] instead, so a degenerate stream can never stall a frame.
#[derive(Debug, Clone, Copy)]
pub struct RejectionDiscSampling {
    pub max_attempts: u32,
}

impl Default for RejectionDiscSampling {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RejectionDiscSampling {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Vector2<f32> {
        for _ in 0..self.max_attempts {
            let x = rand01(rng) * 2.0 - 1.0;
            let y = rand01(rng) * 2.0 - 1.0;
            if x * x + y * y <= 1.0 {
                return Vector2 { x, y };
            }
        }
        PolarDiscSampling::sample(rng)
    }
}

impl DiscSampling for RejectionDiscSampling {
    fn generate(&self, count: usize, rng: &mut dyn RngCore) -> Vec<Vector2<f32>> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.sample(rng));
        }
        out
    }
}

mod compositor;
mod mapper;

pub use compositor::{alpha_for, composite, distort_or_passthrough};
pub use mapper::{displacement_for, map_columns, sample_index, ColumnShift, DisplacementField};

pub const DEFAULT_MAX_DISPLACEMENT: f32 = 100.0;
pub const DEFAULT_ALPHA_SCALE: f32 = 13.7;

/// Added to every magnitude so silence still shimmers a little.
pub const SILENCE_BIAS: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionParams {
    /// Peak column offset in pixels for a full-scale sample.
    pub max_displacement: f32,
    /// Multiplier from magnitude to alpha before the 0..255 clamp.
    pub alpha_scale: f32,
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self {
            max_displacement: DEFAULT_MAX_DISPLACEMENT,
            alpha_scale: DEFAULT_ALPHA_SCALE,
        }
    }
}

/// Source of per-column noise in `[0, 1)`.
pub trait Jitter {
    fn next(&mut self) -> f32;

    /// Restart the sequence from `seed`. Sources without state ignore it.
    fn reseed(&mut self, _seed: u64) {}
}

/// `fastrand`-backed jitter. Seed it for repeatable output.
pub struct RngJitter {
    rng: fastrand::Rng,
}

impl RngJitter {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RngJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Jitter for RngJitter {
    fn next(&mut self) -> f32 {
        self.rng.f32()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }
}

/// Always returns the same value. Handy for pinning displacement in tests and benchmarks.
pub struct FixedJitter(pub f32);

impl Jitter for FixedJitter {
    fn next(&mut self) -> f32 {
        self.0
    }
}

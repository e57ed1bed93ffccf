use crate::settings::BaselineRange;
use rand::Rng;

/// Supplies the part of the score that no explicit rule accounts for.
pub trait BaselineProvider: Send + Sync {
    fn provide<R: Rng>(&self, rng: &mut R) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBaseline {
    pub min: u32,
    pub max: u32,
}

impl From<BaselineRange> for UniformBaseline {
    fn from(range: BaselineRange) -> Self {
        Self {
            min: range.min.min(range.max),
            max: range.max,
        }
    }
}

impl BaselineProvider for UniformBaseline {
    fn provide<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.random_range(self.min..=self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBaseline(pub u32);

impl BaselineProvider for FixedBaseline {
    fn provide<R: Rng>(&self, _rng: &mut R) -> u32 {
        self.0
    }
}

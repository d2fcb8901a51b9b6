//! Decorative waveform strip and pointer-to-position mapping.
//!
//! Bar heights are random and carry no acoustic meaning. They are drawn once
//! per widget so the strip does not flicker between redraws.

use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;

use super::progress::ProgressModel;

#[derive(Debug, Clone, PartialEq)]
pub struct WaveformModel {
    bars: Vec<f32>,
    min: f32,
    max: f32,
}

impl WaveformModel {
    /// Draw `count` heights uniformly from `[min, max]` with a fresh seed.
    pub fn generate(count: usize, min: f32, max: f32) -> Self {
        Self::generate_seeded(count, min, max, rand::random::<u64>())
    }

    pub fn generate_seeded(count: usize, min: f32, max: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let bars = match Uniform::new_inclusive(min, max) {
            Ok(dist) => (0..count).map(|_| dist.sample(&mut rng)).collect(),
            Err(e) => {
                log::warn!("bad waveform range {min}..={max}: {e}; using flat bars");
                vec![min; count]
            }
        };
        Self { bars, min, max }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn heights(&self) -> &[f32] {
        &self.bars
    }

    /// Height of bar `i` scaled into `[0, 1]`.
    pub fn normalized(&self, i: usize) -> f32 {
        let Some(&h) = self.bars.get(i) else {
            return 0.0;
        };
        let span = self.max - self.min;
        if span <= f32::EPSILON {
            1.0
        } else {
            ((h - self.min) / span).clamp(0.0, 1.0)
        }
    }

    /// First bar that is not yet played: `floor(fraction * N)`.
    ///
    /// `None` while the duration is unknown, meaning no bar counts as played.
    pub fn active_index(&self, progress: &ProgressModel) -> Option<usize> {
        progress.duration()?;
        let idx = (progress.fraction() * self.bars.len() as f64).floor() as usize;
        Some(idx.min(self.bars.len()))
    }

    pub fn is_played(&self, i: usize, active: Option<usize>) -> bool {
        active.is_some_and(|a| i < a)
    }
}

/// Map a pointer at `x` inside a strip `width` wide onto `[0, 1]`.
pub fn scrub_fraction(x: f64, width: f64) -> f64 {
    if !(width > 0.0) || x.is_nan() {
        return 0.0;
    }
    (x / width).clamp(0.0, 1.0)
}

use std::fmt;

#[allow(unused_imports)]
use crate::Rbtree;

/// Depth tracks the depth of every empty (nil) position in an
/// [`Rbtree`] instance, and computes minimum, maximum, mean and
/// percentiles over them.
///
/// For a tree with `n` entries there are exactly `n + 1` nil positions.
#[derive(Clone, Default)]
pub struct Depth {
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
    histogram: Vec<u64>, // histogram[depth] = number of nil positions
}

impl Depth {
    pub(crate) fn new() -> Depth {
        Default::default()
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        if self.samples == 0 || depth < self.min {
            self.min = depth
        }
        if depth > self.max {
            self.max = depth
        }
        self.samples += 1;
        self.total += depth;
        if self.histogram.len() <= depth {
            self.histogram.resize(depth + 1, 0);
        }
        self.histogram[depth] += 1;
    }

    /// Return number of nil positions sampled in [`Rbtree`] instance.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Return minimum depth of nil position.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Return maximum depth of nil position.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Return the average depth of nil positions, zero when nothing
    /// was sampled.
    pub fn mean(&self) -> usize {
        match self.samples {
            0 => 0,
            n => self.total / n,
        }
    }

    /// Return depth as tuple of percentiles, each tuple provides
    /// (percentile, depth). Returned percentiles start from 90.
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        let mut percentiles: Vec<(u8, usize)> = vec![];
        let (mut acc, mut prev_perc) = (0_u64, 90_u8);
        let iter = self.histogram.iter().enumerate().filter(|(_, &n)| n > 0);
        for (depth, samples) in iter {
            acc += *samples;
            let perc = ((acc as f64 / self.samples as f64) * 100_f64) as u8;
            if perc >= prev_perc {
                percentiles.push((perc, depth));
                prev_perc = perc;
            }
        }
        percentiles
    }
}

impl fmt::Debug for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Depth")
            .field("samples", &self.samples)
            .field("min", &self.min)
            .field("mean", &self.mean())
            .field("max", &self.max)
            .field("percentiles", &self.percentiles())
            .finish()
    }
}

//! Summary statistics for generated signals.

use serde::{Deserialize, Serialize};

/// Number of histogram bins used for the entropy estimate.
pub const ENTROPY_BINS: usize = 50;

/// Mean, spread and amplitude entropy of a real signal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalStats {
    pub num_samples: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Shannon entropy in bits of the amplitude histogram
    pub entropy: f64,
}

impl SignalStats {
    pub fn compute(signal: &[f64]) -> Self {
        if signal.is_empty() {
            return Self::default();
        }

        let n = signal.len() as f64;
        let mean = signal.iter().sum::<f64>() / n;
        let variance = signal.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let min = signal.iter().copied().fold(f64::INFINITY, f64::min);
        let max = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            num_samples: signal.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            entropy: histogram_entropy(signal, ENTROPY_BINS),
        }
    }
}

/// Shannon entropy (bits) of a `bins`-bin histogram spanning `[min, max]`.
///
/// A constant signal puts everything in one bin and has zero entropy.
pub fn histogram_entropy(signal: &[f64], bins: usize) -> f64 {
    if signal.is_empty() || bins == 0 {
        return 0.0;
    }

    let min = signal.iter().copied().fold(f64::INFINITY, f64::min);
    let max = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_size = (max - min) / bins as f64;

    let mut histogram = vec![0usize; bins];
    for &value in signal {
        let index = if bin_size > 0.0 {
            (((value - min) / bin_size) as usize).min(bins - 1)
        } else {
            0
        };
        histogram[index] += 1;
    }

    let total = signal.len() as f64;
    histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

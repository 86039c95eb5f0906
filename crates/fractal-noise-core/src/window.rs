//! Tapering windows applied before spectral estimation.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function for tapering a signal before the FFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    /// All ones.
    Rectangular,
    /// 0.5 * (1 - cos(2πi/(N-1)))
    #[default]
    Hann,
    /// 0.54 - 0.46 * cos(2πi/(N-1))
    Hamming,
}

impl WindowFunction {
    /// Weight of sample `i` in a window of length `n`.
    pub fn coefficient(&self, i: usize, n: usize) -> f64 {
        if n <= 1 {
            return 1.0;
        }
        let phase = 2.0 * PI * i as f64 / (n - 1) as f64;
        match self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Hann => 0.5 * (1.0 - phase.cos()),
            WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
        }
    }

    /// Window coefficients for length `n`.
    pub fn generate(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.coefficient(i, n)).collect()
    }

    /// Return a windowed copy of `signal`.
    pub fn apply(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        signal
            .iter()
            .enumerate()
            .map(|(i, &s)| s * self.coefficient(i, n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hann_endpoints_and_peak() {
        let w = WindowFunction::Hann.generate(5);
        assert_relative_eq!(w[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(w[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(w[4], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hamming_endpoints() {
        let w = WindowFunction::Hamming.generate(9);
        assert_relative_eq!(w[0], 0.08, epsilon = 1e-12);
        assert_relative_eq!(w[4], 1.0, epsilon = 1e-12);
        assert_relative_eq!(w[8], 0.08, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(WindowFunction::Hann.generate(0).is_empty());
        assert_eq!(WindowFunction::Hann.generate(1), vec![1.0]);
    }

    #[test]
    fn test_apply() {
        let signal = vec![2.0; 4];
        assert_eq!(WindowFunction::Rectangular.apply(&signal), signal);

        let windowed = WindowFunction::Hann.apply(&signal);
        assert_relative_eq!(windowed[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(windowed[1], 1.5, epsilon = 1e-12);
    }
}

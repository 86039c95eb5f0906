//! # Spectrum Analysis
//!
//! Magnitude, phase and power spectral density of real signals, plus a
//! log-log power-law fit for checking the color of synthesized noise.
//!
//! All transforms go through a [`PlanSource`], so the signal length must be a
//! power of two.
//!
//! ## One-sided PSD
//!
//! ```text
//! x ──► Hann ──► FFT ──► |X[k]|² / (fs·N) ──► ×2 for 0 < k < N/2-1
//! ```

use serde::{Deserialize, Serialize};

use crate::fft::{magnitudes, phases, PlanSource};
use crate::types::{NoiseError, NoiseResult, RealSignal};
use crate::window::WindowFunction;

/// `|X[k]|` for bins `0..N/2` of a real signal.
pub fn magnitude_spectrum<P: PlanSource + ?Sized>(
    plans: &P,
    signal: &[f64],
) -> NoiseResult<RealSignal> {
    let plan = plans.plan(signal.len())?;
    let spectrum = plan.real_forward(signal)?;
    let half = signal.len() / 2;
    Ok(magnitudes(&spectrum[..2 * half]))
}

/// `arg(X[k])` for all `N` bins of a real signal.
pub fn phase_spectrum<P: PlanSource + ?Sized>(
    plans: &P,
    signal: &[f64],
) -> NoiseResult<RealSignal> {
    let plan = plans.plan(signal.len())?;
    let spectrum = plan.real_forward(signal)?;
    Ok(phases(&spectrum))
}

/// One-sided power spectral density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psd {
    /// Bin center frequencies in Hz
    pub frequencies: Vec<f64>,
    /// Density per bin
    pub density: Vec<f64>,
}

impl Psd {
    /// Frequency resolution in Hz.
    pub fn bin_width(&self) -> f64 {
        self.frequencies.get(1).copied().unwrap_or(0.0)
    }
}

/// Hann-windowed periodogram over bins `0..N/2`.
pub fn power_spectral_density<P: PlanSource + ?Sized>(
    plans: &P,
    signal: &[f64],
    sample_rate: f64,
) -> NoiseResult<Psd> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(NoiseError::Domain(format!(
            "sample rate must be finite and positive, got {}",
            sample_rate
        )));
    }

    let n = signal.len();
    let plan = plans.plan(n)?;
    let windowed = WindowFunction::Hann.apply(signal);
    let spectrum = plan.real_forward(&windowed)?;

    let half = n / 2;
    let norm = sample_rate * n as f64;
    let density = (0..half)
        .map(|k| {
            let re = spectrum[2 * k];
            let im = spectrum[2 * k + 1];
            let power = (re * re + im * im) / norm;
            // Fold the negative frequencies into the interior bins
            if k > 0 && k + 1 < half {
                2.0 * power
            } else {
                power
            }
        })
        .collect();

    Ok(Psd {
        frequencies: bin_frequencies(n, sample_rate),
        density,
    })
}

/// Center frequencies of bins `0..n/2` for an `n`-point transform.
pub fn bin_frequencies(n: usize, sample_rate: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let df = sample_rate / n as f64;
    (0..n / 2).map(|k| k as f64 * df).collect()
}

/// Least-squares fit of `|X[k]|² ∝ k^exponent` in log-log space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawFit {
    pub exponent: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Fit a power law to a magnitude spectrum.
///
/// Bin 0 and bins with zero or non-finite magnitude are skipped. Fewer than
/// two usable bins give a flat fit.
pub fn fit_power_law(magnitudes: &[f64]) -> PowerLawFit {
    let (x, y): (Vec<f64>, Vec<f64>) = magnitudes
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, &m)| m.is_finite() && m > 0.0)
        .map(|(k, &m)| ((k as f64).ln(), 2.0 * m.ln()))
        .unzip();

    let flat = PowerLawFit {
        exponent: 0.0,
        intercept: 0.0,
        r_squared: 0.0,
    };
    if x.len() < 2 {
        return flat;
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(&y).map(|(a, b)| a * b).sum();
    let sum_xx: f64 = x.iter().map(|a| a * a).sum();

    let denom = n * sum_xx - sum_x * sum_x;
    if denom.abs() < 1e-30 {
        return PowerLawFit {
            intercept: sum_y / n,
            ..flat
        };
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;

    let y_mean = sum_y / n;
    let ss_tot: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(&y)
        .map(|(xi, yi)| (yi - (slope * xi + intercept)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    PowerLawFit {
        exponent: slope,
        intercept,
        r_squared,
    }
}

/// Spectral exponent of a magnitude spectrum (`-1` for pink noise).
pub fn estimate_spectral_exponent(magnitudes: &[f64]) -> f64 {
    fit_power_law(magnitudes).exponent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::PlanCache;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn tone(bin: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * bin * i as f64 / n as f64).sin())
            .collect()
    }

    #[test]
    fn test_magnitude_spectrum_of_constant() {
        let cache = PlanCache::new();
        let spectrum = magnitude_spectrum(&cache, &[1.5; 4]).unwrap();
        assert_eq!(spectrum.len(), 2);
        assert_relative_eq!(spectrum[0], 6.0, epsilon = 1e-12);
        assert!(spectrum[1] < 1e-12);
    }

    #[test]
    fn test_magnitude_spectrum_rejects_bad_length() {
        let cache = PlanCache::new();
        assert_eq!(
            magnitude_spectrum(&cache, &[0.0; 6]).unwrap_err(),
            NoiseError::InvalidSize { size: 6 }
        );
    }

    #[test]
    fn test_phase_of_sine() {
        let cache = PlanCache::new();
        let phase = phase_spectrum(&cache, &tone(3.0, 32)).unwrap();
        assert_eq!(phase.len(), 32);
        // sin has phase -π/2 at its positive frequency bin
        assert_relative_eq!(phase[3], -PI / 2.0, epsilon = 1e-9);
        assert_relative_eq!(phase[29], PI / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_psd_peak_and_axis() {
        let cache = PlanCache::new();
        let psd = power_spectral_density(&cache, &tone(16.0, 256), 1000.0).unwrap();
        assert_eq!(psd.density.len(), 128);
        assert_eq!(psd.frequencies.len(), 128);
        assert_relative_eq!(psd.bin_width(), 1000.0 / 256.0);

        let peak = psd
            .density
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(peak, 16);
        assert_relative_eq!(psd.frequencies[peak], 62.5);
    }

    #[test]
    fn test_psd_rejects_bad_sample_rate() {
        let cache = PlanCache::new();
        for fs in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                power_spectral_density(&cache, &[0.0; 8], fs),
                Err(NoiseError::Domain(_))
            ));
        }
    }

    #[test]
    fn test_bin_frequencies() {
        assert_eq!(bin_frequencies(8, 8.0), vec![0.0, 1.0, 2.0, 3.0]);
        assert!(bin_frequencies(0, 8.0).is_empty());
    }

    #[test]
    fn test_fit_exact_power_law() {
        let mags: Vec<f64> = (0..512)
            .map(|k| if k == 0 { 0.0 } else { (k as f64).powf(-0.5) })
            .collect();
        let fit = fit_power_law(&mags);
        assert_relative_eq!(fit.exponent, -1.0, epsilon = 1e-9);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_degenerate_input() {
        assert_eq!(estimate_spectral_exponent(&[]), 0.0);
        assert_eq!(estimate_spectral_exponent(&[3.0, 1.0]), 0.0);
        assert_eq!(estimate_spectral_exponent(&[1.0, 0.0, 0.0]), 0.0);
    }
}
